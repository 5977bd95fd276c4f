use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::auth::{AuthError, current_user};
use crate::models::{BookingRequest, BookingStatus, CreatedBooking, FitnessClass};
use crate::schedule::{find_session, resolve_sessions};
use crate::store::{BookingStore, StoreError, UserProvider};
use crate::validation::{ContactDetails, ValidationError, validate_contact};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Authentication(#[from] AuthError),
    #[error("booking could not be saved, please try again")]
    Submission(#[source] StoreError),
}

/// User input for one booking. Left untouched when a submission fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingForm {
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "date", example = "2024-01-15")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(example = "18:00")]
    pub time: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Checks the form on its own, before any class or user lookup.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.selection()?;
        validate_contact(&self.contact())
    }

    fn selection(&self) -> Result<(NaiveDate, &str), ValidationError> {
        let time = self.time.as_deref().map(str::trim).filter(|t| !t.is_empty());
        match (self.date, time) {
            (Some(date), Some(time)) => Ok((date, time)),
            _ => Err(ValidationError::MissingDateTime),
        }
    }

    fn contact(&self) -> ContactDetails<'_> {
        ContactDetails {
            phone: self.phone.as_deref(),
            notes: self.notes.as_deref(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct BookingSubmitter<'a, S: ?Sized, U: ?Sized> {
    store: &'a S,
    users: &'a U,
}

impl<'a, S, U> BookingSubmitter<'a, S, U>
where
    S: BookingStore + ?Sized,
    U: UserProvider + ?Sized,
{
    pub fn new(store: &'a S, users: &'a U) -> Self {
        Self { store, users }
    }

    /// Records a confirmed booking for the selected session of `class`.
    ///
    /// Nothing reaches the network until the form is complete and the
    /// selection is one of the class's upcoming sessions as of `today`.
    /// There is no duplicate check: submitting the same form twice creates
    /// two bookings.
    pub async fn submit(
        &self,
        form: &mut BookingForm,
        class: &FitnessClass,
        token: Option<&str>,
        today: NaiveDate,
    ) -> Result<CreatedBooking, BookingError> {
        form.validate()?;
        let (date, time) = form.selection()?;

        let sessions = resolve_sessions(today, &class.schedule);
        let session =
            find_session(&sessions, date, time).ok_or(ValidationError::SessionNotOffered)?;

        let user = current_user(self.users, token).await?;

        let request = BookingRequest {
            user_email: user.email,
            user_name: user.full_name,
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            instructor: class.instructor.clone(),
            date: session.date,
            time: session.time.clone(),
            day_of_week: session.day,
            status: BookingStatus::Confirmed,
            phone: non_blank(form.phone.as_deref()),
            notes: non_blank(form.notes.as_deref()),
        };

        let created = self.store.create_booking(&request).await.map_err(|err| {
            error!(error = %err, class_id = %request.class_id, "failed to create booking");
            BookingError::Submission(err)
        })?;

        info!(
            booking_id = %created.id,
            class_id = %created.booking.class_id,
            date = %created.booking.date,
            time = %created.booking.time,
            "booking confirmed"
        );
        form.clear();
        Ok(created)
    }
}
