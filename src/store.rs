use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::RequestBuilder;
use thiserror::Error;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::models::{
    BookingRequest, CreatedBooking, CurrentUser, FitnessClass, PromotableContent, entity_id,
};

const CLASS_ENTITY: &str = "GymClass";
const BOOKING_ENTITY: &str = "Booking";
const PROMOTION_ENTITY: &str = "Promotion";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("entity store rejected the credentials")]
    Unauthorized,
    #[error("entity store responded with {0}")]
    Status(StatusCode),
    #[error("invalid entity store URL: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, booking: &BookingRequest) -> Result<CreatedBooking, StoreError>;
}

#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Store-defined order; callers must not rely on it being stable.
    async fn filter_promotions(
        &self,
        placement_type: &str,
        enabled: bool,
    ) -> Result<Vec<PromotableContent>, StoreError>;
}

#[async_trait]
pub trait ClassCatalog: Send + Sync {
    async fn get_class(&self, class_id: &str) -> Result<FitnessClass, StoreError>;
}

#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<CurrentUser, StoreError>;
}

/// Client for the remote entity store that owns classes, bookings and
/// promotions.
#[derive(Clone)]
pub struct EntityStoreClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
    api_key: Option<Arc<str>>,
}

impl EntityStoreClient {
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = (*self.base_url).clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api_key", &**key),
            None => request,
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        entity: &'static str,
        id: &str,
    ) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, entity, id));
        }
        Ok(response.json::<T>().await?)
    }
}

fn status_error(status: StatusCode, entity: &'static str, id: &str) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            entity,
            id: id.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized,
        status => StoreError::Status(status),
    }
}

/// Builds the created record from whatever the store echoed. The booking is
/// already persisted at this point, so an unreadable echo falls back to the
/// request that was sent.
fn booking_echo(body: &[u8], sent: &BookingRequest) -> CreatedBooking {
    let echo: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let id = echo.get("id").and_then(entity_id).unwrap_or_else(|| {
        warn!(class_id = %sent.class_id, "entity store did not echo a booking id");
        String::new()
    });
    let booking = serde_json::from_value(echo).unwrap_or_else(|err| {
        debug!(error = %err, "using submitted booking in place of store echo");
        sent.clone()
    });
    CreatedBooking { id, booking }
}

#[async_trait]
impl BookingStore for EntityStoreClient {
    async fn create_booking(&self, booking: &BookingRequest) -> Result<CreatedBooking, StoreError> {
        let url = self.endpoint(&["entities", BOOKING_ENTITY])?;
        debug!(class_id = %booking.class_id, date = %booking.date, "creating booking");
        let response = self
            .with_api_key(self.client.post(url).json(booking))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, BOOKING_ENTITY, &booking.class_id));
        }
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "failed to read booking echo");
                Default::default()
            }
        };
        Ok(booking_echo(&body, booking))
    }
}

#[async_trait]
impl PromotionStore for EntityStoreClient {
    async fn filter_promotions(
        &self,
        placement_type: &str,
        enabled: bool,
    ) -> Result<Vec<PromotableContent>, StoreError> {
        let url = self.endpoint(&["entities", PROMOTION_ENTITY])?;
        let request = self.with_api_key(self.client.get(url).query(&[
            ("placement_type", placement_type),
            ("enabled", if enabled { "true" } else { "false" }),
        ]));
        self.send(request, PROMOTION_ENTITY, placement_type).await
    }
}

#[async_trait]
impl ClassCatalog for EntityStoreClient {
    async fn get_class(&self, class_id: &str) -> Result<FitnessClass, StoreError> {
        let url = self.endpoint(&["entities", CLASS_ENTITY, class_id])?;
        let request = self.with_api_key(self.client.get(url));
        self.send(request, CLASS_ENTITY, class_id).await
    }
}

#[async_trait]
impl UserProvider for EntityStoreClient {
    async fn current_user(&self, token: &str) -> Result<CurrentUser, StoreError> {
        let url = self.endpoint(&["auth", "me"])?;
        let request = self.client.get(url).bearer_auth(token);
        self.send(request, "User", "me").await
    }
}
