//! View state of the floating help widget.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetView {
    #[default]
    Menu,
    Faq,
    Contact,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetEvent {
    ShowFaq,
    ShowContact,
    ContactSent,
    Back,
    Reset,
}

impl WidgetView {
    /// Next view, or `None` when `event` is not valid from this view.
    pub fn transition(self, event: WidgetEvent) -> Option<WidgetView> {
        use WidgetEvent::*;
        use WidgetView::*;

        match (self, event) {
            (_, Reset) => Some(Menu),
            (Menu, ShowFaq) => Some(Faq),
            (Menu, ShowContact) | (Faq, ShowContact) => Some(Contact),
            (Contact, ContactSent) => Some(Success),
            (Faq, Back) | (Contact, Back) | (Success, Back) => Some(Menu),
            _ => None,
        }
    }
}
