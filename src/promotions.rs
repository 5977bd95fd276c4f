use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::PromotableContent;
use crate::store::PromotionStore;

/// Open-ended on either side when the bound is unset; both bounds inclusive.
pub fn is_active(item: &PromotableContent, now: DateTime<Utc>) -> bool {
    item.start_date.is_none_or(|start| now >= start) && item.end_date.is_none_or(|end| now <= end)
}

/// First enabled candidate for `placement` whose window contains `now`,
/// in the order the candidates were given.
pub fn select_active<'a>(
    candidates: &'a [PromotableContent],
    placement: &str,
    now: DateTime<Utc>,
) -> Option<&'a PromotableContent> {
    candidates
        .iter()
        .filter(|item| item.enabled && item.placement_type == placement)
        .find(|item| is_active(item, now))
}

/// Fetches the candidates for `placement` and picks the active one. A failed
/// fetch means nothing is shown.
pub async fn load_active<S: PromotionStore + ?Sized>(
    store: &S,
    placement: &str,
    now: DateTime<Utc>,
) -> Option<PromotableContent> {
    let candidates = match store.filter_promotions(placement, true).await {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!(error = %err, placement, "failed to load promotions");
            return None;
        }
    };
    select_active(&candidates, placement, now).cloned()
}
