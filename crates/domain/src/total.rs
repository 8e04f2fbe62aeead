//! Price aggregation over a user's subscriptions.

use crate::id::UserId;
use crate::subscription::Subscription;
use crate::year_month::YearMonth;

/// Filter for summing `monthly_price` across a user's subscriptions.
///
/// The month bounds are inclusive and apply to `started_at` only; `ended_at`
/// is never consulted, so a subscription that ended before `start` is still
/// counted as long as it started inside the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTotalQuery {
    pub user_id: UserId,
    /// Exact match on the service name when set.
    pub service_name: Option<String>,
    pub start: Option<YearMonth>,
    pub end: Option<YearMonth>,
}

impl PriceTotalQuery {
    /// Query every subscription of `user_id`, no other filter.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            service_name: None,
            start: None,
            end: None,
        }
    }

    /// Whether `subscription` belongs to the filtered set.
    #[must_use]
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if subscription.user_id != self.user_id {
            return false;
        }
        if self
            .service_name
            .as_ref()
            .is_some_and(|name| subscription.service_name != *name)
        {
            return false;
        }
        let key = subscription.started_at.sort_key();
        if self.start.is_some_and(|start| key < start.sort_key()) {
            return false;
        }
        if self.end.is_some_and(|end| key > end.sort_key()) {
            return false;
        }
        true
    }

    /// Sum the prices of the matching subscriptions; 0 for an empty set.
    #[must_use]
    pub fn sum<'a>(&self, subscriptions: impl IntoIterator<Item = &'a Subscription>) -> i64 {
        subscriptions
            .into_iter()
            .filter(|sub| self.matches(sub))
            .map(|sub| sub.monthly_price)
            .sum()
    }
}
