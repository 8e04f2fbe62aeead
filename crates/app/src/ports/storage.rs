//! Storage port — repository trait for subscription persistence.

use std::future::Future;

use subtrack_domain::error::SubtrackError;
use subtrack_domain::id::{SubscriptionId, UserId};
use subtrack_domain::subscription::Subscription;
use subtrack_domain::total::PriceTotalQuery;

/// Repository for persisting and querying [`Subscription`]s.
pub trait SubscriptionRepository {
    /// Persist a new subscription.
    ///
    /// Implementations backed by a store with a uniqueness constraint on
    /// `(user_id, service_name)` report a violation as
    /// [`SubtrackError::Conflict`].
    fn create(
        &self,
        subscription: Subscription,
    ) -> impl Future<Output = Result<Subscription, SubtrackError>> + Send;

    /// Get a subscription by its unique identifier.
    fn get_by_id(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<Option<Subscription>, SubtrackError>> + Send;

    /// Get every subscription owned by `user_id`, in no particular order.
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Subscription>, SubtrackError>> + Send;

    /// Whether `user_id` already has a subscription named `service_name`.
    fn exists_for_service(
        &self,
        user_id: UserId,
        service_name: &str,
    ) -> impl Future<Output = Result<bool, SubtrackError>> + Send;

    /// Overwrite an existing subscription. Returns `false` if no row matched.
    fn update(
        &self,
        subscription: Subscription,
    ) -> impl Future<Output = Result<bool, SubtrackError>> + Send;

    /// Delete a subscription. Returns `false` if nothing was removed.
    fn delete(&self, id: SubscriptionId)
    -> impl Future<Output = Result<bool, SubtrackError>> + Send;

    /// Sum `monthly_price` over the subscriptions matching `query`.
    fn sum_monthly_price(
        &self,
        query: PriceTotalQuery,
    ) -> impl Future<Output = Result<i64, SubtrackError>> + Send;
}
