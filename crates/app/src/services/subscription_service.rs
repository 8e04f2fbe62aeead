//! Subscription service — use-cases for managing subscriptions.

use subtrack_domain::error::{ConflictError, NotFoundError, SubtrackError};
use subtrack_domain::id::{SubscriptionId, UserId};
use subtrack_domain::subscription::{Subscription, SubscriptionPatch};
use subtrack_domain::total::PriceTotalQuery;

use crate::ports::SubscriptionRepository;

fn not_found(id: SubscriptionId) -> SubtrackError {
    NotFoundError {
        entity: "Subscription",
        id: id.to_string(),
    }
    .into()
}

/// Application service for subscription CRUD and price totals.
pub struct SubscriptionService<R> {
    repo: R,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new subscription and return its id.
    ///
    /// At most one subscription may exist per `(user_id, service_name)`.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::Validation`] if invariants fail,
    /// [`SubtrackError::Conflict`] on a duplicate, or a storage error
    /// propagated from the repository.
    pub async fn create_subscription(
        &self,
        subscription: Subscription,
    ) -> Result<SubscriptionId, SubtrackError> {
        subscription.validate()?;

        if self
            .repo
            .exists_for_service(subscription.user_id, &subscription.service_name)
            .await?
        {
            return Err(ConflictError {
                user_id: subscription.user_id.to_string(),
                service_name: subscription.service_name,
            }
            .into());
        }

        let created = self.repo.create(subscription).await?;
        tracing::info!(
            subscription_id = %created.id,
            user_id = %created.user_id,
            service_name = %created.service_name,
            "subscription created"
        );
        Ok(created.id)
    }

    /// Look up a subscription by id.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::NotFound`] when no subscription with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_subscription(&self, id: SubscriptionId) -> Result<Subscription, SubtrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// List the subscriptions of a user. An unknown user yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_subscriptions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Subscription>, SubtrackError> {
        self.repo.find_by_user(user_id).await
    }

    /// Overwrite the fields present in `patch` and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::NotFound`] when `id` does not exist,
    /// [`SubtrackError::Validation`] if the patched record is invalid, or a
    /// storage error from the repository.
    pub async fn update_subscription(
        &self,
        id: SubscriptionId,
        patch: SubscriptionPatch,
    ) -> Result<Subscription, SubtrackError> {
        let mut subscription = self.get_subscription(id).await?;
        subscription.apply(patch)?;

        if !self.repo.update(subscription.clone()).await? {
            return Err(not_found(id));
        }
        tracing::info!(subscription_id = %id, "subscription updated");
        Ok(subscription)
    }

    /// Delete a subscription by id.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::NotFound`] when nothing was removed, or a
    /// storage error from the repository.
    pub async fn delete_subscription(&self, id: SubscriptionId) -> Result<(), SubtrackError> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(subscription_id = %id, "subscription deleted");
        Ok(())
    }

    /// Sum the monthly prices of the subscriptions matching `query`.
    ///
    /// An empty match set sums to 0.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn total_price(&self, query: PriceTotalQuery) -> Result<i64, SubtrackError> {
        self.repo.sum_monthly_price(query).await
    }
}
