//! Shared application state for axum handlers.

use std::sync::Arc;

use subtrack_app::ports::SubscriptionRepository;
use subtrack_app::services::subscription_service::SubscriptionService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not need to
/// be `Clone`; only the `Arc` is cloned.
pub struct AppState<R> {
    /// Subscription use-cases.
    pub subscription_service: Arc<SubscriptionService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            subscription_service: Arc::clone(&self.subscription_service),
        }
    }
}

impl<R> AppState<R>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(subscription_service: SubscriptionService<R>) -> Self {
        Self {
            subscription_service: Arc::new(subscription_service),
        }
    }
}
