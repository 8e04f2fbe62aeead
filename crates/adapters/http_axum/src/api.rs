//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod subscriptions;

use axum::Router;
use axum::routing::{get, post};

use subtrack_app::ports::SubscriptionRepository;

use crate::state::AppState;

/// Build the subscription API routes.
///
/// `/subscriptions/total` is a static segment and takes precedence over
/// `/subscriptions/{id}`.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/createSubscription", post(subscriptions::create::<R>))
        .route("/subscriptions", get(subscriptions::list::<R>))
        .route("/subscriptions/total", get(subscriptions::total::<R>))
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get::<R>)
                .patch(subscriptions::update::<R>)
                .delete(subscriptions::delete::<R>),
        )
}
