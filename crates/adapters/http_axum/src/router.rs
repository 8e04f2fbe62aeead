//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use subtrack_app::ports::SubscriptionRepository;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R>(state: AppState<R>) -> Router
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use subtrack_app::services::subscription_service::SubscriptionService;
    use subtrack_domain::error::SubtrackError;
    use subtrack_domain::id::{SubscriptionId, UserId};
    use subtrack_domain::subscription::Subscription;
    use subtrack_domain::total::PriceTotalQuery;
    use tower::ServiceExt;

    /// Empty store: nothing exists, every write succeeds, totals are 0.
    struct StubRepo;

    impl SubscriptionRepository for StubRepo {
        async fn create(&self, subscription: Subscription) -> Result<Subscription, SubtrackError> {
            Ok(subscription)
        }
        async fn get_by_id(
            &self,
            _id: SubscriptionId,
        ) -> Result<Option<Subscription>, SubtrackError> {
            Ok(None)
        }
        async fn find_by_user(&self, _user_id: UserId) -> Result<Vec<Subscription>, SubtrackError> {
            Ok(vec![])
        }
        async fn exists_for_service(
            &self,
            _user_id: UserId,
            _service_name: &str,
        ) -> Result<bool, SubtrackError> {
            Ok(false)
        }
        async fn update(&self, _subscription: Subscription) -> Result<bool, SubtrackError> {
            Ok(false)
        }
        async fn delete(&self, _id: SubscriptionId) -> Result<bool, SubtrackError> {
            Ok(false)
        }
        async fn sum_monthly_price(&self, _query: PriceTotalQuery) -> Result<i64, SubtrackError> {
            Ok(0)
        }
    }

    fn app() -> Router {
        build(AppState::new(SubscriptionService::new(StubRepo)))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_subscription_with_created_status() {
        let body = format!(
            r#"{{"service_name":"Netflix","price":1000,"user_id":"{}","start_date":"01-2024"}}"#,
            UserId::new()
        );
        let (status, json) = send(json_request("POST", "/createSubscription", &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(json["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn should_return_bad_request_when_create_body_is_malformed() {
        let (status, json) = send(json_request("POST", "/createSubscription", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn should_return_bad_request_when_required_field_missing() {
        let body = r#"{"service_name":"Netflix","price":1000,"start_date":"01-2024"}"#;
        let (status, _) = send(json_request("POST", "/createSubscription", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_create_has_invalid_user_id() {
        let body = r#"{"service_name":"Netflix","price":1000,"user_id":"nope","start_date":"01-2024"}"#;
        let (status, _) = send(json_request("POST", "/createSubscription", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_create_has_invalid_month() {
        let body = format!(
            r#"{{"service_name":"Netflix","price":1000,"user_id":"{}","start_date":"2024/01"}}"#,
            UserId::new()
        );
        let (status, _) = send(json_request("POST", "/createSubscription", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_create_has_negative_price() {
        let body = format!(
            r#"{{"service_name":"Netflix","price":-1,"user_id":"{}","start_date":"01-2024"}}"#,
            UserId::new()
        );
        let (status, _) = send(json_request("POST", "/createSubscription", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_list_has_no_user_id() {
        let (status, json) = send(get_request("/subscriptions")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "user_id is required");
    }

    #[tokio::test]
    async fn should_return_empty_list_for_unknown_user() {
        let (status, json) = send(get_request(&format!("/subscriptions?user_id={}", UserId::new()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn should_return_bad_request_when_id_is_not_uuid() {
        let (status, _) = send(get_request("/subscriptions/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_id() {
        let uri = format!("/subscriptions/{}", SubscriptionId::new());

        let (status, _) = send(get_request(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(json_request("PATCH", &uri, r#"{"price":500}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let delete = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(delete).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_patch_body_is_malformed() {
        let uri = format!("/subscriptions/{}", SubscriptionId::new());
        let (status, _) = send(json_request("PATCH", &uri, r#"{"price":"lots"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_route_total_before_id_lookup() {
        let uri = format!("/subscriptions/total?user_id={}", UserId::new());
        let (status, json) = send(get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_price"], 0);
    }

    #[tokio::test]
    async fn should_treat_empty_total_filters_as_absent() {
        let uri = format!(
            "/subscriptions/total?user_id={}&service_name=&start_date=&end_date=",
            UserId::new()
        );
        let (status, _) = send(get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_total_month_is_invalid() {
        let uri = format!(
            "/subscriptions/total?user_id={}&start_date=13-2024",
            UserId::new()
        );
        let (status, _) = send(get_request(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
