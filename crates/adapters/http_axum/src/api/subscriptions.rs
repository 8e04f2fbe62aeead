//! JSON handlers for subscriptions.
//!
//! Month fields accept `MM-YYYY` or `YYYY-MM`; responses always carry
//! `YYYY-MM`.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use subtrack_app::ports::SubscriptionRepository;
use subtrack_domain::error::ValidationError;
use subtrack_domain::id::{SubscriptionId, UserId};
use subtrack_domain::subscription::{Subscription, SubscriptionPatch};
use subtrack_domain::total::PriceTotalQuery;
use subtrack_domain::year_month::YearMonth;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /createSubscription`.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Request body for `PATCH /subscriptions/{id}`.
///
/// Absent fields are left untouched. `end_date: ""` clears the end month.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query string of `GET /subscriptions`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user_id: Option<String>,
}

/// Query string of `GET /subscriptions/total`. Empty values count as absent.
#[derive(Debug, Deserialize)]
pub struct TotalParams {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub id: SubscriptionId,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TotalBody {
    pub total_price: i64,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Subscription>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Subscription>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update and delete endpoints.
pub enum MessageResponse {
    Ok(Json<MessageBody>),
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the total endpoint.
pub enum TotalResponse {
    Ok(Json<TotalBody>),
}

impl IntoResponse for TotalResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_user_id(raw: Option<&str>) -> Result<UserId, ValidationError> {
    let raw = raw
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingField { field: "user_id" })?;
    UserId::from_str(raw).map_err(|_| ValidationError::InvalidId {
        field: "user_id",
        value: raw.to_string(),
    })
}

fn parse_subscription_id(raw: &str) -> Result<SubscriptionId, ValidationError> {
    SubscriptionId::from_str(raw).map_err(|_| ValidationError::InvalidId {
        field: "id",
        value: raw.to_string(),
    })
}

fn parse_month(field: &'static str, raw: &str) -> Result<YearMonth, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidMonth {
        field,
        value: raw.to_string(),
    })
}

/// Parse an optional month where an empty string means "no month".
fn parse_optional_month(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<YearMonth>, ValidationError> {
    raw.filter(|value| !value.is_empty())
        .map(|value| parse_month(field, value))
        .transpose()
}

impl CreateSubscriptionRequest {
    fn into_subscription(self) -> Result<Subscription, ApiError> {
        let user_id = parse_user_id(Some(&self.user_id))?;
        let started_at = parse_month("start_date", &self.start_date)?;
        let ended_at = parse_optional_month("end_date", self.end_date.as_deref())?;

        Ok(Subscription::builder()
            .service_name(self.service_name)
            .monthly_price(self.price)
            .user_id(user_id)
            .started_at(started_at)
            .ended_at(ended_at)
            .build()?)
    }
}

impl UpdateSubscriptionRequest {
    fn into_patch(self) -> Result<SubscriptionPatch, ValidationError> {
        Ok(SubscriptionPatch {
            service_name: self.service_name,
            monthly_price: self.price,
            started_at: self
                .start_date
                .as_deref()
                .map(|raw| parse_month("start_date", raw))
                .transpose()?,
            ended_at: self
                .end_date
                .as_deref()
                .map(|raw| parse_optional_month("end_date", Some(raw)))
                .transpose()?,
        })
    }
}

/// `POST /createSubscription`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let subscription = req.into_subscription()?;
    let id = state
        .subscription_service
        .create_subscription(subscription)
        .await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        id,
        message: "subscription created",
    })))
}

/// `GET /subscriptions?user_id=`
pub async fn list<R>(
    State(state): State<AppState<R>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    let Query(params) = params?;
    let user_id = parse_user_id(params.user_id.as_deref())?;
    let subscriptions = state
        .subscription_service
        .list_subscriptions(user_id)
        .await?;
    Ok(ListResponse::Ok(Json(subscriptions)))
}

/// `GET /subscriptions/{id}`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    let id = parse_subscription_id(&id)?;
    let subscription = state.subscription_service.get_subscription(id).await?;
    Ok(GetResponse::Ok(Json(subscription)))
}

/// `PATCH /subscriptions/{id}`
pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> Result<MessageResponse, ApiError>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    let id = parse_subscription_id(&id)?;
    let Json(req) = payload?;
    let patch = req.into_patch()?;
    state
        .subscription_service
        .update_subscription(id, patch)
        .await?;
    Ok(MessageResponse::Ok(Json(MessageBody {
        message: "subscription updated",
    })))
}

/// `DELETE /subscriptions/{id}`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<MessageResponse, ApiError>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    let id = parse_subscription_id(&id)?;
    state.subscription_service.delete_subscription(id).await?;
    Ok(MessageResponse::Ok(Json(MessageBody {
        message: "subscription deleted",
    })))
}

/// `GET /subscriptions/total?user_id=&service_name=&start_date=&end_date=`
pub async fn total<R>(
    State(state): State<AppState<R>>,
    params: Result<Query<TotalParams>, QueryRejection>,
) -> Result<TotalResponse, ApiError>
where
    R: SubscriptionRepository + Send + Sync + 'static,
{
    let Query(params) = params?;
    let query = PriceTotalQuery {
        user_id: parse_user_id(params.user_id.as_deref())?,
        service_name: params.service_name.filter(|name| !name.is_empty()),
        start: parse_optional_month("start_date", params.start_date.as_deref())?,
        end: parse_optional_month("end_date", params.end_date.as_deref())?,
    };
    let total_price = state.subscription_service.total_price(query).await?;
    Ok(TotalResponse::Ok(Json(TotalBody { total_price })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_empty_end_date_as_clear_in_patch() {
        let patch = UpdateSubscriptionRequest {
            end_date: Some(String::new()),
            ..UpdateSubscriptionRequest::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.ended_at, Some(None));
    }

    #[test]
    fn should_leave_end_date_untouched_when_absent_from_patch() {
        let patch = UpdateSubscriptionRequest {
            price: Some(500),
            ..UpdateSubscriptionRequest::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.monthly_price, Some(500));
        assert_eq!(patch.ended_at, None);
        assert_eq!(patch.started_at, None);
    }

    #[test]
    fn should_reject_malformed_start_date_in_patch() {
        let err = UpdateSubscriptionRequest {
            start_date: Some("2024/01".to_string()),
            ..UpdateSubscriptionRequest::default()
        }
        .into_patch()
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidMonth {
                field: "start_date",
                ..
            }
        ));
    }

    #[test]
    fn should_require_non_empty_user_id() {
        assert_eq!(
            parse_user_id(Some("")),
            Err(ValidationError::MissingField { field: "user_id" })
        );
        assert_eq!(
            parse_user_id(None),
            Err(ValidationError::MissingField { field: "user_id" })
        );
        assert!(matches!(
            parse_user_id(Some("nope")),
            Err(ValidationError::InvalidId {
                field: "user_id",
                ..
            })
        ));
    }

    #[test]
    fn should_deserialize_update_with_explicit_empty_end_date() {
        let req: UpdateSubscriptionRequest =
            serde_json::from_str(r#"{"end_date": ""}"#).unwrap();
        assert_eq!(req.end_date.as_deref(), Some(""));
        assert!(req.price.is_none());
    }
}
