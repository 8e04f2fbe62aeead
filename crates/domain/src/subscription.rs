//! Subscription — one user's recurring commitment to a named service.

use serde::Serialize;

use crate::error::{SubtrackError, ValidationError};
use crate::id::{SubscriptionId, UserId};
use crate::year_month::YearMonth;

/// Upper bound on `monthly_price`; keeps any realistic per-user total inside `i64`.
pub const MAX_MONTHLY_PRICE: i64 = 2_147_483_647;

/// A user's subscription to a single service at a fixed monthly price.
///
/// `ended_at` of `None` means the subscription is ongoing. Nothing ties
/// `ended_at` to be after `started_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub service_name: String,
    pub monthly_price: i64,
    pub user_id: UserId,
    pub started_at: YearMonth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<YearMonth>,
}

impl Subscription {
    /// Create a builder for constructing a [`Subscription`].
    #[must_use]
    pub fn builder() -> SubscriptionBuilder {
        SubscriptionBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::Validation`] when `service_name` is empty or
    /// `monthly_price` is outside `0..=MAX_MONTHLY_PRICE`.
    pub fn validate(&self) -> Result<(), SubtrackError> {
        if self.service_name.is_empty() {
            return Err(ValidationError::EmptyServiceName.into());
        }
        if self.monthly_price < 0 {
            return Err(ValidationError::NegativePrice(self.monthly_price).into());
        }
        if self.monthly_price > MAX_MONTHLY_PRICE {
            return Err(ValidationError::PriceTooHigh {
                price: self.monthly_price,
                max: MAX_MONTHLY_PRICE,
            }
            .into());
        }
        Ok(())
    }

    /// Overwrite the fields present in `patch`, leaving the rest untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::Validation`] if the patched record breaks an
    /// invariant. `self` is left unchanged in that case.
    pub fn apply(&mut self, patch: SubscriptionPatch) -> Result<(), SubtrackError> {
        let mut next = self.clone();
        if let Some(service_name) = patch.service_name {
            next.service_name = service_name;
        }
        if let Some(monthly_price) = patch.monthly_price {
            next.monthly_price = monthly_price;
        }
        if let Some(started_at) = patch.started_at {
            next.started_at = started_at;
        }
        if let Some(ended_at) = patch.ended_at {
            next.ended_at = ended_at;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Partial update. `None` leaves a field as is.
///
/// `ended_at` is doubly optional: `Some(None)` clears the end month, which is
/// distinct from not touching it at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub service_name: Option<String>,
    pub monthly_price: Option<i64>,
    pub started_at: Option<YearMonth>,
    pub ended_at: Option<Option<YearMonth>>,
}

/// Step-by-step builder for [`Subscription`].
#[derive(Debug, Default)]
pub struct SubscriptionBuilder {
    id: Option<SubscriptionId>,
    service_name: Option<String>,
    monthly_price: Option<i64>,
    user_id: Option<UserId>,
    started_at: Option<YearMonth>,
    ended_at: Option<YearMonth>,
}

impl SubscriptionBuilder {
    #[must_use]
    pub fn id(mut self, id: SubscriptionId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    #[must_use]
    pub fn monthly_price(mut self, monthly_price: i64) -> Self {
        self.monthly_price = Some(monthly_price);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn started_at(mut self, started_at: YearMonth) -> Self {
        self.started_at = Some(started_at);
        self
    }

    #[must_use]
    pub fn ended_at(mut self, ended_at: Option<YearMonth>) -> Self {
        self.ended_at = ended_at;
        self
    }

    /// Consume the builder, validate, and return a [`Subscription`].
    ///
    /// A fresh [`SubscriptionId`] is generated unless one was set.
    ///
    /// # Errors
    ///
    /// Returns [`SubtrackError::Validation`] if a required field is missing,
    /// `service_name` is empty, or the price is negative.
    pub fn build(self) -> Result<Subscription, SubtrackError> {
        let user_id = self
            .user_id
            .ok_or(ValidationError::MissingField { field: "user_id" })?;
        let started_at = self
            .started_at
            .ok_or(ValidationError::MissingField { field: "start_date" })?;
        let monthly_price = self
            .monthly_price
            .ok_or(ValidationError::MissingField { field: "price" })?;

        let subscription = Subscription {
            id: self.id.unwrap_or_default(),
            service_name: self.service_name.unwrap_or_default(),
            monthly_price,
            user_id,
            started_at,
            ended_at: self.ended_at,
        };
        subscription.validate()?;
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(text: &str) -> YearMonth {
        text.parse().unwrap()
    }

    fn netflix() -> Subscription {
        Subscription::builder()
            .service_name("Netflix")
            .monthly_price(1000)
            .user_id(UserId::new())
            .started_at(month("01-2024"))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_subscription_when_all_fields_provided() {
        let sub = netflix();
        assert_eq!(sub.service_name, "Netflix");
        assert_eq!(sub.monthly_price, 1000);
        assert!(sub.ended_at.is_none());
    }

    #[test]
    fn should_return_validation_error_when_service_name_is_empty() {
        let result = Subscription::builder()
            .monthly_price(1)
            .user_id(UserId::new())
            .started_at(month("2024-01"))
            .build();
        assert!(matches!(
            result,
            Err(SubtrackError::Validation(ValidationError::EmptyServiceName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_price_is_negative() {
        let result = Subscription::builder()
            .service_name("Spotify")
            .monthly_price(-1)
            .user_id(UserId::new())
            .started_at(month("2024-01"))
            .build();
        assert!(matches!(
            result,
            Err(SubtrackError::Validation(ValidationError::NegativePrice(-1)))
        ));
    }

    #[test]
    fn should_accept_price_at_upper_bound() {
        let result = Subscription::builder()
            .service_name("Enterprise")
            .monthly_price(MAX_MONTHLY_PRICE)
            .user_id(UserId::new())
            .started_at(month("2024-01"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn should_return_validation_error_when_price_exceeds_upper_bound() {
        let result = Subscription::builder()
            .service_name("Enterprise")
            .monthly_price(i64::MAX / 2 + 1)
            .user_id(UserId::new())
            .started_at(month("2024-01"))
            .build();
        assert!(matches!(
            result,
            Err(SubtrackError::Validation(ValidationError::PriceTooHigh {
                max: MAX_MONTHLY_PRICE,
                ..
            }))
        ));
    }

    #[test]
    fn should_accept_zero_price() {
        let result = Subscription::builder()
            .service_name("Free tier")
            .monthly_price(0)
            .user_id(UserId::new())
            .started_at(month("2024-01"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn should_report_missing_user_id() {
        let result = Subscription::builder()
            .service_name("Netflix")
            .monthly_price(1)
            .started_at(month("2024-01"))
            .build();
        assert!(matches!(
            result,
            Err(SubtrackError::Validation(ValidationError::MissingField {
                field: "user_id"
            }))
        ));
    }

    #[test]
    fn should_only_overwrite_patched_fields() {
        let mut sub = netflix();
        sub.ended_at = Some(month("06-2024"));
        let before = sub.clone();

        sub.apply(SubscriptionPatch {
            monthly_price: Some(500),
            ..SubscriptionPatch::default()
        })
        .unwrap();

        assert_eq!(sub.monthly_price, 500);
        assert_eq!(sub.service_name, before.service_name);
        assert_eq!(sub.started_at, before.started_at);
        assert_eq!(sub.ended_at, before.ended_at);
    }

    #[test]
    fn should_clear_end_month_when_patch_sets_none() {
        let mut sub = netflix();
        sub.ended_at = Some(month("06-2024"));

        sub.apply(SubscriptionPatch {
            ended_at: Some(None),
            ..SubscriptionPatch::default()
        })
        .unwrap();

        assert!(sub.ended_at.is_none());
    }

    #[test]
    fn should_leave_record_untouched_when_patch_is_invalid() {
        let mut sub = netflix();
        let before = sub.clone();

        let result = sub.apply(SubscriptionPatch {
            service_name: Some(String::new()),
            monthly_price: Some(1),
            ..SubscriptionPatch::default()
        });

        assert!(result.is_err());
        assert_eq!(sub, before);
    }

    #[test]
    fn should_serialize_months_as_year_first_and_omit_missing_end() {
        let sub = netflix();
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["started_at"], "2024-01");
        assert_eq!(json["monthly_price"], 1000);
        assert!(json.get("ended_at").is_none());
    }
}
