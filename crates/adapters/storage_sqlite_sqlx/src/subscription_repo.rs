//! `SQLite` implementation of [`SubscriptionRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use subtrack_app::ports::SubscriptionRepository;
use subtrack_domain::error::{ConflictError, SubtrackError};
use subtrack_domain::id::{SubscriptionId, UserId};
use subtrack_domain::subscription::Subscription;
use subtrack_domain::total::PriceTotalQuery;
use subtrack_domain::year_month::YearMonth;

use crate::error::StorageError;

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Months are stored as RFC 3339 text for the first day of the month, UTC.
fn encode_month(month: YearMonth) -> String {
    month.to_storage_value().to_rfc3339()
}

fn decode_month(raw: &str) -> Result<YearMonth, sqlx::Error> {
    let timestamp = chrono::DateTime::parse_from_rfc3339(raw).map_err(decode_error)?;
    Ok(YearMonth::from_storage_value(timestamp.to_utc()))
}

/// Wrapper for converting database rows into domain [`Subscription`].
struct Wrapper(Subscription);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let service_name: String = row.try_get("service_name")?;
        let monthly_price: i64 = row.try_get("monthly_price")?;
        let user_id: String = row.try_get("user_id")?;
        let started_at: String = row.try_get("started_at")?;
        let ended_at: Option<String> = row.try_get("ended_at")?;

        Ok(Self(Subscription {
            id: SubscriptionId::from_str(&id).map_err(decode_error)?,
            service_name,
            monthly_price,
            user_id: UserId::from_str(&user_id).map_err(decode_error)?,
            started_at: decode_month(&started_at)?,
            ended_at: ended_at.as_deref().map(decode_month).transpose()?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO subscriptions (id, service_name, monthly_price, user_id, started_at, ended_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM subscriptions WHERE id = ?";
const SELECT_BY_USER: &str = "SELECT * FROM subscriptions WHERE user_id = ?";
const EXISTS_FOR_SERVICE: &str =
    "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = ? AND service_name = ?)";
const UPDATE: &str = r"
    UPDATE subscriptions
    SET service_name = ?, monthly_price = ?, started_at = ?, ended_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM subscriptions WHERE id = ?";

/// Optional filters are bound as `NULL` when absent. Month bounds compare
/// `year * 100 + month` of `started_at` with [`YearMonth::sort_key`].
const SUM_PRICES: &str = r"
    SELECT COALESCE(SUM(monthly_price), 0) FROM subscriptions
    WHERE user_id = ?1
      AND (?2 IS NULL OR service_name = ?2)
      AND (?3 IS NULL OR CAST(strftime('%Y', started_at) AS INTEGER) * 100
                       + CAST(strftime('%m', started_at) AS INTEGER) >= ?3)
      AND (?4 IS NULL OR CAST(strftime('%Y', started_at) AS INTEGER) * 100
                       + CAST(strftime('%m', started_at) AS INTEGER) <= ?4)
";

/// `SQLite`-backed subscription repository.
pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SubscriptionRepository for SqliteSubscriptionRepository {
    fn create(
        &self,
        subscription: Subscription,
    ) -> impl Future<Output = Result<Subscription, SubtrackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(subscription.id.to_string())
                .bind(&subscription.service_name)
                .bind(subscription.monthly_price)
                .bind(subscription.user_id.to_string())
                .bind(encode_month(subscription.started_at))
                .bind(subscription.ended_at.map(encode_month))
                .execute(&pool)
                .await
                .map_err(StorageError::from);

            match result {
                Ok(_) => Ok(subscription),
                Err(err) if err.is_unique_violation() => Err(ConflictError {
                    user_id: subscription.user_id.to_string(),
                    service_name: subscription.service_name,
                }
                .into()),
                Err(err) => Err(err.into()),
            }
        }
    }

    fn get_by_id(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<Option<Subscription>, SubtrackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Subscription>, SubtrackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
                .bind(user_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn exists_for_service(
        &self,
        user_id: UserId,
        service_name: &str,
    ) -> impl Future<Output = Result<bool, SubtrackError>> + Send {
        let pool = self.pool.clone();
        let service_name = service_name.to_owned();
        async move {
            let exists: i64 = sqlx::query_scalar(EXISTS_FOR_SERVICE)
                .bind(user_id.to_string())
                .bind(service_name)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists != 0)
        }
    }

    fn update(
        &self,
        subscription: Subscription,
    ) -> impl Future<Output = Result<bool, SubtrackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&subscription.service_name)
                .bind(subscription.monthly_price)
                .bind(encode_month(subscription.started_at))
                .bind(subscription.ended_at.map(encode_month))
                .bind(subscription.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from);

            match result {
                Ok(done) => Ok(done.rows_affected() > 0),
                Err(err) if err.is_unique_violation() => Err(ConflictError {
                    user_id: subscription.user_id.to_string(),
                    service_name: subscription.service_name,
                }
                .into()),
                Err(err) => Err(err.into()),
            }
        }
    }

    fn delete(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<bool, SubtrackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let done = sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(done.rows_affected() > 0)
        }
    }

    fn sum_monthly_price(
        &self,
        query: PriceTotalQuery,
    ) -> impl Future<Output = Result<i64, SubtrackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let total: i64 = sqlx::query_scalar(SUM_PRICES)
                .bind(query.user_id.to_string())
                .bind(query.service_name)
                .bind(query.start.map(YearMonth::sort_key))
                .bind(query.end.map(YearMonth::sort_key))
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(total)
        }
    }
}
