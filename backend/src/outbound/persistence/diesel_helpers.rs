//! Shared helpers for Diesel repository implementations.
//!
//! Diesel and pool failures are classified once here; each repository then
//! turns a [`StoreFailure`] into its own port error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to what repositories need to distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The database could not be reached or dropped the connection.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<diesel::result::Error> for StoreFailure {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

/// Convert a row count to the `i64` Diesel uses for `LIMIT`/`OFFSET`.
#[must_use]
pub(crate) fn to_sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Convert a `COUNT(*)` result back to a length.
#[must_use]
pub(crate) fn from_sql_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E, F>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: F,
) -> Result<Vec<T>, E>
where
    F: FnOnce(String) -> E,
{
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Group `(owner id, start time)` pairs by owner, keeping input order.
#[must_use]
pub(crate) fn group_show_times(
    pairs: Vec<(i32, DateTime<Utc>)>,
) -> HashMap<i32, Vec<DateTime<Utc>>> {
    let mut grouped: HashMap<i32, Vec<DateTime<Utc>>> = HashMap::new();
    for (owner, start_time) in pairs {
        grouped.entry(owner).or_default().push(start_time);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        assert_eq!(
            StoreFailure::from(PoolError::checkout("timed out")),
            StoreFailure::Connection("timed out".to_owned())
        );
    }

    #[rstest]
    fn missing_rows_are_query_failures() {
        assert_eq!(
            StoreFailure::from(diesel::result::Error::NotFound),
            StoreFailure::Query("record not found".to_owned())
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(10, 10)]
    fn counts_round_trip(#[case] raw: usize, #[case] expected: i64) {
        assert_eq!(to_sql_count(raw), expected);
        assert_eq!(from_sql_count(expected), raw);
    }

    #[rstest]
    fn negative_counts_read_as_empty() {
        assert_eq!(from_sql_count(-1), 0);
    }

    #[rstest]
    fn show_times_group_by_owner() {
        let early = DateTime::<Utc>::UNIX_EPOCH;
        let late = early + chrono::Duration::days(1);
        let grouped = group_show_times(vec![(1, early), (2, late), (1, late)]);
        assert_eq!(grouped.get(&1), Some(&vec![early, late]));
        assert_eq!(grouped.get(&2), Some(&vec![late]));
        assert_eq!(grouped.get(&3), None);
    }

    #[rstest]
    fn first_conversion_error_wins() {
        let rows = vec![Ok(1), Err("bad row".to_owned()), Err("worse row".to_owned())];
        let result: Result<Vec<i32>, String> = collect_rows(rows.into_iter(), |err| err);
        assert_eq!(result, Err("bad row".to_owned()));
    }
}
