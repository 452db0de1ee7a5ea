use sea_orm::error::SqlxError;
use sea_orm::{DbErr, RuntimeErr, SqlErr};

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors surfaced by the schema and repository layer.
///
/// Store errors are classified, never swallowed and never retried here.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Schema error: {0}")]
    Schema(#[source] DbErr),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Connection error: {0}")]
    Connection(#[source] DbErr),

    #[error("Query error: {0}")]
    Query(#[source] DbErr),

    #[error("Invalid persisted data: {0}")]
    InvalidData(String),
}

impl CacheError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl From<DbErr> for CacheError {
    fn from(err: DbErr) -> Self {
        if matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
            return Self::Connection(err);
        }

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                return Self::ConstraintViolation(format!("duplicate key: {message}"));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                return Self::ConstraintViolation(message);
            }
            _ => {}
        }

        if let Some(message) = not_null_violation(&err) {
            return Self::ConstraintViolation(message);
        }

        Self::Query(err)
    }
}

// SQLITE_CONSTRAINT_NOTNULL and Postgres not_null_violation.
const NOT_NULL_CODES: [&str; 2] = ["1299", "23502"];

fn not_null_violation(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime,
        _ => return None,
    };

    match runtime {
        RuntimeErr::SqlxError(SqlxError::Database(db_err)) => {
            let code = db_err.code()?;
            NOT_NULL_CODES
                .iter()
                .any(|known| *known == code)
                .then(|| db_err.message().to_string())
        }
        _ => None,
    }
}
