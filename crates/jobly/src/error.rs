//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error types for fragment building and database operations
#[derive(Debug, Error)]
pub enum JoblyError {
    /// A partial update was requested with no fields
    #[error("No data")]
    EmptyPayload,

    /// Filter criteria contained a key the resource does not declare
    #[error("Unrecognized {resource} filter: {key}")]
    UnrecognizedFilter { resource: &'static str, key: String },

    /// A recognized filter carried a value its transform cannot accept
    #[error("Invalid value for filter '{filter}': {message}")]
    InvalidFilterValue { filter: &'static str, message: String },

    /// Validation error (identifiers, loose input values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller input rejected by a resource model
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or insufficient identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JoblyError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub(crate) fn invalid_filter_value(filter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFilterValue {
            filter,
            message: message.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Whether the error was caused by caller input.
    ///
    /// Client errors are never transient and must not be retried.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// HTTP-equivalent status for the route layer.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyPayload
            | Self::UnrecognizedFilter { .. }
            | Self::InvalidFilterValue { .. }
            | Self::Validation(_)
            | Self::BadRequest(_)
            | Self::ForeignKeyViolation(_)
            | Self::CheckViolation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::UniqueViolation(_) => 409,
            _ => 500,
        }
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
