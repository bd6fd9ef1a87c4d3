//! Error types for the credential lookup.
//!
//! Every failure the lookup can report is an [`AuthError`]. Collaborator
//! backends map their own errors into this taxonomy at the trait seam, so
//! callers only ever match on one enum.

use std::fmt;

/// Fixed message returned to callers for every server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error.";

/// Errors that can occur while registering, authenticating or revoking accounts.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required input field was missing or blank.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the missing or invalid field.
        message: String,
    },

    /// The requested account does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found.
        message: String,
    },

    /// The supplied password does not match the stored hash.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An account with the same email already exists.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The bearer token is malformed, tampered with or issued by someone else.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The bearer token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The credential store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The session cache failed.
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error.
        message: String,
    },

    /// The token issuer could not sign a token.
    #[error("Signing error: {message}")]
    Signing {
        /// Description of the signing error.
        message: String,
    },

    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An invariant was violated (hashing failure, task panic, ...).
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Cache` error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Creates a new `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The canonical "account does not exist" error.
    #[must_use]
    pub fn user_not_found() -> Self {
        Self::not_found("User not found")
    }

    /// Returns `true` if this is a `NotFound` error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the caller caused this error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound { .. }
                | Self::InvalidCredentials
                | Self::Conflict { .. }
                | Self::InvalidToken { .. }
                | Self::TokenExpired
        )
    }

    /// Returns `true` if a collaborator or invariant failed (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidCredentials | Self::InvalidToken { .. } | Self::TokenExpired => {
                ErrorCategory::Authentication
            }
            Self::Conflict { .. } => ErrorCategory::Validation,
            Self::Storage { .. } | Self::Cache { .. } => ErrorCategory::Infrastructure,
            Self::Signing { .. } | Self::Internal { .. } => ErrorCategory::Internal,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }

    /// Returns a stable machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Conflict { .. } => "CONFLICT",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Cache { .. } => "CACHE_ERROR",
            Self::Signing { .. } => "SIGNING_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code a boundary layer should answer with.
    ///
    /// `NotFound` depends on the operation: a missing account on revoke is a
    /// plain 404, and authenticate keeps reporting 404 so existing clients can
    /// tell "no such account" apart from a wrong password.
    #[must_use]
    pub fn status_code(&self, operation: Operation) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => match operation {
                Operation::VerifyToken => 401,
                Operation::Register | Operation::Authenticate | Operation::Revoke => 404,
            },
            Self::InvalidCredentials | Self::InvalidToken { .. } | Self::TokenExpired => 401,
            Self::Conflict { .. } => 409,
            Self::Storage { .. }
            | Self::Cache { .. }
            | Self::Signing { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => 500,
        }
    }

    /// Message that is safe to show to the caller.
    ///
    /// Server-side errors never expose collaborator text.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::NotFound { message }
            | Self::Conflict { message } => message.clone(),
            Self::InvalidCredentials => "Invalid credentials.".to_string(),
            Self::InvalidToken { .. } => "Invalid token.".to_string(),
            Self::TokenExpired => "Token expired.".to_string(),
            Self::Storage { .. }
            | Self::Cache { .. }
            | Self::Signing { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

/// The lookup operation an error was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Account creation.
    Register,
    /// Email/password login.
    Authenticate,
    /// Account deletion.
    Revoke,
    /// Bearer token verification.
    VerifyToken,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => write!(f, "register"),
            Self::Authenticate => write!(f, "authenticate"),
            Self::Revoke => write!(f, "revoke"),
            Self::VerifyToken => write!(f, "verify_token"),
        }
    }
}

/// Categories of lookup errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller input was missing or invalid.
    Validation,
    /// The account does not exist.
    NotFound,
    /// Credentials or tokens were rejected.
    Authentication,
    /// Store or cache failures.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Authentication => write!(f, "authentication"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::validation("Email is missing.");
        assert_eq!(err.to_string(), "Validation error: Email is missing.");

        let err = AuthError::InvalidCredentials;
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = AuthError::storage("connection refused");
        assert_eq!(err.to_string(), "Storage error: connection refused");
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::user_not_found().is_not_found());
        assert!(AuthError::user_not_found().is_client_error());
        assert!(AuthError::InvalidCredentials.is_client_error());
        assert!(AuthError::TokenExpired.is_client_error());

        assert!(AuthError::storage("down").is_server_error());
        assert!(AuthError::signing("bad key").is_server_error());
        assert!(AuthError::cache("timeout").is_server_error());
        assert!(!AuthError::internal("boom").is_client_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::validation("x").status_code(Operation::Register),
            400
        );
        assert_eq!(
            AuthError::user_not_found().status_code(Operation::Revoke),
            404
        );
        assert_eq!(
            AuthError::user_not_found().status_code(Operation::Authenticate),
            404
        );
        assert_eq!(
            AuthError::user_not_found().status_code(Operation::VerifyToken),
            401
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(Operation::Authenticate),
            401
        );
        assert_eq!(
            AuthError::conflict("dup").status_code(Operation::Register),
            409
        );
        assert_eq!(
            AuthError::signing("bad key").status_code(Operation::Authenticate),
            500
        );
        assert_eq!(
            AuthError::storage("down").status_code(Operation::Register),
            500
        );
    }

    #[test]
    fn test_public_message_hides_server_details() {
        let err = AuthError::storage("password authentication failed for user \"postgres\"");
        assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);

        let err = AuthError::signing("InvalidKeyFormat");
        assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);

        let err = AuthError::validation("Password is missing.");
        assert_eq!(err.public_message(), "Password is missing.");

        assert_eq!(AuthError::user_not_found().public_message(), "User not found");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::validation("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AuthError::InvalidCredentials.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::cache("x").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(AuthError::signing("x").category(), ErrorCategory::Internal);
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
        assert_eq!(AuthError::user_not_found().error_code(), "NOT_FOUND");
        assert_eq!(AuthError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(Operation::Authenticate.to_string(), "authenticate");
    }
}
