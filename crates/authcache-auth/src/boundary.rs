//! Response envelopes for an outer request boundary.
//!
//! No transport is implemented here; these types fix the header name and
//! JSON bodies a boundary layer produces from lookup results.

use serde::{Deserialize, Serialize};

use crate::account::AuthenticatedSession;
use crate::error::AuthError;

/// Response header carrying the issued token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Body returned after a successful authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl From<&AuthenticatedSession> for TokenResponse {
    fn from(session: &AuthenticatedSession) -> Self {
        Self {
            token: session.token.clone(),
        }
    }
}

/// Body returned for any failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<&AuthError> for ErrorBody {
    fn from(err: &AuthError) -> Self {
        Self {
            message: err.public_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;

    #[test]
    fn test_token_response_shape() {
        let session = AuthenticatedSession {
            id: AccountId(1),
            email: "a@x.com".to_string(),
            token: "t".to_string(),
        };
        let json = serde_json::to_value(TokenResponse::from(&session)).unwrap();
        assert_eq!(json, serde_json::json!({"token": "t"}));
    }

    #[test]
    fn test_error_body_hides_storage_detail() {
        let body = ErrorBody::from(&AuthError::storage("relation \"users\" does not exist"));
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"message": "Server Error."})
        );
    }

    #[test]
    fn test_error_body_keeps_validation_message() {
        let body = ErrorBody::from(&AuthError::validation("Email is missing."));
        assert_eq!(body.message, "Email is missing.");
    }
}
