//! Stateless token issuing and verification.

pub mod jwt;

pub use jwt::{IdentityClaims, JwtError, JwtTokenIssuer};

use crate::account::AccountId;

/// The identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: AccountId,
    pub email: String,
}

/// Issues and verifies signed identity tokens.
pub trait TokenIssuer: Send + Sync {
    /// Signs a token for the given identity.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    fn issue(&self, identity: &Identity) -> Result<String, JwtError>;

    /// Checks signature, issuer and expiry and returns the claims.
    ///
    /// # Errors
    /// Returns [`JwtError::Expired`] for expired tokens and another variant
    /// for any other rejection.
    fn verify(&self, token: &str) -> Result<IdentityClaims, JwtError>;
}
