//! JWT access-token validation.
//!
//! Tokens are minted by the external auth provider and HS256-signed with
//! a shared secret; this server only ever validates them. The secret is
//! optional so deployments without accounts still boot, with every
//! authenticated route rejecting.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use fitcheck_core::types::RecordId;

/// JWT claims this server cares about.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id in the auth provider, reused as `user_id`.
    pub sub: RecordId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to verify tokens, when configured.
    pub secret: Option<String>,
}

impl JwtConfig {
    /// Load from the `JWT_SECRET` environment variable. Unset or empty
    /// means no secret, not an error.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn make_token(secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn valid_token_round_trips() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = make_token("secret", exp);
        let claims = validate_token(&token, "secret").expect("token should validate");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn wrong_secret_rejected() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = make_token("secret", exp);
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let token = make_token("secret", chrono::Utc::now().timestamp() - 3600);
        assert!(validate_token(&token, "secret").is_err());
    }
}
