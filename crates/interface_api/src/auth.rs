//! Authentication and authorization

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (API consumer)
    pub sub: String,
    /// Consumer roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

/// Creates a signed token for an API consumer
pub fn create_token(
    consumer: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: consumer.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a token and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if the consumer has a role; `admin` has all of them
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == "admin")
}

pub fn require_role(claims: &Claims, required_role: &str) -> Result<(), AuthError> {
    if has_role(claims, required_role) {
        Ok(())
    } else {
        Err(AuthError::MissingPermission(required_role.to_string()))
    }
}

/// Permission definitions
pub mod permissions {
    pub const APPEALS_READ: &str = "appeals:read";
    pub const REVIEWS_READ: &str = "reviews:read";
    pub const REVIEWS_SYNC: &str = "reviews:sync";
    pub const STATS_READ: &str = "stats:read";
    pub const STATS_WRITE: &str = "stats:write";
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_roles() {
        let token = create_token("vets-gov", vec![permissions::APPEALS_READ.to_string()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "vets-gov");
        assert!(has_role(&claims, permissions::APPEALS_READ));
        assert!(!has_role(&claims, permissions::STATS_WRITE));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token("vets-gov", vec![], SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_admin_has_every_role() {
        let claims = Claims {
            sub: "ops".to_string(),
            roles: vec!["admin".to_string()],
            exp: 0,
            iat: 0,
        };
        assert!(require_role(&claims, permissions::STATS_WRITE).is_ok());
    }

    proptest! {
        #[test]
        fn granted_roles_survive_the_token(
            consumer in "[a-z][a-z0-9-]{0,20}",
            grant_read in any::<bool>(),
            grant_write in any::<bool>(),
        ) {
            let mut roles = Vec::new();
            if grant_read {
                roles.push(permissions::STATS_READ.to_string());
            }
            if grant_write {
                roles.push(permissions::STATS_WRITE.to_string());
            }
            let token = create_token(&consumer, roles, SECRET, 60).unwrap();
            let claims = validate_token(&token, SECRET).unwrap();

            prop_assert_eq!(&claims.sub, &consumer);
            prop_assert_eq!(has_role(&claims, permissions::STATS_READ), grant_read);
            prop_assert_eq!(require_role(&claims, permissions::STATS_WRITE).is_ok(), grant_write);
        }
    }
}
