use std::future::{Ready, ready};

use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;

/// Cookie set by the auth service for the shared domain.
pub const AUTH_COOKIE: &str = "token";

/// Claims carried by the auth-service JWT.
///
/// Credentials never touch this application; the identity provider
/// authenticates the vendor and issues this token for the shared domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Stable identity reference assigned by the auth service.
    pub sub: String,
    /// Email address of the vendor.
    pub email: String,
    /// Display name of the vendor.
    pub name: String,
    /// Expiration timestamp (seconds since the epoch).
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Validate a JWT and return its claims.
    pub fn from_token(token: &str, secret: &str) -> Option<Self> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }

    /// Sign the claims into a JWT. Used by tests standing in for the auth service.
    pub fn to_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req
            .app_data::<web::Data<ServerConfig>>()
            .and_then(|config| {
                req.cookie(AUTH_COOKIE)
                    .and_then(|cookie| Self::from_token(cookie.value(), &config.secret))
            });

        ready(claims.ok_or_else(|| ErrorUnauthorized("authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "auth0|123".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            exp: 4_102_444_800, // 2100-01-01
        }
    }

    #[test]
    fn token_round_trip() {
        let token = claims().to_token("secret").expect("sign token");
        let decoded = AuthenticatedUser::from_token(&token, "secret").expect("valid token");

        assert_eq!(decoded.sub, "auth0|123");
        assert_eq!(decoded.email, "vendor@example.com");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = claims().to_token("secret").expect("sign token");

        assert!(AuthenticatedUser::from_token(&token, "other").is_none());
    }
}
