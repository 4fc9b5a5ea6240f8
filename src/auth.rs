use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::SharedData;
use crate::routing_utils::UnauthorizedResponse;

/// Claims carried by session tokens minted by the external identity provider.
/// `sub` is the authenticated user's ID, which becomes the owner scope for
/// every storage operation.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Holds the key material needed to validate incoming session tokens
pub struct SessionKeys {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    /// Builds validation keys from the HS256 secret shared with the identity provider
    pub fn new(secret: &str) -> SessionKeys {
        SessionKeys {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Validates a raw token and extracts its claims
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}

/// The authenticated caller of a request, extracted from the bearer token on the
/// Authorization header. Requests without a valid token are rejected with a 401
/// before the handler runs.
pub struct Session {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<Arc<SharedData>> for Session {
    type Rejection = UnauthorizedResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<SharedData>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(UnauthorizedResponse)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .filter(|token| !token.trim().is_empty())
            .ok_or(UnauthorizedResponse)?;

        let claims = state.session_keys.verify(token).map_err(|decode_err| {
            debug!("Rejected session token: {decode_err}");
            UnauthorizedResponse
        })?;

        Ok(Session {
            user_id: claims.sub,
        })
    }
}

#[cfg(any(test, feature = "integration_test"))]
pub mod test_util {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    /// Mints a session token the way the external identity provider would.
    /// Only used by tests; the running service never signs tokens.
    pub fn mint_token(user_id: Uuid, secret: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token signing should not fail")
    }
}
