//! Bearer-token check in front of the task routes.
//!
//! Tokens are issued by the external identity provider and signed with the
//! shared HS256 secret from settings. The `sub` claim is the owner id that
//! every task operation is scoped to.

use crate::{api_error::ApiError, app_state::SharedState, settings::Settings};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

/// Validated caller identity, placed in request extensions by [`auth_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedOwner(pub Uuid);

pub fn verify_token(token: &str, settings: &Settings) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &settings.jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    if let Some(issuer) = &settings.jwt_issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn auth_middleware(
    State(state): State<SharedState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid authorization header".to_string()))?;

    let claims = verify_token(token, &state.settings).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        ApiError::Unauthorized("Invalid token".to_string())
    })?;

    let owner_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

    request.extensions_mut().insert(AuthenticatedOwner(owner_id));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn settings() -> Settings {
        Settings::from_json(r#"{ "jwt_secret": "test-secret", "jwt_audience": "authenticated" }"#).unwrap()
    }

    fn token(secret: &str, sub: &str, aud: &str, expires_in: Duration) -> String {
        let claims = serde_json::json!({
            "sub": sub,
            "aud": aud,
            "role": "authenticated",
            "exp": (Utc::now() + expires_in).timestamp(),
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_a_token_signed_with_the_shared_secret() {
        let owner = Uuid::new_v4().to_string();
        let claims = verify_token(&token("test-secret", &owner, "authenticated", Duration::hours(1)), &settings()).unwrap();
        assert_eq!(claims.sub, owner);
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn rejects_wrong_secret_expired_and_wrong_audience() {
        let owner = Uuid::new_v4().to_string();
        let s = settings();
        assert!(verify_token(&token("other-secret", &owner, "authenticated", Duration::hours(1)), &s).is_err());
        assert!(verify_token(&token("test-secret", &owner, "authenticated", Duration::hours(-2)), &s).is_err());
        assert!(verify_token(&token("test-secret", &owner, "anon", Duration::hours(1)), &s).is_err());
    }
}
