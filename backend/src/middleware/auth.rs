//! Authentication middleware
//!
//! Token issuance and session management live in the platform's identity
//! service; this middleware only validates the externally issued JWT and
//! exposes the caller's identity for audit stamping on ledger writes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};

use crate::error::{AppError, ErrorDetail, ErrorResponse};
use crate::AppState;

/// Authenticated user information extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub display_name: Option<String>,
}

/// Authentication middleware that validates bearer tokens against the
/// configured validation secret
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return Err(AppError::Unauthorized(
                "Missing or invalid Authorization header".to_string(),
            ))
        }
    };

    let claims = decode_jwt(token, &state.config.jwt.secret)?;

    let user_id = uuid::Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

    let auth_user = AuthUser {
        user_id,
        display_name: claims.name,
    };

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// JWT claims structure (subset of what the identity service issues)
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    name: Option<String>,
    exp: i64,
    iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

/// Extractor for the authenticated user.
/// Use this in handlers to get the current user.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_signed_with(secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "5f7b1c2e-9d7a-4c23-8a6f-0f3f6f2b5c11".to_string(),
            name: Some("Site Manager".to_string()),
            exp: now + 3600,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_tokens_signed_with_the_configured_secret() {
        let claims = decode_jwt(&token_signed_with("configured-secret"), "configured-secret")
            .unwrap();
        assert_eq!(claims.name.as_deref(), Some("Site Manager"));
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        // A token minted with the development default must not validate
        // against a deployment's configured secret.
        let forged = token_signed_with("development-secret-key");
        assert!(decode_jwt(&forged, "configured-secret").is_err());
    }

    #[test]
    fn invalid_tokens_map_to_unauthorized() {
        let response = AppError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
