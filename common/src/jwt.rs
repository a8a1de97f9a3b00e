use actix_web::{HttpMessage, HttpResponse, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Res};

pub const ROLE_ANON: &str = "anon";
pub const ROLE_AUTHENTICATED: &str = "authenticated";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Claims carried by every bearer token.
///
/// Storefront visitors hold an `anon` token without a subject; store owners
/// and platform admins carry their user id in `sub`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Uuid>,
    pub role: String,
    pub exp: usize,
}

impl JwtClaims {
    /// Returns the user id, or 401 for anonymous tokens.
    pub fn user_id(&self) -> Res<Uuid> {
        self.sub
            .ok_or_else(|| AppError::Unauthorized("A signed-in user is required".to_string()))
    }

    pub fn require_role(&self, role: &str) -> Res<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("Role '{}' is required", role)))
        }
    }
}

/// Signs a token for `sub`/`role` valid for `ttl_hours`.
pub fn generate_jwt(sub: Option<Uuid>, role: &str, ttl_hours: i64, secret: &str) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal("Token expiration overflow".to_string()))?
        .timestamp();

    let claims = JwtClaims {
        sub,
        role: role.to_string(),
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

pub fn get_jwt_claims_or_error(req: &ServiceRequest) -> Result<JwtClaims, HttpResponse> {
    if let Some(jwt_claims_res) = req.extensions().get::<Res<JwtClaims>>() {
        match jwt_claims_res {
            Ok(claims) => Ok(claims.clone()),
            Err(app_error) => Err(app_error.to_http_response()),
        }
    } else {
        Err(
            AppError::Unauthorized("No authorization token provided".to_string())
                .to_http_response(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn anon_token_round_trips_without_subject() {
        let token = generate_jwt(None, ROLE_ANON, 1, SECRET).unwrap();
        let claims = validate_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.role, ROLE_ANON);
        assert!(claims.sub.is_none());
        assert!(claims.user_id().is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_jwt(Some(Uuid::new_v4()), ROLE_AUTHENTICATED, 1, "other").unwrap();
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_jwt(Some(Uuid::new_v4()), ROLE_AUTHENTICATED, -2, SECRET).unwrap();
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn role_check() {
        let claims = JwtClaims {
            sub: Some(Uuid::new_v4()),
            role: ROLE_AUTHENTICATED.to_string(),
            exp: 0,
        };
        assert!(claims.require_role(ROLE_AUTHENTICATED).is_ok());
        assert!(matches!(
            claims.require_role(ROLE_SUPER_ADMIN),
            Err(AppError::Forbidden(_))
        ));
    }
}
