use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// The authenticated principal of a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

/// Owners manage their own content; admins manage everything.
pub fn ensure_owner_or_admin(user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.user_id == owner_id || user.is_admin() {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

fn decode_bearer(auth_str: &str) -> Result<AuthUser, AppError> {
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    decode_token(token.trim(), &secret)
}

/// Validate a JWT signed with `secret` and read the principal from its claims.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::BadRequest("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

fn authorization_header(parts: &Parts) -> Result<Option<&str>, AppError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))
        })
        .transpose()
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_str = authorization_header(parts)?.ok_or(AppError::Unauthorized)?;
        decode_bearer(auth_str)
    }
}

/// Anonymous requests extract as `None`; a present but invalid token is
/// still rejected.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match authorization_header(parts)? {
            Some(auth_str) => decode_bearer(auth_str).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{models::User, services::auth_service::issue_token};

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "cook@example.com".into(),
            password_hash: String::new(),
            username: None,
            created_at: Utc::now(),
            role: role.into(),
        }
    }

    #[test]
    fn issued_token_decodes_to_the_same_principal() {
        let admin = user(ROLE_ADMIN);
        let token = issue_token(&admin, "kitchen-secret").unwrap();

        let decoded = decode_token(&token, "kitchen-secret").unwrap();
        assert_eq!(decoded.user_id, admin.id);
        assert_eq!(decoded.role, ROLE_ADMIN);
        assert!(decoded.is_admin());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token(&user(ROLE_USER), "kitchen-secret").unwrap();

        assert!(matches!(
            decode_token(&token, "other-secret"),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            decode_token("not-a-jwt", "kitchen-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn non_bearer_scheme_is_a_bad_request() {
        assert!(matches!(
            decode_bearer("Basic abc"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn owner_or_admin_guard() {
        let owner = Uuid::new_v4();
        let author = AuthUser {
            user_id: owner,
            role: ROLE_USER.into(),
        };
        let stranger = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_USER.into(),
        };
        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_ADMIN.into(),
        };

        assert!(ensure_owner_or_admin(&author, owner).is_ok());
        assert!(ensure_owner_or_admin(&admin, owner).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&stranger, owner),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(ensure_admin(&author), Err(AppError::Forbidden)));
    }
}
