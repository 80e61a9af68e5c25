use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config;
use crate::db::models::UserRole;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Identity resolved from a verified credential. Role checks go through
/// the policy methods below rather than ad-hoc comparisons in handlers.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl Identity {
    pub fn require_student(&self) -> AppResult<()> {
        match self.role {
            UserRole::Student => Ok(()),
            _ => Err(AppError::Authorization(
                "only students can perform this action".into(),
            )),
        }
    }

    pub fn require_instructor(&self) -> AppResult<()> {
        match self.role {
            UserRole::Instructor | UserRole::Admin => Ok(()),
            _ => Err(AppError::Authorization(
                "only instructors can perform this action".into(),
            )),
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        match self.role {
            UserRole::Admin => Ok(()),
            _ => Err(AppError::Authorization("admin access required".into())),
        }
    }

    /// Courses are mutated only by their owning instructor or an admin.
    pub fn can_manage_course(&self, instructor_id: Uuid) -> bool {
        self.role == UserRole::Admin || self.id == instructor_id
    }

    /// Reviews are deleted only by their author or an admin.
    pub fn can_delete_review(&self, author_id: Uuid) -> bool {
        self.role == UserRole::Admin || self.id == author_id
    }
}

pub fn encode_token(
    user_id: Uuid,
    name: &str,
    role: UserRole,
    ttl_minutes: i64,
    secret: &[u8],
) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        role,
        iat: now,
        exp: now + ttl_minutes * 60,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::InternalServerError(format!("failed to sign token: {e}")))
}

pub fn decode_token(token: &str, secret: &[u8]) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Credential transport: `Authorization: Bearer` wins over a `token` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "token").then(|| value.to_string())
    })
}

fn identity_from_claims(claims: Claims) -> Option<Identity> {
    let id = Uuid::parse_str(&claims.sub).ok()?;
    Some(Identity {
        id,
        name: claims.name,
        role: claims.role,
    })
}

/// Optional-mode resolution: a missing, malformed or expired credential
/// degrades the caller to anonymous. Failures are swallowed here on
/// purpose; this must never reject a request.
pub fn resolve_optional(headers: &HeaderMap, secret: &[u8]) -> Option<Identity> {
    let token = token_from_headers(headers)?;
    let claims = decode_token(&token, secret).ok()?;
    identity_from_claims(claims)
}

/// Mandatory-mode resolution for state-mutating endpoints.
pub fn resolve_required(headers: &HeaderMap, secret: &[u8]) -> AppResult<Identity> {
    let token = token_from_headers(headers)
        .ok_or_else(|| AppError::Authentication("missing credential".into()))?;
    let claims = decode_token(&token, secret)
        .map_err(|_| AppError::Authentication("invalid or expired credential".into()))?;
    identity_from_claims(claims)
        .ok_or_else(|| AppError::Authentication("malformed credential subject".into()))
}

/// Extractor for endpoints that require an authenticated caller.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let secret = config::get().auth.jwt_secret.expose_secret().as_bytes();
        resolve_required(&parts.headers, secret).map(CurrentUser)
    }
}

/// Extractor for endpoints that personalize output but stay open to
/// guests: never rejects.
pub struct MaybeUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let secret = config::get().auth.jwt_secret.expose_secret().as_bytes();
        Ok(MaybeUser(resolve_optional(&parts.headers, secret)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &[u8] = b"test-secret";

    fn expired_token(secret: &[u8]) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            name: "Expired".into(),
            role: UserRole::Student,
            iat: now - 7200,
            exp: now - 3600,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn headers_with_bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let id = Uuid::new_v4();
        let token = encode_token(id, "Ada", UserRole::Instructor, 60, SECRET).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.role, UserRole::Instructor);
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let token = encode_token(Uuid::new_v4(), "Eve", UserRole::Student, 60, SECRET).unwrap();
        assert!(decode_token(&token, b"other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected_in_mandatory_mode() {
        let headers = headers_with_bearer(&expired_token(SECRET));
        let err = resolve_required(&headers, SECRET).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn expired_token_degrades_to_anonymous_in_optional_mode() {
        let headers = headers_with_bearer(&expired_token(SECRET));
        assert!(resolve_optional(&headers, SECRET).is_none());
    }

    #[test]
    fn garbage_token_degrades_to_anonymous_in_optional_mode() {
        let headers = headers_with_bearer("not-a-jwt");
        assert!(resolve_optional(&headers, SECRET).is_none());
    }

    #[test]
    fn missing_credential_resolves_to_anonymous_in_optional_mode() {
        assert!(resolve_optional(&HeaderMap::new(), SECRET).is_none());
    }

    #[test]
    fn token_is_read_from_cookie_when_no_bearer_header() {
        let token = encode_token(Uuid::new_v4(), "Bea", UserRole::Student, 60, SECRET).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; token={token}")).unwrap(),
        );
        assert!(resolve_optional(&headers, SECRET).is_some());
    }

    #[test]
    fn policy_checks_follow_role_and_ownership() {
        let owner = Uuid::new_v4();
        let instructor = Identity {
            id: owner,
            name: "Ida".into(),
            role: UserRole::Instructor,
        };
        let admin = Identity {
            id: Uuid::new_v4(),
            name: "Root".into(),
            role: UserRole::Admin,
        };
        let student = Identity {
            id: Uuid::new_v4(),
            name: "Sam".into(),
            role: UserRole::Student,
        };

        assert!(instructor.can_manage_course(owner));
        assert!(!instructor.can_manage_course(Uuid::new_v4()));
        assert!(admin.can_manage_course(owner));

        assert!(student.require_student().is_ok());
        assert!(instructor.require_student().is_err());
        assert!(instructor.require_instructor().is_ok());
        assert!(admin.require_instructor().is_ok());
        assert!(student.require_admin().is_err());

        assert!(student.can_delete_review(student.id));
        assert!(!student.can_delete_review(Uuid::new_v4()));
        assert!(admin.can_delete_review(student.id));
    }
}
