use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub role: String,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AcademyError::authentication("Invalid user ID in token"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static [u8] {
        AppConfig::get().jwt.secret.as_bytes()
    }

    pub fn access_token_ttl() -> chrono::TimeDelta {
        chrono::TimeDelta::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    fn issue(
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: chrono::TimeDelta,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret()),
        )
        .map_err(|e| AcademyError::authentication(format!("Failed to sign token: {e}")))
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> Result<String> {
        Self::issue(user_id, role, TokenKind::Access, Self::access_token_ttl())
    }

    /// 未指定有效期时使用 `jwt.refresh_token_expiry` 天
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        expiry: Option<chrono::TimeDelta>,
    ) -> Result<String> {
        let ttl = expiry.unwrap_or_else(|| {
            chrono::TimeDelta::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Self::issue(user_id, role, TokenKind::Refresh, ttl)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_expiry: Option<chrono::TimeDelta>,
    ) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_expiry)?,
        })
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AcademyError::authentication(format!("Invalid token: {e}")))?;

        if claims.token_type != expected {
            return Err(AcademyError::authentication("Unexpected token type"));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// 用 refresh token 换新的 access token
    pub fn refresh_access_token(refresh_token: &str) -> Result<String> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        Self::generate_access_token(claims.user_id()?, &claims.role)
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age: chrono::TimeDelta,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip() {
        let token = JwtUtils::generate_access_token(42, "student").unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "student");
    }

    #[test]
    fn test_token_kind_is_enforced() {
        let pair = JwtUtils::generate_token_pair(7, "admin", None).unwrap();
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());

        let renewed = JwtUtils::refresh_access_token(&pair.refresh_token).unwrap();
        assert_eq!(JwtUtils::verify_access_token(&renewed).unwrap().sub, "7");
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            JwtUtils::verify_access_token("not.a.token"),
            Err(AcademyError::Authentication(_))
        ));
    }
}
