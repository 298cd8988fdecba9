//! HS256 session tokens and the `session` cookie.
//!
//! The web client never parses the cookie; it only checks presence before
//! attempting a resume. The server validates signature and expiry whenever
//! a handler needs the authenticated subject.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spendflix_core::types::DbId;

/// Name of the session cookie issued to the browser.
pub const SESSION_COOKIE: &str = "session";

/// Default session lifetime in minutes.
const DEFAULT_EXPIRY_MINS: i64 = 60;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the linked user's database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit trails.
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in minutes (default: 60).
    pub expiry_mins: i64,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `SESSION_SECRET`      | **yes**  | --      |
    /// | `SESSION_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let expiry_mins: i64 = std::env::var("SESSION_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_MINS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            expiry_mins,
        }
    }
}

/// Mint an HS256 session token for a linked user.
pub fn generate_session_token(
    user_id: DbId,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.expiry_mins * 60;

    let claims = Claims {
        sub: user_id,
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// `Set-Cookie` value that installs the session cookie.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.expiry_mins * 60
    )
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session cookie value from a `Cookie` header.
///
/// Returns `None` when no `session` cookie is present. An empty value counts
/// as absent (it is what [`clear_session_cookie`] leaves behind).
pub fn session_cookie_value(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|part| {
        let value = part.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('=')?;
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 60,
        }
    }

    #[test]
    fn test_generate_and_validate_session_token() {
        let config = test_config();
        let token =
            generate_session_token(42, &config).expect("token generation should succeed");

        let claims = validate_session_token(&token, &config)
            .expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let config = test_config();
        let token = generate_session_token(42, &config).unwrap();

        let other = SessionConfig {
            secret: "a-completely-different-secret-value-here".to_string(),
            expiry_mins: 60,
        };
        assert!(validate_session_token(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Issue a token that expired two hours ago (past the default leeway).
        let config = SessionConfig {
            secret: test_config().secret,
            expiry_mins: -120,
        };
        let token = generate_session_token(42, &config).unwrap();

        assert!(validate_session_token(&token, &config).is_err());
    }

    #[test]
    fn test_session_cookie_value_parses_among_other_cookies() {
        let header = "theme=dark; session=abc.def.ghi; lang=pt-BR";
        assert_eq!(session_cookie_value(header), Some("abc.def.ghi"));
    }

    #[test]
    fn test_session_cookie_value_absent() {
        assert_eq!(session_cookie_value("theme=dark; lang=pt-BR"), None);
        assert_eq!(session_cookie_value(""), None);
        // A cleared cookie counts as absent.
        assert_eq!(session_cookie_value("session="), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let config = test_config();
        let cookie = session_cookie("tok", &config);
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
