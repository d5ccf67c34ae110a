use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::JwtConfig;

/// JWT payload: subject is the username; roles are the authority strings the
/// subject held at issuance. Roles are advisory — the authentication gate
/// re-derives them from the store on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub iat: usize,
    pub exp: usize,
}

/// A token that failed signature verification or is structurally malformed.
/// Expiry is not this error's concern; see [`JwtKeys::is_valid`].
#[derive(Debug, Error)]
#[error("invalid token: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// HS256 signing and verification keys, built once at startup from the
/// base64-encoded secret and held read-only for the process lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDuration,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> anyhow::Result<Self> {
        Ok(Self {
            encoding: EncodingKey::from_base64_secret(&cfg.secret)?,
            decoding: DecodingKey::from_base64_secret(&cfg.secret)?,
            ttl: TimeDuration::milliseconds(cfg.expiration_ms),
        })
    }

    /// Sign a token for the given subject carrying its authority strings.
    pub fn sign(&self, username: &str, roles: Vec<String>) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: username.to_string(),
            roles,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(subject = %username, "jwt signed");
        Ok(token)
    }

    // Signature and shape are always checked; expiry is checked separately in
    // is_valid so an expired token decodes rather than erroring.
    fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Extract the subject from a verified token. Fails on bad signatures and
    /// malformed tokens; an expired but authentic token still yields its
    /// subject.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.claims(token)?.sub)
    }

    /// A token is valid when its subject matches `expected_username` and the
    /// current instant is strictly before its expiry.
    pub fn is_valid(&self, token: &str, expected_username: &str) -> bool {
        match self.claims(token) {
            Ok(claims) => {
                let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
                claims.sub == expected_username && now < claims.exp
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_B64: &str = "am90dGVyLWp3dC1zaWduaW5nLXNlY3JldC0wMTIzNDU2Nzg5";
    const OTHER_SECRET_B64: &str = "YW4tZW50aXJlbHktZGlmZmVyZW50LXNpZ25pbmcta2V5";

    fn make_keys(secret: &str, expiration_ms: i64) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            expiration_ms,
        })
        .expect("keys from config")
    }

    #[test]
    fn sign_and_extract_subject() {
        let keys = make_keys(SECRET_B64, 60_000);
        let token = keys
            .sign("alice", vec!["ROLE_OWNER".into()])
            .expect("sign token");
        // Compact JWS: three base64url segments
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(keys.extract_subject(&token).expect("extract subject"), "alice");
    }

    #[test]
    fn fresh_token_is_valid_for_its_subject_only() {
        let keys = make_keys(SECRET_B64, 60_000);
        let token = keys.sign("alice", vec![]).expect("sign token");
        assert!(keys.is_valid(&token, "alice"));
        assert!(!keys.is_valid(&token, "bob"));
    }

    #[test]
    fn expired_token_is_invalid_but_still_decodes() {
        let keys = make_keys(SECRET_B64, -1_000);
        let token = keys.sign("alice", vec![]).expect("sign token");
        // Subject extraction ignores expiry
        assert_eq!(keys.extract_subject(&token).expect("extract subject"), "alice");
        // Validity does not
        assert!(!keys.is_valid(&token, "alice"));
    }

    #[test]
    fn wrong_key_fails_extraction() {
        let keys = make_keys(SECRET_B64, 60_000);
        let other = make_keys(OTHER_SECRET_B64, 60_000);
        let token = other.sign("alice", vec![]).expect("sign token");
        assert!(keys.extract_subject(&token).is_err());
        assert!(!keys.is_valid(&token, "alice"));
    }

    #[test]
    fn malformed_token_fails_extraction() {
        let keys = make_keys(SECRET_B64, 60_000);
        assert!(keys.extract_subject("not-a-jwt").is_err());
        assert!(keys.extract_subject("a.b.c").is_err());
    }

    #[test]
    fn tampered_payload_fails_extraction() {
        let keys = make_keys(SECRET_B64, 60_000);
        let token = keys.sign("alice", vec![]).expect("sign token");
        let mut parts: Vec<&str> = token.split('.').collect();
        let swapped = keys.sign("mallory", vec![]).expect("sign token");
        let other_parts: Vec<&str> = swapped.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");
        assert!(keys.extract_subject(&forged).is_err());
    }

    #[test]
    fn tokens_issued_at_different_instants_differ() {
        let keys = make_keys(SECRET_B64, 60_000);
        let first = keys.sign("alice", vec![]).expect("sign token");
        std::thread::sleep(std::time::Duration::from_millis(1_100));
        let second = keys.sign("alice", vec![]).expect("sign token");
        assert_ne!(first, second);
    }
}
