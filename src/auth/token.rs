use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Token verification failures. Clients never learn which one happened; the
/// auth gate logs the reason and answers with a single unauthenticated
/// signal.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Wrong encoding or a required claim is missing.
    #[error("malformed token")]
    Malformed,
    /// Claims do not match the signature under the server secret, or the
    /// algorithm tag is not the one the server signs with.
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes.max(0) as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Validity is signature + expiry, nothing else. HS256 is the only
    /// accepted algorithm and expiry gets no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn past_claims(user_id: Uuid) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Claims {
            sub: user_id,
            iat: (now - 120) as usize,
            exp: (now - 60) as usize,
        }
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn expired_token_rejected() {
        let keys = make_keys();
        let token = encode(
            &Header::default(),
            &past_claims(Uuid::new_v4()),
            &keys.encoding,
        )
        .expect("encode");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[tokio::test]
    async fn tampered_payload_rejected() {
        let keys = make_keys();
        let first = keys.sign(Uuid::new_v4()).expect("sign first");
        let second = keys.sign(Uuid::new_v4()).expect("sign second");

        // Same header, second token's claims, first token's signature.
        let header = first.split('.').next().unwrap();
        let payload = second.split('.').nth(1).unwrap();
        let signature = first.split('.').nth(2).unwrap();
        let forged = format!("{header}.{payload}.{signature}");

        let err = keys.verify(&forged).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[tokio::test]
    async fn wrong_secret_rejected() {
        let keys = make_keys();
        let other = EncodingKey::from_secret(b"some-other-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now as usize,
            exp: (now + 300) as usize,
        };
        let token = encode(&Header::default(), &claims, &other).expect("encode");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[tokio::test]
    async fn wrong_algorithm_rejected() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now as usize,
            exp: (now + 300) as usize,
        };
        let token = encode(&Header::new(Algorithm::HS384), &claims, &keys.encoding)
            .expect("encode");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[tokio::test]
    async fn missing_exp_claim_is_malformed() {
        let keys = make_keys();
        let claims = serde_json::json!({ "sub": Uuid::new_v4(), "iat": 0 });
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[tokio::test]
    async fn garbage_is_malformed_not_a_panic() {
        let keys = make_keys();
        for garbage in ["", "not-a-token", "a.b", "a.b.c", "....."] {
            let err = keys.verify(garbage).unwrap_err();
            assert!(matches!(err, TokenError::Malformed));
        }
    }
}
