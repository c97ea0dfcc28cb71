use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

fn hasher(cost: u32) -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(Params::DEFAULT_M_COST, cost.max(1), Params::DEFAULT_P_COST, None)
        .map_err(|e| {
            error!(error = %e, "argon2 params error");
            anyhow::anyhow!(e.to_string())
        })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password with a fresh random salt. `cost` is the
/// iteration count; the salt and parameters end up embedded in the digest,
/// so the same plaintext hashes to a different digest every call.
pub fn hash(plain: &str, cost: u32) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher(cost)?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext against a stored digest. The digest carries its own
/// salt and parameters; comparison time does not depend on where a mismatch
/// occurs. Errors only on a digest that does not parse.
pub fn verify(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let digest = hash(password, 1).expect("hashing should succeed");
        assert!(verify(password, &digest).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let digest = hash(password, 1).expect("hashing should succeed");
        assert!(!verify("wrong-password", &digest).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_to_distinct_digests() {
        let password = "repeatable";
        let a = hash(password, 1).expect("first hash");
        let b = hash(password, 1).expect("second hash");
        assert_ne!(a, b);
        assert!(verify(password, &a).unwrap());
        assert!(verify(password, &b).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
