use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::error;

use crate::config::PasswordHashConfig;

/// Salted argon2id hashing with configurable cost.
///
/// Hashing is deliberately slow, so the async helpers move the work onto
/// the blocking pool instead of stalling the request executor.
#[derive(Clone)]
pub struct Hasher {
    params: Params,
    // hashed once with `params`; verified against when there is no real hash
    dummy_hash: Arc<str>,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl Hasher {
    pub fn new(cfg: &PasswordHashConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
            #[cfg(test)]
            verifications: Arc::new(AtomicUsize::new(0)),
        };
        hasher.dummy_hash = hasher.hash("userbase-dummy-password")?.into();
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// `Ok(false)` on mismatch; `Err` only if the stored hash is unparsable.
    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::Relaxed);

        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash_blocking(&self, plain: String) -> anyhow::Result<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plain)).await?
    }

    pub async fn verify_blocking(&self, plain: String, hash: String) -> anyhow::Result<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash)).await?
    }

    /// Spends the same work as a real verification when there is no stored
    /// hash, so a missing account costs as much as a wrong password.
    pub async fn verify_dummy_blocking(&self, plain: String) {
        let hash = self.dummy_hash.to_string();
        if let Err(e) = self.verify_blocking(plain, hash).await {
            error!(error = %e, "dummy password verification failed");
        }
    }

    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub(crate) fn cheap_hasher() -> Hasher {
    Hasher::new(&PasswordHashConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("cheap params are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Secur3P@ssw0rd!", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap_hasher().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn rejects_invalid_params() {
        let res = Hasher::new(&PasswordHashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(res.is_err());
    }

    #[test]
    fn dummy_hash_uses_configured_params() {
        let hasher = cheap_hasher();
        let parsed = PasswordHash::new(&hasher.dummy_hash).unwrap();
        let params = Params::try_from(&parsed).unwrap();
        assert_eq!(params.m_cost(), 8);
        assert_eq!(params.t_cost(), 1);
        assert_eq!(params.p_cost(), 1);
    }

    #[tokio::test]
    async fn dummy_verification_counts_as_a_verification() {
        let hasher = cheap_hasher();
        let shared = hasher.clone();
        hasher.verify_dummy_blocking("anything".into()).await;
        assert_eq!(shared.verifications(), 1);
    }

    #[tokio::test]
    async fn blocking_helpers_agree_with_sync_api() {
        let hasher = cheap_hasher();
        let hash = hasher.hash_blocking("secret1".into()).await.unwrap();
        assert!(hasher.verify_blocking("secret1".into(), hash.clone()).await.unwrap());
        assert!(!hasher.verify_blocking("secret2".into(), hash).await.unwrap());
    }
}
