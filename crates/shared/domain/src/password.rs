//! Password value object and the Argon2 hasher that produces it.
//!
//! A `Password` only ever holds a PHC-formatted hash. The plaintext is
//! passed by reference into `PasswordHasher::hash` / `verify` and never kept.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{DomainError, DomainResult};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. Only for tests and throwaway local runs.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashed password value object.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

/// Salted one-way password hashing (Argon2id).
///
/// Cloning is cheap; the Argon2 instance only carries parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    cost: HashCost,
    decoy: std::sync::Arc<Password>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}

impl PasswordHasher {
    /// Build a hasher with the given cost.
    ///
    /// Also hashes the decoy used by `verify_decoy`, so construction costs
    /// one full hash.
    ///
    /// # Errors
    /// Returns `DomainError::Password` if Argon2 rejects the parameters.
    pub fn new(cost: HashCost) -> DomainResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| DomainError::password(format!("Invalid hash parameters: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, DECOY_PASSWORD)?;

        Ok(Self {
            argon2,
            cost,
            decoy: std::sync::Arc::new(decoy),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plain_text: &str) -> DomainResult<Password> {
        hash_with(&self.argon2, plain_text)
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Uses the parameters embedded in the hash. Malformed hashes never verify.
    pub fn verify(&self, plain_text: &str, password: &Password) -> bool {
        match PasswordHash::new(&password.hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Run a verification that always fails, at the same cost as a real one.
    ///
    /// Login uses this for unknown emails so timing does not leak account existence.
    pub fn verify_decoy(&self, plain_text: &str) -> bool {
        let _ = self.verify(plain_text, &self.decoy);
        false
    }
}

/// Plaintext behind the decoy hash. Never issued to any account.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

fn hash_with(argon2: &Argon2<'_>, plain_text: &str) -> DomainResult<Password> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;

    Ok(Password {
        hash: hash.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost::minimal()).unwrap()
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = hasher();
        let password = hasher.hash("secret1").unwrap();

        assert!(hasher.verify("secret1", &password));
        assert!(!hasher.verify("secret2", &password));
    }

    #[test]
    fn test_hash_never_equals_plaintext() {
        let password = hasher().hash("secret1").unwrap();
        assert_ne!(password.as_str(), "secret1");
        assert!(password.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = hasher();
        let pass1 = hasher.hash("SamePassword123").unwrap();
        let pass2 = hasher.hash("SamePassword123").unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1.as_str(), pass2.as_str());
        // But both verify correctly
        assert!(hasher.verify("SamePassword123", &pass1));
        assert!(hasher.verify("SamePassword123", &pass2));
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        let cheap = hasher();
        let other = PasswordHasher::new(HashCost {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        let password = other.hash("secret1").unwrap();
        assert!(cheap.verify("secret1", &password));
    }

    #[test]
    fn test_password_from_hash() {
        let hasher = hasher();
        let hash = hasher.hash("TestPassword123").unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(hasher.verify("TestPassword123", &restored));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let hasher = hasher();
        assert!(!hasher.verify("secret1", &Password::from_hash("not-a-phc-string")));
    }

    #[test]
    fn test_decoy_never_verifies() {
        let hasher = hasher();
        assert!(!hasher.verify_decoy(DECOY_PASSWORD));
        assert!(!hasher.verify_decoy("anything"));
    }

    #[test]
    fn test_decoy_hashed_at_construction() {
        let hasher = hasher();
        assert!(hasher.decoy.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(DECOY_PASSWORD, &hasher.decoy));

        // Clones share the decoy built once by `new`
        let clone = hasher.clone();
        assert!(std::sync::Arc::ptr_eq(&hasher.decoy, &clone.decoy));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = hasher().hash("secret1").unwrap();
        let debug = format!("{:?}", password);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("argon2"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = PasswordHasher::new(HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(DomainError::Password(_))));
    }
}
