use crate::HashError;

/// Password hasher trait
///
/// # Examples
///
/// ```
/// use storefront_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("Passw0rd").unwrap();
///
/// assert!(hasher.verify("Passw0rd", &hash).unwrap());
/// assert!(!hasher.verify("wrong", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hash a plaintext password into a PHC string
	fn hash(&self, password: &str) -> Result<String, HashError>;

	/// Check a plaintext password against a stored hash
	///
	/// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid PHC string.
	fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}

/// Argon2id password hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String, HashError> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::rng().fill_bytes(&mut salt_bytes);
		let salt =
			SaltString::encode_b64(&salt_bytes).map_err(|e| HashError::Salt(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| HashError::Hash(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed = PasswordHash::new(hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok())
	}
}
