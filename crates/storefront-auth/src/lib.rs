//! # Storefront Auth
//!
//! Password hashing used when registering users and checking logins.
//!
//! [`Argon2Hasher`] produces salted Argon2id PHC strings; anything else can
//! be plugged in by implementing [`PasswordHasher`].

pub mod hasher;

pub use hasher::{Argon2Hasher, PasswordHasher};

/// Password hashing failures
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
	#[error("Failed to generate salt: {0}")]
	Salt(String),

	#[error("Failed to hash password: {0}")]
	Hash(String),

	/// The stored hash is not a valid PHC string
	#[error("Malformed password hash: {0}")]
	MalformedHash(String),
}
