//! Credential primitives library
//!
//! Provides the reusable building blocks for account services:
//! - Password hashing (Argon2id, per-call random salt)
//! - JWT encoding and decoding (HS256)
//! - Session token issuance and validation with a fixed lifetime
//!
//! Policy and orchestration live in the services; this crate only knows
//! about digests and signed tokens.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();
//! let hash = hasher.hash("Str0ng&Pass").unwrap();
//! assert!(hasher.verify("Str0ng&Pass", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let session = issuer.issue("Alice123!").unwrap();
//! let claims = issuer.validate(&session.token).unwrap();
//! assert_eq!(claims.subject(), "Alice123!");
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::SessionToken;
pub use issuer::TokenIssuer;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
