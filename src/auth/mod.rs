//! Authentication and authorization for Grove
//!
//! Provides:
//! - JWT session token generation and validation
//! - Password hashing with Argon2
//! - Permission levels and the admin allow-list

pub mod jwt;
pub mod password;
pub mod permissions;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenInput};
pub use password::{hash_password, verify_password};
pub use permissions::{level_for_email, PermissionLevel};
