/// Authentication utilities
///
/// # Modules
///
/// - `jwt`: HS256 token creation and validation
/// - `password`: Argon2id hashing and the password policy
/// - `middleware`: bearer-token middleware resolving tokens to principals

pub mod jwt;
pub mod middleware;
pub mod password;
