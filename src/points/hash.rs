//! Identity hashing

use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Lowercase hex SHA-256 of `{server_id}{title}{discriminator}`
pub fn identity_hash(server_id: u32, title: &str, discriminator: impl Display) -> String {
    let digest = Sha256::digest(format!("{server_id}{title}{discriminator}").as_bytes());
    format!("{digest:x}")
}
