//! Password hashing for the portal login.
//!
//! The portal expects `MD5(MD5(password) + timestamp)`, both digests as
//! uppercase hex. Only the first-stage digest is ever stored locally.

/// First-stage digest: uppercase hex MD5 of the plaintext password.
pub fn first_hash(password: &str) -> String {
    format!("{:X}", md5::compute(password.as_bytes()))
}

/// Second-stage digest sent to the portal.
pub fn second_hash(first_hash: &str, timestamp: u64) -> String {
    format!("{:X}", md5::compute(format!("{first_hash}{timestamp}")))
}

/// Both stages in one call.
pub fn hash_password(password: &str, timestamp: u64) -> String {
    second_hash(&first_hash(password), timestamp)
}

/// Current Unix time in seconds.
pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
