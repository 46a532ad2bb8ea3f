use sha2::{Digest, Sha256};

/// Derive a ticket token from the member id, the row's position in the
/// store, and the current time in nanoseconds. The time component makes
/// repeated calls for the same member produce distinct tokens; collisions
/// are not formally prevented, just astronomically unlikely.
pub fn generate(member_id: &str, row_position: i64) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(member_id.as_bytes());
    hasher.update(row_position.to_le_bytes());
    hasher.update(nanos.to_le_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_hex_sha256() {
        let token = generate("m-001", 7);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn repeated_calls_differ() {
        // Nanosecond clock entropy; equal outputs would need two calls in
        // the same nanosecond.
        let a = generate("m-001", 1);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = generate("m-001", 1);
        assert_ne!(a, b);
    }
}
