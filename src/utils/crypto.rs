//! Cryptographic utilities

use crate::constants::CHECK_IN_TOKEN_BYTES;

/// Generate a random check-in token: 16 random bytes as 32 lowercase hex chars
pub fn generate_check_in_token() -> String {
    let bytes: [u8; CHECK_IN_TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_check_in_token() {
        let token1 = generate_check_in_token();
        let token2 = generate_check_in_token();

        assert_eq!(token1.len(), CHECK_IN_TOKEN_BYTES * 2);
        assert!(token1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token1, token2);
    }
}
