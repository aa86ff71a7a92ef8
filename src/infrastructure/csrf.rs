//! Anti-forgery form tokens
//!
//! A token is the hex HMAC-SHA256 of the session id. It is stable for the
//! life of a session and cannot be computed without the CSRF key.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(key: &[u8], session_id: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(session_id.as_bytes());
    mac
}

pub fn token_for(key: &[u8], session_id: &str) -> String {
    hex::encode(mac_for(key, session_id).finalize().into_bytes())
}

/// Constant-time check of a submitted token
pub fn verify(key: &[u8], session_id: &str, token: &str) -> bool {
    match hex::decode(token) {
        Ok(bytes) => mac_for(key, session_id).verify_slice(&bytes).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_for_its_session_only() {
        let token = token_for(b"key", "session-a");
        assert_eq!(token.len(), 64);
        assert!(verify(b"key", "session-a", &token));
        assert!(!verify(b"key", "session-b", &token));
        assert!(!verify(b"other-key", "session-a", &token));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(!verify(b"key", "session-a", ""));
        assert!(!verify(b"key", "session-a", "not hex"));
        assert!(!verify(b"key", "session-a", "abcd"));
    }
}
