//! Expiry inspection for the backend's bearer credential.
//!
//! The credential is a standard three-part signed token (JWT) with an
//! embedded `exp` claim. The client never verifies the signature — it
//! holds no key, and the server re-checks every request anyway. What the
//! client *does* need, before trusting a persisted credential at
//! startup, is to know whether the token has already lapsed.
//!
//! The check is deliberately strict about failure: a credential that
//! cannot be decoded is treated exactly like one that has expired. Both
//! mean "throw it away and sign in again."
//!
//! [`is_expired_at`] is pure — it takes the current time as an argument
//! so tests never have to sleep or fake a clock.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::TokenError;

/// The claims the client reads out of a credential.
///
/// Only `exp` matters here; everything else the server embedded is kept
/// in `extra` for callers that want to peek (and for logging).
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Expiry, in seconds since the Unix epoch.
    pub exp: i64,

    /// Remaining claims, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decodes a credential's claims without verifying its signature.
///
/// # Errors
/// Returns [`TokenError::Malformed`] if the token is not a well-formed
/// three-part token or its payload lacks an `exp` claim.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    // Signature validation is disabled on purpose: the client has no
    // key material, and a forged expiry only lets an attacker log
    // themselves out later than they should — the server still rejects
    // the request. Expiry itself is checked by the caller against an
    // explicit clock, so it's turned off here too.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data =
        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Returns `true` if the credential is expired as of `now` (seconds
/// since the Unix epoch).
///
/// Malformed credentials count as expired. Pure — no clock access, no
/// side effects.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp < now,
        Err(_) => true,
    }
}

/// Returns `true` if the credential is expired right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now().timestamp())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use super::*;

    /// Mints a signed token whose `exp` is `offset_secs` away from a
    /// fixed reference instant. The signing key is irrelevant — the
    /// decoder ignores signatures.
    fn mint(exp: i64) -> String {
        encode(
            &Header::default(),
            &json!({ "exp": exp, "sub": "5", "role": "client" }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("token should encode")
    }

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_decode_claims_reads_exp_and_extras() {
        let token = mint(NOW + 600);
        let claims = decode_claims(&token).expect("should decode");

        assert_eq!(claims.exp, NOW + 600);
        assert_eq!(claims.extra["sub"], "5");
        assert_eq!(claims.extra["role"], "client");
    }

    #[test]
    fn test_decode_claims_rejects_garbage() {
        assert!(decode_claims("not-a-token").is_err());
        assert!(decode_claims("a.b.c").is_err());
        assert!(decode_claims("").is_err());
    }

    #[test]
    fn test_decode_claims_rejects_missing_exp() {
        let token = encode(
            &Header::default(),
            &json!({ "sub": "5" }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(decode_claims(&token).is_err());
    }

    #[test]
    fn test_is_expired_at_future_exp_is_live() {
        let token = mint(NOW + 3600);
        assert!(!is_expired_at(&token, NOW));
    }

    #[test]
    fn test_is_expired_at_past_exp_is_expired() {
        let token = mint(NOW - 1);
        assert!(is_expired_at(&token, NOW));
    }

    #[test]
    fn test_is_expired_at_exact_boundary_is_live() {
        // `exp == now` is the last instant the credential is valid —
        // expiry is strictly `exp < now`, mirroring the original check.
        let token = mint(NOW);
        assert!(!is_expired_at(&token, NOW));
    }

    #[test]
    fn test_is_expired_at_malformed_counts_as_expired() {
        assert!(is_expired_at("definitely not a jwt", NOW));
        assert!(is_expired_at("", NOW));
    }

    #[test]
    fn test_is_expired_uses_wall_clock() {
        // A token expiring an hour from now must be live; one that
        // expired an hour ago must not.
        let live = mint(Utc::now().timestamp() + 3600);
        let dead = mint(Utc::now().timestamp() - 3600);

        assert!(!is_expired(&live));
        assert!(is_expired(&dead));
    }
}
