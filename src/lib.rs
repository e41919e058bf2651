//! totp generates Time-based One-time Passwords as per RFC 6238, on top of the
//! HMAC-based One-time Password Algorithm of RFC 4226. These are the codes shown
//! by mobile 2FA apps such as Google Authenticator and Authy.
//!
//! ```rust
//! use totp::{generate_code_with, FixedClock, Totp};
//!
//! // secret as typed by a user, the TOTP parameters, and a clock
//! let code = generate_code_with("gezd gnbv gy3t qojq gezd gnbv gy3t qojq", &Totp::new(30, 8), &FixedClock(59));
//! assert_eq!(code.unwrap(), "94287082");
//!
//! // 6 digits, 30 second steps, current time
//! let code = totp::generate_code("JBSWY3DPEHPK3PXP", 30, 6).unwrap();
//! assert_eq!(code.len(), 6);
//! ```

mod error;
mod secret;
mod totp;

pub use crate::error::{DecodeError, Error, Result};
pub use crate::secret::{decode_secret, normalize};
pub use crate::totp::{
    compute_code, compute_code_with_clock, hotp, Algorithm, Clock, FixedClock,
    ParseAlgorithmError, SystemClock, Totp,
};

/// Normalizes `secret_text`, decodes it and computes the HMAC-SHA1 TOTP code for
/// the current time.
///
/// # Panics
///
/// If `step` is 0 or `digits` is not between 1 and 9.
pub fn generate_code(secret_text: &str, step: u64, digits: u32) -> Result<String> {
    generate_code_with(secret_text, &Totp::new(step, digits), &SystemClock)
}

pub fn generate_code_with<C: Clock>(secret_text: &str, totp: &Totp, clock: &C) -> Result<String> {
    let secret = secret_bytes(secret_text)?;
    totp.code_with_clock(&secret, clock)
}

/// Turns user-entered text into key bytes, rejecting blank input before decoding.
pub fn secret_bytes(secret_text: &str) -> Result<Vec<u8>> {
    let clean = normalize(secret_text);
    if clean.is_empty() {
        return Err(Error::EmptySecret);
    }
    Ok(decode_secret(&clean)?)
}

#[cfg(test)]
mod tests {
    use super::{generate_code, generate_code_with, DecodeError, Error, FixedClock, Totp};

    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn empty_secret() {
        assert!(matches!(generate_code("", 30, 6), Err(Error::EmptySecret)));
        assert!(matches!(generate_code("   ", 30, 6), Err(Error::EmptySecret)));
        assert!(matches!(generate_code("\n\t", 30, 6), Err(Error::EmptySecret)));
    }

    #[test]
    fn invalid_secret() {
        let err = generate_code("ABCD1", 30, 6).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSecret(DecodeError::InvalidSymbol { symbol: '1', position: 4 })
        ));
        assert_eq!(
            err.to_string(),
            "invalid base32 secret (invalid symbol '1' at position 4)"
        );
    }

    #[test]
    fn rfc_vector_through_pipeline() {
        let totp = Totp::new(30, 8);
        assert_eq!(
            generate_code_with(RFC_SECRET, &totp, &FixedClock(30)).unwrap(),
            "94287082"
        );
        assert_eq!(
            generate_code_with(" gezdgnbv gy3tqojq\ngezdgnbv gy3tqojq ", &totp, &FixedClock(59)).unwrap(),
            "94287082"
        );
    }

    #[test]
    fn short_secret_is_padded() {
        let code = generate_code_with("MFRA", &Totp::default(), &FixedClock(0)).unwrap();
        assert_eq!(code.len(), 6);
    }

    #[test]
    fn wall_clock_code_has_requested_width() {
        let code = generate_code(RFC_SECRET, 30, 6).unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
