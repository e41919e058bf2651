use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use log::debug;
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::sign::Signer;
use thiserror::Error;
use time::OffsetDateTime;

use crate::error::Result;

/// Hash function used for the HMAC step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    fn message_digest(self) -> MessageDigest {
        match self {
            Algorithm::Sha1 => MessageDigest::sha1(),
            Algorithm::Sha256 => MessageDigest::sha256(),
            Algorithm::Sha512 => MessageDigest::sha512(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Sha1 => write!(f, "SHA1"),
            Algorithm::Sha256 => write!(f, "SHA256"),
            Algorithm::Sha512 => write!(f, "SHA512"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm {0:?}, expected one of SHA1, SHA256, SHA512")]
pub struct ParseAlgorithmError(String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHA1" => Ok(Algorithm::Sha1),
            "SHA256" => Ok(Algorithm::Sha256),
            "SHA512" => Ok(Algorithm::Sha512),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Source of the current time in whole Unix seconds.
pub trait Clock {
    fn unix_seconds(&self) -> u64;
}

/// Wall clock. Times before the Unix epoch read as 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        u64::try_from(OffsetDateTime::now_utc().unix_timestamp()).unwrap_or(0)
    }
}

/// A clock stuck at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> u64 {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    fn unix_seconds(&self) -> u64 {
        self()
    }
}

/// Parameters of the Time-based One-time Password Algorithm.
///
/// `step` must be at least 1 and `digits` between 1 and 9; code generation
/// panics otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Totp {
    pub step: u64,
    pub digits: u32,
    pub algorithm: Algorithm,
    /// Seconds added to the clock before the counter is derived.
    pub skew: i64,
}

impl Default for Totp {
    fn default() -> Self {
        Totp {
            step: 30,
            digits: 6,
            algorithm: Algorithm::Sha1,
            skew: 0,
        }
    }
}

impl Totp {
    pub fn new(step: u64, digits: u32) -> Self {
        Totp {
            step,
            digits,
            ..Totp::default()
        }
    }

    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        Totp { algorithm, ..self }
    }

    pub fn with_skew(self, skew: i64) -> Self {
        Totp { skew, ..self }
    }

    fn skewed(&self, time: u64) -> u64 {
        if self.skew >= 0 {
            time.saturating_add(self.skew.unsigned_abs())
        } else {
            time.saturating_sub(self.skew.unsigned_abs())
        }
    }

    /// Counter for the given Unix time: `floor((time + skew) / step)`.
    pub fn counter_at(&self, time: u64) -> u64 {
        assert!(self.step > 0, "TOTP time step must be at least one second");
        self.skewed(time) / self.step
    }

    /// Seconds left before the code valid at `time` rolls over, in `1..=step`.
    pub fn seconds_remaining(&self, time: u64) -> u64 {
        assert!(self.step > 0, "TOTP time step must be at least one second");
        self.step - self.skewed(time) % self.step
    }

    /// Code for an explicit Unix time.
    pub fn code_at(&self, secret: &[u8], time: u64) -> Result<String> {
        hotp(secret, self.counter_at(time), self.digits, self.algorithm)
    }

    pub fn code_with_clock<C: Clock>(&self, secret: &[u8], clock: &C) -> Result<String> {
        self.code_at(secret, clock.unix_seconds())
    }

    /// Code for the current time on the system clock.
    pub fn code(&self, secret: &[u8]) -> Result<String> {
        self.code_with_clock(secret, &SystemClock)
    }
}

/// Calculates the HMAC digest of the big-endian counter.
fn calc_digest(secret: &[u8], counter: u64, algorithm: Algorithm) -> Result<Vec<u8>> {
    let mut message = [0u8; 8];
    BigEndian::write_u64(&mut message, counter);
    let key = PKey::hmac(secret)?;
    let mut signer = Signer::new(algorithm.message_digest(), &key)?;
    signer.update(&message)?;
    Ok(signer.sign_to_vec()?)
}

/// Dynamic truncation of an HMAC digest into a zero-padded decimal code.
fn encode_digest(digest: &[u8], digits: u32) -> String {
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let code = BigEndian::read_u32(&digest[offset..offset + 4]) & 0x7fff_ffff;
    format!(
        "{:0width$}",
        code % 10_u32.pow(digits),
        width = digits as usize
    )
}

/// Performs the [HMAC-based One-time Password Algorithm](http://en.wikipedia.org/wiki/HMAC-based_One-time_Password_Algorithm)
/// (HOTP) given the raw secret bytes and a counter.
///
/// # Panics
///
/// If `digits` is not between 1 and 9.
pub fn hotp(secret: &[u8], counter: u64, digits: u32, algorithm: Algorithm) -> Result<String> {
    assert!(
        (1..=9).contains(&digits),
        "OTP codes must have between 1 and 9 digits, got {}",
        digits
    );
    debug!("computing {}-digit {} code for counter {}", digits, algorithm, counter);
    let digest = calc_digest(secret, counter, algorithm)?;
    Ok(encode_digest(&digest, digits))
}

/// Performs the [Time-based One-time Password Algorithm](http://en.wikipedia.org/wiki/Time-based_One-time_Password_Algorithm)
/// (TOTP) with HMAC-SHA1 against the system clock.
///
/// # Panics
///
/// If `step` is 0 or `digits` is not between 1 and 9.
pub fn compute_code(secret: &[u8], step: u64, digits: u32) -> Result<String> {
    compute_code_with_clock(secret, step, digits, &SystemClock)
}

pub fn compute_code_with_clock<C: Clock>(
    secret: &[u8],
    step: u64,
    digits: u32,
    clock: &C,
) -> Result<String> {
    Totp::new(step, digits).code_with_clock(secret, clock)
}
