use base32::Alphabet::RFC4648;
use log::trace;

use crate::error::DecodeError;

const PAD: char = '=';

/// Lengths of the trailing `=` run that complete a valid Base32 quantum.
const VALID_PADDING: [usize; 5] = [0, 1, 3, 4, 6];

/// Cleans user-entered text into canonical Base32: every whitespace
/// character is removed (not only at the ends) and the rest is uppercased.
///
/// The ASCII file, group, record and unit separators (U+001C..=U+001F) count
/// as whitespace too.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !is_separator(*c))
        .collect::<String>()
        .to_uppercase()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Decodes a cleaned RFC4648 base32 secret into raw key bytes, restoring
/// any `=` padding the user left off.
///
/// Lowercase input is accepted as well. An empty string decodes to an empty
/// key; callers are expected to reject that before getting here.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, DecodeError> {
    let padding = (8 - secret.len() % 8) % 8;
    trace!("restoring {} padding characters", padding);

    let mut padded = String::with_capacity(secret.len() + padding);
    padded.push_str(secret);
    padded.extend(std::iter::repeat(PAD).take(padding));

    validate(&padded)?;
    // Validation leaves only ASCII symbols and trailing padding, which the
    // base32 crate always accepts.
    base32::decode(RFC4648 { padding: true }, &padded.to_ascii_uppercase())
        .ok_or(DecodeError::InvalidPadding)
}

fn validate(padded: &str) -> Result<(), DecodeError> {
    let data = padded.trim_end_matches(PAD);
    for (position, symbol) in data.chars().enumerate() {
        if symbol == PAD {
            return Err(DecodeError::InvalidPadding);
        }
        if !is_base32_symbol(symbol) {
            return Err(DecodeError::InvalidSymbol { symbol, position });
        }
    }
    if !VALID_PADDING.contains(&(padded.len() - data.len())) {
        return Err(DecodeError::InvalidPadding);
    }
    Ok(())
}

fn is_base32_symbol(symbol: char) -> bool {
    matches!(symbol.to_ascii_uppercase(), 'A'..='Z' | '2'..='7')
}
