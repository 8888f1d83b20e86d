use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot parse `{0}` as {1}")]
    Parse(String, &'static str),

    #[error("Unknown token: `{0}`")]
    UnknownToken(String),

    #[error("Value {0} exceeds maximum {1}")]
    OutOfRange(u64, u64),
}

/// Value of one hex digit. Callers must pre-validate with
/// `char::is_ascii_hexdigit`; anything else maps to 0.
pub fn hex_nibble(c: char) -> u8 {
    match c {
        '0'..='9' => c as u8 - b'0',
        'a'..='f' => c as u8 - b'a' + 10,
        'A'..='F' => c as u8 - b'A' + 10,
        _ => 0,
    }
}

/// Parse the first two characters of `s` as a hex byte.
pub fn hex_byte(s: &str) -> Result<u8, Error> {
    let digits: Vec<char> = s.chars().take(2).collect();
    match digits.as_slice() {
        [hi, lo] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
            Ok(hex_nibble(*hi) << 4 | hex_nibble(*lo))
        }
        _ => Err(Error::Parse(digits.iter().collect(), "hex byte")),
    }
}

/// Parse the first four characters of `s` as a big-endian hex word.
pub fn hex_word(s: &str) -> Result<u16, Error> {
    let digits: Vec<char> = s.chars().take(4).collect();
    if digits.len() == 4 && digits.iter().all(char::is_ascii_hexdigit) {
        Ok(digits
            .iter()
            .fold(0u16, |acc, c| acc << 4 | hex_nibble(*c) as u16))
    } else {
        Err(Error::Parse(digits.iter().collect(), "hex word"))
    }
}

/// Parse exactly three octal digits as a byte. `400` and up are out of range.
pub fn oct_byte(s: &str) -> Result<u8, Error> {
    let digits: Vec<char> = s.chars().collect();
    if digits.len() != 3 || !digits.iter().all(|c| ('0'..='7').contains(c)) {
        return Err(Error::Parse(s.to_string(), "octal byte"));
    }
    let value = digits
        .iter()
        .fold(0u16, |acc, c| acc * 8 + (*c as u16 - '0' as u16));
    if value > 0xFF {
        return Err(Error::OutOfRange(value as u64, 0xFF));
    }
    Ok(value as u8)
}

/// Parse a decimal or `0x`-prefixed hex integer no larger than `max`.
pub fn bounded_uint(s: &str, max: u64) -> Result<u64, Error> {
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    }
    .map_err(|_| Error::Parse(s.to_string(), "unsigned integer"))?;
    if value > max {
        return Err(Error::OutOfRange(value, max));
    }
    Ok(value)
}

/// Only the literal tokens are accepted, nothing truthy.
pub fn boolean(s: &str) -> Result<bool, Error> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::Parse(s.to_string(), "boolean")),
    }
}

/// Exact, case-sensitive match against a fixed token table.
pub fn enum_lookup(s: &str, table: &[&str]) -> Result<usize, Error> {
    table
        .iter()
        .position(|token| *token == s)
        .ok_or_else(|| Error::UnknownToken(s.to_string()))
}
