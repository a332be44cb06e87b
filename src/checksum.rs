//! # Checksum Engine
//!
//! The NMEA 0183 checksum is an XOR fold over every byte between the begin
//! delimiter (`$` or `!`) and the checksum delimiter (`*`), both excluded. It is
//! written on the wire as two hexadecimal digits, most significant nibble first.

use nom::{
    AsBytes, IResult, Input, Parser, bytes::complete::take_while, character::complete::space0,
    number::complete::hex_u32,
};

/// Folds one byte into a running checksum.
///
/// ```rust
/// use nmea0183_sentence::checksum;
///
/// assert_eq!(checksum::add(0, b'G'), b'G');
/// assert_eq!(checksum::add(b'G', b'G'), 0);
/// ```
#[inline]
pub fn add(checksum: u8, byte: u8) -> u8 {
    checksum ^ byte
}

/// Calculates the NMEA 0183 checksum for the given sentence content.
///
/// The fold starts at zero and stops early at a NUL byte, so a buffer that carries
/// a C-style terminator inside the range never contributes bytes past it.
///
/// # Returns
///
/// A tuple of (input, checksum) where `input` is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use nmea0183_sentence::checksum::checksum;
///
/// let (_, cc) = checksum("GPGGA,123456,data");
/// assert_eq!(cc, 0x41);
///
/// let (_, cc) = checksum(&b"GPGGA,123456,data\0garbage"[..]);
/// assert_eq!(cc, 0x41);
/// ```
pub fn checksum<I>(input: I) -> (I, u8)
where
    I: Input + AsBytes,
{
    let calculated_checksum = input
        .as_bytes()
        .iter()
        .take_while(|&&byte| byte != 0)
        .fold(0u8, |accumulated_xor, &byte| add(accumulated_xor, byte));

    (input, calculated_checksum)
}

/// Calculates the checksum a message would carry once serialized, without
/// serializing it.
///
/// Talker id, type code, a comma, then each field with a comma between
/// consecutive fields. The result equals [`checksum`] over the text between `$`
/// and `*` of the serialized sentence.
///
/// ```rust
/// use nmea0183_sentence::checksum::{checksum, compute_over_message};
///
/// let fields = ["1", "", "3"];
/// let (_, direct) = checksum("GPGGA,1,,3");
/// assert_eq!(compute_over_message(b"GP", b"GGA", &fields), direct);
/// ```
pub fn compute_over_message<F>(talker_id: &[u8], type_code: &[u8], fields: &[F]) -> u8
where
    F: AsRef<[u8]>,
{
    let (_, id) = checksum(talker_id);
    let (_, code) = checksum(type_code);
    let mut cc = add(id ^ code, b',');

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            cc = add(cc, b',');
        }
        let (_, value) = checksum(field.as_ref());
        cc ^= value;
    }

    cc
}

/// Renders a checksum as two uppercase hexadecimal digits.
///
/// ```rust
/// use nmea0183_sentence::checksum::to_hex2;
///
/// assert_eq!(&to_hex2(0x4A), b"4A");
/// assert_eq!(&to_hex2(0x0A), b"0A");
/// ```
pub fn to_hex2(value: u8) -> [u8; 2] {
    [hex_digit(value >> 4), hex_digit(value & 0x0F)]
}

fn hex_digit(nibble: u8) -> u8 {
    if nibble > 9 {
        b'A' + (nibble - 10)
    } else {
        b'0' + nibble
    }
}

/// Parses the declared checksum that follows `*`.
///
/// Reads a hex number the way C `strtol` does in base 16: leading blanks are
/// skipped, digits may be in either case, and whatever follows the digit run is
/// ignored, so padded lenient input such as `"0A   "` still yields `0x0A`.
/// Leading zeros do not count towards the 8 significant digits a `u32` holds.
/// Returns [`None`] when no hex digit follows the blanks.
///
/// ```rust
/// use nmea0183_sentence::checksum::from_hex2;
///
/// assert_eq!(from_hex2(b"4a"), Some(0x4A));
/// assert_eq!(from_hex2(b"0A   "), Some(0x0A));
/// assert_eq!(from_hex2(b" 55"), Some(0x55));
/// assert_eq!(from_hex2(b"000000055"), Some(0x55));
/// assert_eq!(from_hex2(b""), None);
/// ```
pub fn from_hex2(text: &[u8]) -> Option<u32> {
    let res: IResult<&[u8], (&[u8], &[u8])> =
        (space0, take_while(|b: u8| b == b'0')).parse(text);
    let (digits, (_, zeros)) = res.ok()?;

    match hex_u32::<_, nom::error::Error<_>>(digits) {
        Ok((_, value)) => Some(value),
        Err(_) if !zeros.is_empty() => Some(0),
        Err(_) => None,
    }
}
