//! # Sentence Scanner
//!
//! Locates the delimiters of one sentence inside a caller-owned buffer and applies
//! the structural rules of NMEA 0183. The scanner never copies or mutates the
//! buffer; it only narrows slices of it.
//!
//! Everything is resolved from the outside in: the line terminator first, then the
//! checksum, then the sentence id. Field splitting happens last, on the bytes that
//! are left, so a field can never swallow checksum digits or spill into the next
//! sentence.

use nom::{
    Offset, Parser,
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::char,
    combinator::{opt, rest},
    multi::separated_list0,
    sequence::{preceded, terminated},
};

use crate::{
    ComplianceMode, Error, Failure,
    checksum::{checksum, from_hex2},
};

/// Maximum number of characters between `$` and the line terminator in strict mode.
pub const MAX_SENTENCE_LENGTH: usize = 82;

type ScanResult<'a, O> = nom::IResult<&'a [u8], O>;

/// The delimiters of one sentence, resolved and validated.
#[derive(Debug)]
pub(crate) struct Frame<'a> {
    /// Everything after `$` up to the end of the input.
    pub(crate) sentence: &'a [u8],
    /// Offset of `sentence` in the input.
    pub(crate) sentence_start: usize,
    pub(crate) talker_id: [u8; 2],
    pub(crate) type_code: [u8; 3],
    /// Field text: after the sentence id comma, before `*` or the terminator.
    pub(crate) payload: &'a [u8],
    /// Offset of the first byte after the line terminator.
    pub(crate) end_index: usize,
}

/// Narrows the input to the bytes before the first NUL, if any.
pub(crate) fn bounded(input: &[u8]) -> &[u8] {
    let res: ScanResult<'_, &[u8]> = take_till(|b: u8| b == 0).parse(input);
    res.map_or(input, |(_, bounded)| bounded)
}

/// Skips everything up to and including the next `$`.
fn begin_delimiter(i: &[u8]) -> ScanResult<'_, char> {
    preceded(take_till(|b: u8| b == b'$'), char('$')).parse(i)
}

/// Takes the sentence body up to the nearest `\r` or `\n` and consumes the
/// terminator; a `\r\n` pair is consumed whole.
fn line(i: &[u8]) -> ScanResult<'_, &[u8]> {
    terminated(
        take_till(|b: u8| b == b'\r' || b == b'\n'),
        alt((tag("\r\n"), tag("\r"), tag("\n"))),
    )
    .parse(i)
}

/// Splits a line at `*` into the checksummed content and the declared checksum text.
fn checksum_delimiter(i: &[u8]) -> ScanResult<'_, Option<&[u8]>> {
    opt(preceded(char('*'), rest)).parse(i)
}

/// Takes the sentence id up to and including the first `,`.
fn sentence_id(i: &[u8]) -> ScanResult<'_, &[u8]> {
    terminated(take_till(|b: u8| b == b','), char(',')).parse(i)
}

/// Splits the field text on `,`, keeping empty fields.
///
/// An empty payload holds no fields at all.
pub(crate) fn fields(i: &[u8]) -> ScanResult<'_, Vec<&[u8]>> {
    if i.is_empty() {
        return Ok((i, Vec::new()));
    }

    separated_list0(char(','), take_till(|b: u8| b == b',')).parse(i)
}

/// Locates and validates one sentence in `input`.
///
/// Failures raised once the line terminator is known carry the end index, so
/// the caller can step over the rejected sentence.
pub(crate) fn scan(input: &[u8], mode: ComplianceMode) -> Result<Frame<'_>, Failure> {
    let input = bounded(input);

    let Ok((sentence, _)) = begin_delimiter(input) else {
        let error = if input.contains(&b'!') {
            Error::UnsupportedMessage
        } else {
            Error::BeginDelimiterNotFound
        };
        return Err(Failure::before_end(error));
    };

    let Ok((after, body)) = line(sentence) else {
        return Err(Failure::before_end(Error::EndDelimiterNotFound));
    };

    let end_index = input.offset(after);
    let fail = |error| Failure::at(error, end_index);

    if mode.is_strict() && body.len() > MAX_SENTENCE_LENGTH {
        return Err(fail(Error::LongerThanMaxLength));
    }

    let res: ScanResult<'_, &[u8]> = take_till(|b: u8| b == b'*').parse(body);
    let (tail, content) = res.map_err(|_| fail(Error::ImplementationError))?;
    let (_, declared) =
        checksum_delimiter(tail).map_err(|_| fail(Error::ImplementationError))?;

    if let Some(declared) = declared {
        if mode.is_strict() && declared.len() != 2 {
            return Err(fail(Error::IncorrectChecksumLength));
        }

        let (_, expected) = checksum(content);
        let found = from_hex2(declared);

        if found != Some(u32::from(expected)) {
            return Err(fail(Error::ChecksumError { expected, found }));
        }
    }

    let (payload, id) = sentence_id(content).map_err(|_| fail(Error::ImplementationError))?;
    let [t0, t1, c0, c1, c2] =
        <[u8; 5]>::try_from(id).map_err(|_| fail(Error::MessageIdLengthIncorrect))?;

    if mode.is_strict() && [c0, c1] == *b"RM" && declared.is_none() {
        return Err(fail(Error::ChecksumExpected));
    }

    Ok(Frame {
        sentence,
        sentence_start: input.offset(sentence),
        talker_id: [t0, t1],
        type_code: [c0, c1, c2],
        payload,
        end_index,
    })
}
