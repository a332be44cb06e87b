//! # NMEA 0183 Sentence Parser
//!
//! This module turns raw bytes into [`Message`]s. It handles the standard NMEA 0183
//! format: `$TTCCC,D1,D2,...,Dn*HH\r\n`
//!
//! The parser is configurable to handle:
//! - Lenient or strict compliance with the standard (see [`ComplianceMode`])
//! - Proprietary sentences through a caller-supplied [`VendorHandler`]
//! - What happens when a caller breaks an API contract (see [`ContractPolicy`])

use crate::{
    ContractPolicy, Error, Failure, Message,
    scanner::{self, scan},
};

/// Defines how closely the parser enforces the NMEA 0183 standard.
///
/// Both modes validate a checksum whenever one is present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceMode {
    /// Adds the policy rules of the standard on top of structural parsing:
    ///
    /// - The body between `$` and the line terminator must not exceed
    ///   [`MAX_SENTENCE_LENGTH`](crate::MAX_SENTENCE_LENGTH) characters.
    /// - A checksum, when present, must be exactly two hex digits.
    /// - `RM?` sentences (RMA, RMB, RMC) must carry a checksum.
    Strict,

    /// Structural parsing only.
    ///
    /// Use this mode for legacy equipment or padded log files.
    #[default]
    Lenient,
}

impl ComplianceMode {
    /// Returns `true` for [`ComplianceMode::Strict`].
    pub fn is_strict(self) -> bool {
        self == ComplianceMode::Strict
    }
}

/// Interprets proprietary (`P`-prefixed) sentences.
///
/// The parser knows nothing about manufacturer-defined field grammars. When it
/// meets a proprietary sentence it hands over entirely to the registered handler
/// and returns whatever the handler returns.
///
/// The handler receives:
/// - `sentence`: the input from just after `$` to the end of the buffer
/// - `message`: a message already carrying the talker id and type code, which the
///   handler may fill with fields
/// - `end_index`: pre-filled with the offset past the line terminator; the handler
///   may move it, but it must stay past the sentence start and inside the input
/// - `mode`: the parser's compliance mode
///
/// Any `FnMut` closure with the same signature is a handler.
///
/// # Examples
///
/// ```rust
/// use nmea0183_sentence::{ComplianceMode, Message, ParserBuilder};
///
/// let mut parser = ParserBuilder::new()
///     .vendor_handler(
///         |sentence: &[u8], message: &mut Message, _: &mut usize, _: ComplianceMode| {
///             let body = sentence.split(|&b| b == b'*').next().unwrap_or_default();
///             message.push_field(&body[6..])
///         },
///     )
///     .build();
///
/// let parsed = parser.parse(b"$PGRMZ,1*4F\r\n")?;
/// assert_eq!(parsed.message.fields(), ["1"]);
/// # Ok::<(), nmea0183_sentence::Failure>(())
/// ```
pub trait VendorHandler {
    fn handle(
        &mut self,
        sentence: &[u8],
        message: &mut Message,
        end_index: &mut usize,
        mode: ComplianceMode,
    ) -> Result<(), Error>;
}

impl<F> VendorHandler for F
where
    F: FnMut(&[u8], &mut Message, &mut usize, ComplianceMode) -> Result<(), Error>,
{
    fn handle(
        &mut self,
        sentence: &[u8],
        message: &mut Message,
        end_index: &mut usize,
        mode: ComplianceMode,
    ) -> Result<(), Error> {
        self(sentence, message, end_index, mode)
    }
}

/// A successfully parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub message: Message,
    /// Offset of the first byte after the sentence; the next sentence starts here.
    pub end_index: usize,
}

/// Creates a configurable NMEA 0183 sentence parser.
///
/// It uses the builder pattern to allow for flexible configuration of the parser settings.
///
/// # Examples
///
/// ```rust
/// use nmea0183_sentence::{ComplianceMode, Error, ParserBuilder};
///
/// let mut strict = ParserBuilder::new()
///     .compliance_mode(ComplianceMode::Strict)
///     .build();
/// assert!(strict.parse(b"$GPRMC,1,2*48\r\n").is_ok());
/// assert_eq!(
///     strict.parse(b"$GPRMC,1,2\r\n").unwrap_err().error,
///     Error::ChecksumExpected
/// );
///
/// let mut lenient = ParserBuilder::new().build();
/// assert!(lenient.parse(b"$GPRMC,1,2\r\n").is_ok());
/// ```
#[must_use]
pub struct ParserBuilder<'h> {
    /// Compliance mode for the parser.
    mode: ComplianceMode,

    /// Contract policy for the parser.
    policy: ContractPolicy,

    /// Handler for proprietary sentences.
    vendor_handler: Option<Box<dyn VendorHandler + 'h>>,
}

impl<'h> ParserBuilder<'h> {
    /// Creates a new parser builder with default settings.
    ///
    /// The default settings are:
    /// - Compliance mode: [`ComplianceMode::Lenient`]
    /// - Contract policy: [`ContractPolicy::default`]
    /// - No vendor handler: proprietary sentences fail with
    ///   [`Error::UnhandledVendorExtMessage`]
    pub fn new() -> Self {
        ParserBuilder {
            mode: ComplianceMode::default(),
            policy: ContractPolicy::default(),
            vendor_handler: None,
        }
    }

    /// Sets the compliance mode for the parser.
    ///
    /// # Arguments
    ///
    /// * `mode` - The desired compliance mode:
    ///   - [`ComplianceMode::Strict`]: Length, checksum length and `RM?` checksum
    ///     rules are enforced on top of structural parsing
    ///   - [`ComplianceMode::Lenient`]: Structural parsing only; a checksum is
    ///     still validated when present
    pub fn compliance_mode(mut self, mode: ComplianceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets what happens when a vendor handler breaks its contract.
    ///
    /// # Arguments
    ///
    /// * `policy` - The desired contract policy:
    ///   - [`ContractPolicy::Panic`]: The parser panics
    ///   - [`ContractPolicy::Report`]: The parse fails with
    ///     [`Error::ImplementationError`]
    pub fn contract_policy(mut self, policy: ContractPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers the handler for proprietary (`P`-prefixed) sentences.
    ///
    /// # Arguments
    ///
    /// * `handler` - Any [`VendorHandler`], including a closure with the
    ///   handler's signature. It replaces a previously registered one.
    pub fn vendor_handler(mut self, handler: impl VendorHandler + 'h) -> Self {
        self.vendor_handler = Some(Box::new(handler));
        self
    }

    /// Builds the parser with the configured settings.
    ///
    /// # Returns
    ///
    /// A [`Parser`] that can be reused for any number of buffers.
    pub fn build(self) -> Parser<'h> {
        Parser {
            mode: self.mode,
            policy: self.policy,
            vendor_handler: self.vendor_handler,
        }
    }
}

impl Default for ParserBuilder<'_> {
    fn default() -> Self {
        ParserBuilder::new()
    }
}

/// Parses NMEA 0183 sentences out of caller-owned byte buffers.
///
/// The parser keeps no state between calls; it only holds its configuration and
/// the vendor handler. Build one with [`ParserBuilder`].
pub struct Parser<'h> {
    mode: ComplianceMode,
    policy: ContractPolicy,
    vendor_handler: Option<Box<dyn VendorHandler + 'h>>,
}

impl<'h> Parser<'h> {
    /// The compliance mode this parser was built with.
    pub fn mode(&self) -> ComplianceMode {
        self.mode
    }

    /// Parses the first sentence found in `input`.
    ///
    /// Leading bytes before `$` are skipped, and the buffer ends at its first NUL.
    /// On success, and on every failure detected after the line terminator was
    /// located, the end index tells where the next sentence can start.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_sentence::{Error, ParserBuilder};
    ///
    /// let mut parser = ParserBuilder::new().build();
    /// let input = b"$GPGGA,1,2*00\r\n$GPRMC,3,4*4C\r\n";
    ///
    /// let failure = parser.parse(input).unwrap_err();
    /// assert!(matches!(failure.error, Error::ChecksumError { .. }));
    ///
    /// let resume = failure.end_index.unwrap();
    /// let parsed = parser.parse(&input[resume..])?;
    /// assert_eq!(parsed.message.type_code(), b"RMC");
    /// # Ok::<(), nmea0183_sentence::Failure>(())
    /// ```
    pub fn parse(&mut self, input: &[u8]) -> Result<Parsed, Failure> {
        let result = self.parse_sentence(input);

        #[cfg(feature = "log")]
        match &result {
            Ok(parsed) => log::trace!(
                "parsed {}{} with {} fields, next sentence at {}",
                String::from_utf8_lossy(parsed.message.talker_id()),
                String::from_utf8_lossy(parsed.message.type_code()),
                parsed.message.len(),
                parsed.end_index
            ),
            Err(failure) => log::debug!(
                "rejected sentence: {} (end index {:?})",
                failure.error,
                failure.end_index
            ),
        }

        result
    }

    fn parse_sentence(&mut self, input: &[u8]) -> Result<Parsed, Failure> {
        let frame = scan(input, self.mode)?;
        let end_index = frame.end_index;
        let mut message = Message::new(frame.talker_id, frame.type_code)
            .map_err(|error| Failure::at(error, end_index))?;

        if message.is_proprietary() {
            let Some(handler) = self.vendor_handler.as_mut() else {
                return Err(Failure::at(Error::UnhandledVendorExtMessage, end_index));
            };

            let mut reported = end_index;
            let result = handler.handle(frame.sentence, &mut message, &mut reported, self.mode);

            if reported <= frame.sentence_start || reported > input.len() {
                let error = self
                    .policy
                    .violated("vendor handler reported an end index outside the input");
                return Err(Failure::at(error, end_index));
            }

            return match result {
                Ok(()) => Ok(Parsed {
                    message,
                    end_index: reported,
                }),
                Err(error) => Err(Failure::at(error, reported)),
            };
        }

        let (_, fields) = scanner::fields(frame.payload)
            .map_err(|_| Failure::at(Error::ImplementationError, end_index))?;

        for field in fields {
            message
                .push_field(field)
                .map_err(|error| Failure::at(error, end_index))?;
        }

        Ok(Parsed { message, end_index })
    }

    /// Iterates over every sentence in `input`.
    ///
    /// Each step resumes at the end index of the previous one. A failure that
    /// carries an end index is yielded and parsing resumes after it; a failure
    /// without one (an unterminated or AIS sentence) is yielded last. Iteration
    /// ends quietly once no begin delimiter is left. End indexes in yielded
    /// failures are relative to the whole of `input`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_sentence::ParserBuilder;
    ///
    /// let mut parser = ParserBuilder::new().build();
    /// let input = b"$GPGGA,1,2*55\r\n$GPRMC,3,4*4C\r\n";
    ///
    /// let codes: Vec<_> = parser
    ///     .sentences(input)
    ///     .map(|message| message.map(|m| *m.type_code()))
    ///     .collect::<Result<_, _>>()?;
    /// assert_eq!(codes, [*b"GGA", *b"RMC"]);
    /// # Ok::<(), nmea0183_sentence::Failure>(())
    /// ```
    pub fn sentences<'p, 'i>(&'p mut self, input: &'i [u8]) -> Sentences<'p, 'h, 'i> {
        Sentences {
            parser: self,
            input,
            position: 0,
            done: false,
        }
    }
}

/// Parses the first sentence in `input` without a vendor handler.
///
/// # Examples
///
/// ```rust
/// use nmea0183_sentence::{ComplianceMode, parse_message};
///
/// let parsed = parse_message(b"$GPGGA,1,2*55\r\n", ComplianceMode::Strict)?;
/// assert_eq!(parsed.message.talker_id(), b"GP");
/// assert_eq!(parsed.message.fields(), ["1", "2"]);
/// assert_eq!(parsed.end_index, 15);
/// # Ok::<(), nmea0183_sentence::Failure>(())
/// ```
pub fn parse_message(input: &[u8], mode: ComplianceMode) -> Result<Parsed, Failure> {
    ParserBuilder::new().compliance_mode(mode).build().parse(input)
}

/// Iterator over the sentences of one buffer, created by [`Parser::sentences`].
pub struct Sentences<'p, 'h, 'i> {
    parser: &'p mut Parser<'h>,
    input: &'i [u8],
    position: usize,
    done: bool,
}

impl Sentences<'_, '_, '_> {
    /// Offset in the input where the next sentence will be searched for.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for Sentences<'_, '_, '_> {
    type Item = Result<Message, Failure>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(remaining) = self.input.get(self.position..) else {
            self.done = true;
            return None;
        };

        match self.parser.parse(remaining) {
            Ok(Parsed { message, end_index }) => {
                self.position += end_index;
                Some(Ok(message))
            }
            Err(Failure {
                error: Error::BeginDelimiterNotFound,
                ..
            }) => {
                self.done = true;
                None
            }
            Err(Failure { error, end_index }) => {
                let end_index = end_index.map(|end| end + self.position);
                match end_index {
                    Some(end) => self.position = end,
                    None => self.done = true,
                }
                Some(Err(Failure { error, end_index }))
            }
        }
    }
}

impl std::iter::FusedIterator for Sentences<'_, '_, '_> {}
