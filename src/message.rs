//! # Message Model
//!
//! The in-memory form of one decoded sentence: a two-character talker id, a
//! three-character type code and the ordered list of raw field values.

use std::{fmt, ops::Deref};

use crate::{Error, checksum::compute_over_message};

/// Bytes that split a sentence on the wire and so never appear inside a value.
pub(crate) const RESERVED: &[u8] = b"*,\r\n\0";

/// Finds the first reserved byte in `value`.
fn check_reserved(value: &[u8]) -> Result<(), Error> {
    match value.iter().find(|&&b| RESERVED.contains(&b)) {
        Some(&b) => Err(Error::ReservedByte(b)),
        None => Ok(()),
    }
}

/// One comma-separated value of a sentence.
///
/// Fields carry no type: every value is kept as the exact bytes found between
/// its delimiters, so an empty field is a zero-length value rather than an
/// absent one. A field never holds one of the wire delimiters `*`, `,`, `\r`,
/// `\n` or NUL, which keeps every [`Message`] serializable.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Field(Box<[u8]>);

impl Field {
    /// Creates a field holding a copy of `value`.
    ///
    /// # Errors
    ///
    /// * [`Error::ReservedByte`] if `value` holds a wire delimiter
    /// * [`Error::AllocationError`] if the storage cannot be reserved
    pub fn new(value: &[u8]) -> Result<Self, Error> {
        check_reserved(value)?;

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(value.len())
            .map_err(|_| Error::AllocationError)?;
        bytes.extend_from_slice(value);

        Ok(Field(bytes.into_boxed_slice()))
    }

    /// The raw bytes of the field.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The field as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Deref for Field {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Field {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl PartialEq<[u8]> for Field {
    fn eq(&self, other: &[u8]) -> bool {
        *self.0 == *other
    }
}

impl PartialEq<str> for Field {
    fn eq(&self, other: &str) -> bool {
        *self.0 == *other.as_bytes()
    }
}

impl PartialEq<&str> for Field {
    fn eq(&self, other: &&str) -> bool {
        *self.0 == *other.as_bytes()
    }
}

/// A decoded NMEA 0183 sentence.
///
/// Talker id and type code together always form the five-character sentence id
/// that precedes the first field delimiter; the array types make any other
/// length unrepresentable. Fields are append-only and keep sentence order.
///
/// Neither the id nor any field can hold a wire delimiter, so every message has
/// exactly one canonical sentence.
///
/// # Examples
///
/// ```rust
/// use nmea0183_sentence::{Error, Message};
///
/// let mut message = Message::new(*b"GP", *b"GGA")?;
/// message.push_field("1")?;
/// message.push_field("")?;
///
/// assert_eq!(message.talker_id(), b"GP");
/// assert_eq!(message.fields(), ["1", ""]);
/// assert_eq!(message.to_string(), "$GPGGA,1,*67\r\n");
///
/// assert_eq!(message.push_field("a,b"), Err(Error::ReservedByte(b',')));
/// assert_eq!(message.len(), 2);
/// # Ok::<(), nmea0183_sentence::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    talker_id: [u8; 2],
    type_code: [u8; 3],
    fields: Vec<Field>,
}

impl Message {
    /// Creates a message with no fields.
    ///
    /// Fails with [`Error::ReservedByte`] if the talker id or type code holds a
    /// wire delimiter.
    pub fn new(talker_id: [u8; 2], type_code: [u8; 3]) -> Result<Self, Error> {
        check_reserved(&talker_id)?;
        check_reserved(&type_code)?;

        Ok(Message {
            talker_id,
            type_code,
            fields: Vec::new(),
        })
    }

    /// The two-character source identifier, e.g. `GP`.
    pub fn talker_id(&self) -> &[u8; 2] {
        &self.talker_id
    }

    /// The three-character sentence type, e.g. `GGA`.
    pub fn type_code(&self) -> &[u8; 3] {
        &self.type_code
    }

    /// Whether this is a vendor-proprietary (`P`-prefixed) sentence.
    pub fn is_proprietary(&self) -> bool {
        self.talker_id[0] == b'P'
    }

    /// Appends one field after the existing ones.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw field bytes. Empty values are kept as empty fields.
    ///
    /// # Errors
    ///
    /// Fails like [`Field::new`]; the message is left unchanged.
    pub fn push_field(&mut self, value: impl AsRef<[u8]>) -> Result<(), Error> {
        let field = Field::new(value.as_ref())?;
        self.fields
            .try_reserve(1)
            .map_err(|_| Error::AllocationError)?;
        self.fields.push(field);

        Ok(())
    }

    /// All fields, in sentence order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field at `index`, counting from zero after the sentence id.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the message has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The checksum this message carries on the wire.
    pub fn checksum(&self) -> u8 {
        compute_over_message(&self.talker_id, &self.type_code, self.fields.as_slice())
    }
}
