//! # Sentence Serializer
//!
//! Renders a [`Message`] back into its canonical wire form:
//! `$TTCCC,F1,F2,...,Fn*HH\r\n`, with the checksum freshly computed.

use std::fmt;

use crate::{Error, Message, checksum::to_hex2};

/// Renders messages as canonical NMEA 0183 sentences.
///
/// Serialization is total over [`Message`]s: the model already refuses wire
/// delimiters inside ids and fields, so the only possible failure is running out
/// of memory.
///
/// # Examples
///
/// ```rust
/// use nmea0183_sentence::{Error, Message, Serializer};
///
/// let mut message = Message::new(*b"GP", *b"GGA")?;
/// message.push_field("1")?;
/// message.push_field("2")?;
///
/// let serializer = Serializer::new();
/// assert_eq!(Serializer::encoded_len(&message), 15);
/// assert_eq!(serializer.serialize(&message)?, b"$GPGGA,1,2*55\r\n");
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Serializer;

impl Serializer {
    /// Creates a serializer.
    pub fn new() -> Self {
        Serializer
    }

    /// Exact number of bytes [`Serializer::serialize`] produces for `message`.
    ///
    /// `$` + id + `,` + fields + commas between them + `*` + two hex digits + `\r\n`.
    pub fn encoded_len(message: &Message) -> usize {
        let fields = message.fields();
        let values: usize = fields.iter().map(|field| field.len()).sum();
        let separators = fields.len().saturating_sub(1);

        1 + 2 + 3 + 1 + values + separators + 1 + 2 + 2
    }

    /// Serializes `message` into a newly allocated buffer.
    ///
    /// # Errors
    ///
    /// * [`Error::AllocationError`] if the buffer cannot be obtained
    /// * [`Error::ImplementationError`] if the written length disagrees with
    ///   [`Serializer::encoded_len`]
    pub fn serialize(&self, message: &Message) -> Result<Vec<u8>, Error> {
        let len = Self::encoded_len(message);
        let mut out = Vec::new();
        out.try_reserve_exact(len)
            .map_err(|_| Error::AllocationError)?;

        out.push(b'$');
        out.extend_from_slice(message.talker_id());
        out.extend_from_slice(message.type_code());
        out.push(b',');

        for (i, field) in message.fields().iter().enumerate() {
            if i > 0 {
                out.push(b',');
            }
            out.extend_from_slice(field);
        }

        out.push(b'*');
        out.extend_from_slice(&to_hex2(message.checksum()));
        out.extend_from_slice(b"\r\n");

        if out.len() != len {
            return Err(Error::ImplementationError);
        }

        Ok(out)
    }
}

impl Message {
    /// Serializes this message with the default [`Serializer`].
    ///
    /// ```rust
    /// use nmea0183_sentence::Message;
    ///
    /// let message = Message::new(*b"GP", *b"GGA")?;
    /// assert_eq!(message.to_sentence()?, b"$GPGGA,*7A\r\n");
    /// # Ok::<(), nmea0183_sentence::Error>(())
    /// ```
    pub fn to_sentence(&self) -> Result<Vec<u8>, Error> {
        Serializer::new().serialize(self)
    }
}

/// Writes the canonical wire form, byte for byte what [`Serializer::serialize`]
/// produces when every field is valid UTF-8; other bytes are replaced.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}{},",
            String::from_utf8_lossy(self.talker_id()),
            String::from_utf8_lossy(self.type_code())
        )?;

        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&String::from_utf8_lossy(field))?;
        }

        let [hi, lo] = to_hex2(self.checksum());
        write!(f, "*{}{}\r\n", hi as char, lo as char)
    }
}
