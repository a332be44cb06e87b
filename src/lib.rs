//! # NMEA 0183 Sentence Parser and Serializer
//!
//! This library scans raw byte buffers for NMEA 0183 sentences of the form:
//! `$TTCCC,D1,D2,...,Dn*HH\r\n`
//!
//! Each sentence is decomposed into a talker id (`TT`), a type code (`CCC`) and an
//! ordered list of raw field values, after its checksum has been verified. The
//! inverse direction rebuilds the canonical wire form with a fresh checksum.
//!
//! Field values are not interpreted: a GGA position or an RMC date stays the text
//! it was on the wire.
//!
//! ## Usage
//!
//! ```rust
//! use nmea0183_sentence::{ComplianceMode, ParserBuilder};
//!
//! let input = b"$GPGGA,1,2*55\r\n$GPRMC,3,4*4C\r\n";
//! let mut parser = ParserBuilder::new()
//!     .compliance_mode(ComplianceMode::Strict)
//!     .build();
//!
//! let first = parser.parse(input)?;
//! assert_eq!(first.message.type_code(), b"GGA");
//! assert_eq!(first.message.fields(), ["1", "2"]);
//!
//! let second = parser.parse(&input[first.end_index..])?;
//! assert_eq!(second.message.type_code(), b"RMC");
//!
//! assert_eq!(second.message.to_sentence().unwrap(), b"$GPRMC,3,4*4C\r\n");
//! # Ok::<(), nmea0183_sentence::Failure>(())
//! ```

pub mod checksum;
pub mod error;
mod message;
mod parser;
mod scanner;
mod serializer;

pub use error::{ContractPolicy, Error, Failure};
pub use message::{Field, Message};
pub use parser::*;
pub use scanner::MAX_SENTENCE_LENGTH;
pub use serializer::Serializer;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;
