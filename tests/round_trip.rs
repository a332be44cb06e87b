//! Proptest generators for well-formed NMEA 0183 messages.

use nmea0183_sentence::{
    ComplianceMode, Error, Message, ParserBuilder, Serializer,
    checksum::{checksum, compute_over_message},
};
use proptest::prelude::*;

/// Bytes a field refuses to hold.
const RESERVED: &[u8] = b"*,\r\n\0";

const TALKER_LEAD: &[u8] = b"ABCDEFGHIJKLMNOQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn talker_id_strategy() -> impl Strategy<Value = [u8; 2]> {
    (
        prop::sample::select(TALKER_LEAD),
        prop::sample::select(ALPHANUMERIC),
    )
        .prop_map(|(a, b)| [a, b])
}

fn type_code_strategy() -> impl Strategy<Value = [u8; 3]> {
    prop::array::uniform3(prop::sample::select(ALPHANUMERIC))
}

fn field_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        any::<u8>().prop_filter("reserved byte", |b| !RESERVED.contains(b)),
        0..12,
    )
}

/// A single empty field serializes exactly like no field at all, so it is left out.
fn fields_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(field_strategy(), 0..20)
        .prop_filter("single empty field", |fields| {
            !(fields.len() == 1 && fields[0].is_empty())
        })
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (talker_id_strategy(), type_code_strategy(), fields_strategy()).prop_map(
        |(talker_id, type_code, fields)| {
            let mut message = Message::new(talker_id, type_code).unwrap();
            for field in fields {
                message.push_field(field).unwrap();
            }
            message
        },
    )
}

proptest! {
    #[test]
    fn test_serialized_message_parses_back(message in message_strategy()) {
        let sentence = Serializer::new().serialize(&message).unwrap();
        prop_assert_eq!(sentence.len(), Serializer::encoded_len(&message));

        let parsed = ParserBuilder::new().build().parse(&sentence).unwrap();
        prop_assert_eq!(parsed.end_index, sentence.len());
        prop_assert_eq!(parsed.message, message);
    }

    #[test]
    fn test_message_checksum_matches_wire_checksum(message in message_strategy()) {
        let sentence = message.to_sentence().unwrap();
        let star = sentence.iter().rposition(|&b| b == b'*').unwrap();
        let (_, on_wire) = checksum(&sentence[1..star]);

        prop_assert_eq!(message.checksum(), on_wire);
        prop_assert_eq!(
            compute_over_message(message.talker_id(), message.type_code(), message.fields()),
            on_wire
        );
        prop_assert_eq!(message.checksum(), message.checksum());
    }

    #[test]
    fn test_push_field_rejects_only_reserved_bytes(
        value in prop::collection::vec(any::<u8>(), 0..16)
    ) {
        let mut message = Message::new(*b"GP", *b"TXT").unwrap();
        let first_reserved = value.iter().copied().find(|b| RESERVED.contains(b));

        match first_reserved {
            Some(byte) => {
                prop_assert_eq!(message.push_field(&value), Err(Error::ReservedByte(byte)));
                prop_assert!(message.is_empty());
            }
            None => {
                prop_assert_eq!(message.push_field(&value), Ok(()));
                let sentence = message.to_sentence().unwrap();
                if std::str::from_utf8(&value).is_ok() {
                    prop_assert_eq!(message.to_string().into_bytes(), sentence);
                }
            }
        }
    }

    #[test]
    fn test_concatenated_sentences_parse_in_order(
        messages in prop::collection::vec(message_strategy(), 1..6)
    ) {
        let mut stream = Vec::new();
        for message in &messages {
            stream.extend_from_slice(&message.to_sentence().unwrap());
        }

        let mut parser = ParserBuilder::new()
            .compliance_mode(ComplianceMode::Lenient)
            .build();
        let parsed: Vec<Message> = parser
            .sentences(&stream)
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(parsed, messages);
    }
}

#[test]
fn test_strict_accepts_short_serialized_sentences() {
    let mut message = Message::new(*b"GP", *b"RMC").unwrap();
    for field in ["092750.000", "A", "5321.6802", "N", "00630.3372", "W"] {
        message.push_field(field).unwrap();
    }

    let sentence = message.to_sentence().unwrap();
    let parsed = ParserBuilder::new()
        .compliance_mode(ComplianceMode::Strict)
        .build()
        .parse(&sentence)
        .unwrap();

    assert_eq!(parsed.message, message);
}
