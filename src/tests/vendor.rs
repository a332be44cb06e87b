use crate::{
    ComplianceMode, ContractPolicy, Error, Failure, Message, ParserBuilder, VendorHandler,
    parse_message,
};

/// Splits everything after the sentence id on `,`, the way a Garmin-style
/// proprietary sentence is laid out.
struct CommaSeparated {
    calls: usize,
}

impl VendorHandler for CommaSeparated {
    fn handle(
        &mut self,
        sentence: &[u8],
        message: &mut Message,
        _end_index: &mut usize,
        _mode: ComplianceMode,
    ) -> Result<(), Error> {
        self.calls += 1;

        let line = sentence
            .split(|&b| b == b'\r' || b == b'\n' || b == b'*')
            .next()
            .ok_or(Error::Vendor("empty sentence"))?;
        for value in line.split(|&b| b == b',').skip(1) {
            message.push_field(value)?;
        }

        Ok(())
    }
}

#[test]
fn test_unhandled_vendor_sentence() {
    let err = parse_message(b"$PGRMZ,1*4F\r\n", ComplianceMode::Lenient).unwrap_err();
    assert_eq!(err, Failure::at(Error::UnhandledVendorExtMessage, 13));
}

#[test]
fn test_vendor_handler_fills_message() {
    let mut handler = CommaSeparated { calls: 0 };
    {
        let mut parser = ParserBuilder::new()
            .vendor_handler(
                |sentence: &[u8], message: &mut Message, end: &mut usize, mode: ComplianceMode| -> Result<(), Error> {
                    handler.handle(sentence, message, end, mode)
                },
            )
            .build();
        let parsed = parser.parse(b"$PGRMZ,1,2*51\r\n").unwrap();

        assert_eq!(parsed.message.talker_id(), b"PG");
        assert_eq!(parsed.message.type_code(), b"RMZ");
        assert_eq!(parsed.message.fields(), ["1", "2"]);
        assert_eq!(parsed.end_index, 15);
    }
    assert_eq!(handler.calls, 1);
}

#[test]
fn test_vendor_status_propagated() {
    let mut parser = ParserBuilder::new()
        .vendor_handler(
            |_: &[u8], _: &mut Message, _: &mut usize, _: ComplianceMode| -> Result<(), Error> {
                Err(Error::Vendor("unknown Garmin sentence"))
            },
        )
        .build();

    let err = parser.parse(b"$PGRMZ,1*4F\r\n").unwrap_err();
    assert_eq!(err, Failure::at(Error::Vendor("unknown Garmin sentence"), 13));

    let mut parser = ParserBuilder::new()
        .vendor_handler(
            |_: &[u8], _: &mut Message, _: &mut usize, _: ComplianceMode| -> Result<(), Error> {
                Err(Error::ChecksumExpected)
            },
        )
        .build();

    let err = parser.parse(b"$PGRMZ,1*4F\r\n").unwrap_err();
    assert_eq!(err.error, Error::ChecksumExpected);
}

#[test]
fn test_vendor_handler_sees_mode() {
    let mut seen = None;
    {
        let mut parser = ParserBuilder::new()
            .compliance_mode(ComplianceMode::Strict)
            .vendor_handler(
                |_: &[u8], _: &mut Message, _: &mut usize, mode: ComplianceMode| -> Result<(), Error> {
                    seen = Some(mode);
                    Ok(())
                },
            )
            .build();
        parser.parse(b"$PGRMZ,1*4F\r\n").unwrap();
    }
    assert_eq!(seen, Some(ComplianceMode::Strict));
}

#[test]
fn test_vendor_handler_moves_end_index() {
    // A handler that treats the following line as a continuation.
    let mut parser = ParserBuilder::new()
        .vendor_handler(
            |sentence: &[u8], _: &mut Message, end_index: &mut usize, _: ComplianceMode| -> Result<(), Error> {
                let continuation = sentence.iter().skip(12).position(|&b| b == b'\n');
                *end_index += continuation.map_or(0, |pos| pos + 1);
                Ok(())
            },
        )
        .build();

    let input = b"$PGRMZ,1*4F\r\n+more\r\n$GPGGA,1,2*55\r\n";
    let parsed = parser.parse(input).unwrap();
    assert_eq!(parsed.end_index, 20);

    let next = parser.parse(&input[parsed.end_index..]).unwrap();
    assert_eq!(next.message.type_code(), b"GGA");
}

#[test]
fn test_vendor_end_index_outside_input_reported() {
    let mut parser = ParserBuilder::new()
        .contract_policy(ContractPolicy::Report)
        .vendor_handler(
            |_: &[u8], _: &mut Message, end_index: &mut usize, _: ComplianceMode| -> Result<(), Error> {
                *end_index = 1000;
                Ok(())
            },
        )
        .build();

    let err = parser.parse(b"$PGRMZ,1*4F\r\n").unwrap_err();
    assert_eq!(err, Failure::at(Error::ImplementationError, 13));
}

#[test]
#[should_panic(expected = "contract violation")]
fn test_vendor_end_index_rewound_panics() {
    let mut parser = ParserBuilder::new()
        .contract_policy(ContractPolicy::Panic)
        .vendor_handler(
            |_: &[u8], _: &mut Message, end_index: &mut usize, _: ComplianceMode| -> Result<(), Error> {
                *end_index = 0;
                Ok(())
            },
        )
        .build();

    let _ = parser.parse(b"$PGRMZ,1*4F\r\n");
}

#[test]
fn test_vendor_sentence_still_checksummed() {
    let mut parser = ParserBuilder::new()
        .vendor_handler(CommaSeparated { calls: 0 })
        .build();

    let err = parser.parse(b"$PGRMZ,1*1A\r\n").unwrap_err();
    assert_eq!(
        err.error,
        Error::ChecksumError {
            expected: 0x4F,
            found: Some(0x1A),
        }
    );
}

#[test]
fn test_vendor_handler_cannot_store_delimiters() {
    let mut parser = ParserBuilder::new()
        .vendor_handler(
            |sentence: &[u8], message: &mut Message, _: &mut usize, _: ComplianceMode| -> Result<(), Error> {
                let body = sentence.split(|&b| b == b'*').next().unwrap_or_default();
                message.push_field(&body[6..])
            },
        )
        .build();

    let err = parser.parse(b"$PGRMZ,1,2*51\r\n").unwrap_err();
    assert_eq!(err, Failure::at(Error::ReservedByte(b','), 15));
}
