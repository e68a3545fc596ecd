use hardy_bpv6::{
    admin_record::{CustodyRange, Record},
    block::{Body, Type},
    bundle::{ParsedBundle, Priority},
    config::Config,
    diagnostic::Severity,
    error::{Error, ErrorKind},
    payload::SubProtocol,
};
use hardy_sdnv::encode::Encoder;

const LAST: u64 = 0x08;
const ADMIN_RECORD: u64 = 0x02;

// A version 6 primary block
fn primary(flags: u64, offsets: [u64; 8], dictionary: &[u8]) -> Vec<u8> {
    versioned_primary(6, flags, offsets, dictionary)
}

// A primary block in the SDNV layout shared by versions 5 and 6
fn versioned_primary(version: u8, flags: u64, offsets: [u64; 8], dictionary: &[u8]) -> Vec<u8> {
    let mut body = Encoder::new();
    for o in offsets {
        body.emit(o);
    }
    body.emit(1000);
    body.emit(1);
    body.emit(3600);
    body.emit(dictionary.len() as u64);
    body.emit_raw_slice(dictionary);
    if flags & 0x01 != 0 {
        body.emit(0);
        body.emit(100);
    }
    let body = body.build();

    let mut e = Encoder::new();
    e.emit_raw_slice(&[version]);
    e.emit(flags);
    e.emit(body.len() as u64);
    e.emit_raw_slice(&body);
    e.build()
}

fn cbhe(flags: u64, destination: (u64, u64), source: (u64, u64)) -> Vec<u8> {
    primary(
        flags,
        [destination.0, destination.1, source.0, source.1, 0, 0, 0, 0],
        &[],
    )
}

fn block(block_type: u8, flags: u64, data: &[u8]) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_raw_slice(&[block_type]);
    e.emit(flags);
    e.emit(data.len() as u64);
    e.emit_raw_slice(data);
    e.build()
}

fn decode(data: &[u8]) -> ParsedBundle {
    ParsedBundle::parse(data, &Config::default()).unwrap()
}

#[test]
fn cbhe_payload() {
    let data = [cbhe(0, (2, 1), (3, 4)), block(1, LAST, b"hello")].concat();
    let parsed = decode(&data);

    assert!(parsed.is_complete());
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.length, data.len());

    let bundle = &parsed.bundle;
    assert_eq!(bundle.version, 6);
    assert_eq!(bundle.destination.to_string(), "ipn:2.1");
    assert_eq!(bundle.source.to_string(), "ipn:3.4");
    assert_eq!(bundle.report_to.to_string(), "dtn:none");
    assert_eq!(bundle.timestamp.creation_time.seconds, 1000);
    assert_eq!(bundle.timestamp.sequence_number, 1);
    assert_eq!(bundle.lifetime, 3600);
    assert!(bundle.dictionary.is_cbhe());

    assert_eq!(bundle.blocks.len(), 1);
    let payload = bundle.payload().unwrap();
    assert_eq!(payload.block_type, Type::Payload);
    assert!(payload.flags.last_block);
    assert_eq!(payload.data.len(), 5);
    assert_eq!(&data[payload.data.clone()], b"hello");
    assert_eq!(payload.extent.end, data.len());
}

#[test]
fn null_destination() {
    let data = [cbhe(0, (0, 0), (1, 1)), block(1, LAST, b"")].concat();
    let parsed = decode(&data);
    assert_eq!(parsed.bundle.destination.to_string(), "dtn:none");
    assert!(parsed.bundle.destination.is_null());
}

#[test]
fn stops_at_last_block() {
    let data = [
        cbhe(0, (2, 1), (3, 4)),
        block(20, 0, &[0x05]),
        block(8, LAST, &[0x01, 0xaa]),
        b"junk".to_vec(),
    ]
    .concat();
    let parsed = decode(&data);

    assert!(parsed.error.is_none());
    assert_eq!(parsed.bundle.blocks.len(), 2);
    assert_eq!(parsed.bundle.blocks[0].block_type, Type::BundleAge);
    assert_eq!(parsed.bundle.blocks[1].block_type, Type::Metadata);
    assert_eq!(parsed.length, data.len() - 4);

    // Trailing bytes are reported, not decoded
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ErrorKind::StructuralMismatch);
    assert_eq!(parsed.diagnostics[0].severity, Severity::Advisory);
    assert_eq!(parsed.diagnostics[0].range, data.len() - 4..data.len());
}

#[test]
fn runs_out_of_blocks() {
    let data = [
        cbhe(0, (2, 1), (3, 4)),
        block(20, 0, &[0x05]),
        block(1, 0, b"x"),
    ]
    .concat();
    let parsed = decode(&data);

    assert_eq!(parsed.bundle.blocks.len(), 2);
    assert_eq!(parsed.error.as_ref().map(Error::kind), Some(ErrorKind::Truncated));
    assert!(!parsed.is_complete());
    assert_eq!(parsed.length, data.len());
}

#[test]
fn block_longer_than_buffer() {
    let mut data = [cbhe(0, (2, 1), (3, 4)), block(1, LAST, b"hello")].concat();
    data.truncate(data.len() - 1);
    let parsed = decode(&data);

    assert!(parsed.bundle.blocks.is_empty());
    assert_eq!(parsed.error.as_ref().map(Error::kind), Some(ErrorKind::Truncated));
}

#[test]
fn not_a_bundle() {
    let config = Config::default();
    assert!(matches!(
        ParsedBundle::parse(&[0x07, 0x00], &config),
        Err(Error::InvalidVersion(7))
    ));
    assert_eq!(
        ParsedBundle::parse(&[], &config).unwrap_err().kind(),
        ErrorKind::Truncated
    );
    assert_eq!(
        ParsedBundle::parse(&[0x06, 0x80], &config)
            .unwrap_err()
            .kind(),
        ErrorKind::Truncated
    );
}

#[test]
fn dictionary_endpoints() {
    let dictionary = b"dtn\0//a/b\0none\0";
    let data = [
        primary(0x10, [0, 4, 0, 4, 0, 10, 0, 10], dictionary),
        block(1, LAST, b""),
    ]
    .concat();
    let parsed = decode(&data);

    assert!(parsed.diagnostics.is_empty());
    let bundle = &parsed.bundle;
    assert!(bundle.flags.destination_singleton);
    assert!(!bundle.dictionary.is_cbhe());
    assert_eq!(bundle.destination.to_string(), "dtn://a/b");
    assert_eq!(bundle.source.to_string(), "dtn://a/b");
    assert!(bundle.report_to.is_null());
    assert!(bundle.custodian.is_null());
}

#[test]
fn dictionary_offset_out_of_range() {
    let dictionary = b"dtn\0none\0";
    let data = [
        primary(0, [0, 40, 0, 4, 0, 4, 0, 4], dictionary),
        block(1, LAST, b""),
    ]
    .concat();
    let parsed = decode(&data);

    // Advisory only; decoding continues
    assert!(parsed.is_complete());
    assert_eq!(parsed.bundle.blocks.len(), 1);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ErrorKind::OffsetRange);
}

#[test]
fn version_4() {
    let mut header = Vec::new();
    for o in [2u16, 1, 3, 4, 0, 0, 0, 0] {
        header.extend_from_slice(&o.to_be_bytes());
    }
    header.extend_from_slice(&500u32.to_be_bytes());
    header.extend_from_slice(&7u32.to_be_bytes());
    header.extend_from_slice(&60u32.to_be_bytes());
    header.push(0);

    // Processing, class of service and status report octets
    let mut data = vec![0x04, 0x08, 0x02, 0x08, header.len() as u8];
    data.extend_from_slice(&header);
    data.extend_from_slice(&block(20, 0, &[0x05]));
    // The payload block flags are a single octet
    data.extend_from_slice(&[0x01, 0x08, 0x03, b'a', b'b', b'c']);

    let parsed = decode(&data);
    assert!(parsed.is_complete());
    assert!(parsed.diagnostics.is_empty());

    let bundle = &parsed.bundle;
    assert_eq!(bundle.version, 4);
    assert!(bundle.flags.custody_requested);
    assert_eq!(bundle.flags.priority, Priority::Expedited);
    assert!(bundle.flags.delivery_report_requested);
    assert_eq!(bundle.destination.to_string(), "ipn:2.1");
    assert_eq!(bundle.source.to_string(), "ipn:3.4");
    assert_eq!(bundle.timestamp.creation_time.seconds, 500);
    assert_eq!(bundle.timestamp.sequence_number, 7);
    assert_eq!(bundle.lifetime, 60);
    assert_eq!(bundle.blocks.len(), 2);
    assert_eq!(&data[bundle.payload().unwrap().data.clone()], b"abc");
}

#[test]
fn version_5() {
    let data = [
        versioned_primary(5, 0, [2, 1, 3, 4, 0, 0, 0, 0], &[]),
        block(1, LAST, b"v5"),
    ]
    .concat();
    let parsed = decode(&data);

    assert!(parsed.is_complete());
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.length, data.len());

    let bundle = &parsed.bundle;
    assert_eq!(bundle.version, 5);
    assert_eq!(bundle.destination.to_string(), "ipn:2.1");
    assert_eq!(bundle.source.to_string(), "ipn:3.4");
    assert_eq!(bundle.lifetime, 3600);
    assert_eq!(&data[bundle.payload().unwrap().data.clone()], b"v5");
}

#[test]
fn truncated_header_length() {
    // The same field is named the same way in every layout
    for data in [&[0x06, 0x00, 0x80][..], &[0x04, 0x00, 0x00, 0x00, 0x80]] {
        let e = ParsedBundle::parse(data, &Config::default()).unwrap_err();
        assert!(matches!(
            e,
            Error::InvalidField {
                field: "header length",
                ..
            }
        ));
        assert_eq!(e.kind(), ErrorKind::Truncated);
    }
}

#[test]
fn header_length_mismatch() {
    let mut data = [cbhe(0, (2, 1), (3, 4)), block(1, LAST, b"")].concat();
    data[2] += 1;
    let parsed = decode(&data);

    assert!(parsed.is_complete());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ErrorKind::StructuralMismatch);
}

#[test]
fn fragment() {
    let data = [cbhe(0x01, (2, 1), (3, 4)), block(1, LAST, b"frag")].concat();
    let parsed = decode(&data);

    assert!(parsed.diagnostics.is_empty());
    let info = parsed.bundle.fragment_info.unwrap();
    assert_eq!(info.offset, 0);
    assert_eq!(info.total_len, 100);
}

#[test]
fn aggregate_custody_signal() {
    let data = [
        cbhe(ADMIN_RECORD, (2, 0), (3, 0)),
        block(1, LAST, &[0x40, 0x80, 0x05, 0x03]),
    ]
    .concat();
    let parsed = decode(&data);
    assert!(parsed.is_complete());

    let record = parsed.bundle.admin_record().unwrap();
    let Record::AggregateCustodySignal(acs) = &record.content else {
        panic!("Not an aggregate custody signal");
    };
    assert!(acs.status.succeeded);
    assert_eq!(acs.ranges, [CustodyRange { start: 5, end: 7 }]);
}

#[test]
fn aggregate_custody_signal_overrun() {
    // A second range runs past the declared payload length
    let record = [0x40, 0x80, 0x05, 0x03, 0x02];

    // Whether or not another block follows the payload
    for trailing_block in [true, false] {
        let mut data = cbhe(ADMIN_RECORD, (2, 0), (3, 0));
        if trailing_block {
            data.extend(block(1, 0, &record));
            data.extend(block(20, LAST, &[0x05]));
        } else {
            data.extend(block(1, LAST, &record));
        }
        let parsed = decode(&data);

        // The record is abandoned, the bundle is not
        assert!(parsed.error.is_none());
        assert_eq!(parsed.length, data.len());
        assert_eq!(parsed.bundle.blocks.len(), if trailing_block { 2 } else { 1 });
        assert!(parsed.bundle.admin_record().is_none());
        assert!(!parsed.is_complete());

        let errors: Vec<_> = parsed.diagnostics.iter().filter(|d| d.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::StructuralMismatch);
        assert_eq!(errors[0].range, parsed.bundle.blocks[0].data);
    }
}

#[test]
fn status_report_overrun() {
    // The source endpoint length runs past the payload into the bundle age block
    let data = [
        cbhe(ADMIN_RECORD, (2, 0), (3, 0)),
        block(1, 0, &[0x10, 0x00, 0x00, 0x00, 0x00, 0x03]),
        block(20, LAST, &[0x05]),
    ]
    .concat();
    let parsed = decode(&data);

    assert!(parsed.error.is_none());
    assert!(parsed.bundle.admin_record().is_none());
    let d = parsed.diagnostics.iter().find(|d| d.is_error()).unwrap();
    assert_eq!(d.kind, ErrorKind::StructuralMismatch);
    assert_eq!(d.range, parsed.bundle.blocks[0].data);

    // The following block is still decoded in full
    assert_eq!(parsed.bundle.blocks[1].block_type, Type::BundleAge);
    assert!(matches!(parsed.bundle.blocks[1].body, Body::BundleAge(_)));
}

#[test]
fn admin_records_disabled() {
    let data = [
        cbhe(ADMIN_RECORD, (2, 0), (3, 0)),
        block(1, LAST, &[0x40, 0x80, 0x05, 0x03]),
    ]
    .concat();
    let config = Config {
        admin_records: false,
        ..Default::default()
    };
    let parsed = ParsedBundle::parse(&data, &config).unwrap();
    assert!(parsed.bundle.admin_record().is_none());
    assert!(parsed.is_complete());
}

#[test]
fn sub_protocols() {
    let classify = |source, destination| {
        let data = [
            cbhe(0, (2, destination), (1, source)),
            block(1, LAST, b"pdu"),
        ]
        .concat();
        match decode(&data).bundle.payload().map(|b| &b.body) {
            Some(Body::Payload(p)) => p.sub_protocol,
            _ => panic!("No payload"),
        }
    };
    assert_eq!(classify(64, 64), Some(SubProtocol::FileDelivery));
    assert_eq!(classify(65, 65), Some(SubProtocol::Management));
    assert_eq!(classify(64, 1), None);

    // Dictionary endpoints are never classified
    let data = [
        primary(0, [0, 4, 0, 4, 0, 4, 0, 4], b"ipn\064\0"),
        block(1, LAST, b"pdu"),
    ]
    .concat();
    let Some(Body::Payload(p)) = decode(&data).bundle.payload().map(|b| b.body.clone()) else {
        panic!("No payload");
    };
    assert_eq!(p.sub_protocol, None);
}

#[test]
fn custody_transfer_enhancement() {
    let custodian = (5, 0);
    let cteb = |creator: &[u8]| {
        let mut body = vec![0x2a];
        body.extend_from_slice(creator);
        let data = [
            primary(0x08, [2, 1, 3, 4, 0, 0, custodian.0, custodian.1], &[]),
            block(10, 0, &body),
            block(1, LAST, b""),
        ]
        .concat();
        decode(&data)
    };

    let parsed = cteb(b"ipn:5.0");
    let Body::CustodyTransfer(c) = &parsed.bundle.blocks[0].body else {
        panic!("Not a CTEB");
    };
    assert_eq!(c.custody_id, 42);
    assert!(c.valid);
    assert!(parsed.diagnostics.is_empty());

    let parsed = cteb(b"ipn:6.0");
    let Body::CustodyTransfer(c) = &parsed.bundle.blocks[0].body else {
        panic!("Not a CTEB");
    };
    assert!(!c.valid);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ErrorKind::CustodianMismatch);
    assert!(parsed.is_complete());
}

#[test]
fn malformed_extension_block() {
    let data = [
        cbhe(0, (2, 1), (3, 4)),
        block(5, 0, b"ipn\0"),
        block(1, LAST, b"ok"),
    ]
    .concat();
    let parsed = decode(&data);

    assert!(parsed.error.is_none());
    assert_eq!(parsed.bundle.blocks.len(), 2);
    assert!(matches!(parsed.bundle.blocks[0].body, Body::Malformed));
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0].is_error());
    assert_eq!(parsed.diagnostics[0].range, parsed.bundle.blocks[0].data);
    assert!(!parsed.is_complete());
}

#[test]
fn unpacked_extensions() {
    let data = [
        cbhe(0, (2, 1), (3, 4)),
        block(5, 0, b"ipn\x007.1\x00"),
        block(20, 0, &hardy_sdnv::encode::emit(2_000_000)),
        block(19, 0x01, &[0x00, 0x01]),
        block(99, 0, b"opaque"),
        block(1, LAST, b""),
    ]
    .concat();
    let parsed = decode(&data);

    assert!(parsed.is_complete());
    assert!(parsed.diagnostics.is_empty());
    let bundle = &parsed.bundle;
    assert_eq!(bundle.previous_hop.as_deref(), Some("ipn:7.1"));
    assert_eq!(bundle.age, Some(core::time::Duration::from_secs(2)));
    assert!(matches!(
        bundle.blocks[2].body,
        Body::ExtendedClassOfService(_)
    ));
    assert_eq!(bundle.blocks[3].block_type, Type::Unrecognised(99));
    assert!(matches!(bundle.blocks[3].body, Body::Opaque));
}

#[test]
fn serialize() {
    let data = [cbhe(0, (2, 1), (3, 4)), block(1, LAST, b"hello")].concat();
    let parsed = decode(&data);
    let json = serde_json::to_value(&parsed.bundle).unwrap();

    assert_eq!(json["version"], 6);
    assert_eq!(json["lifetime"], 3600);
    assert_eq!(json["blocks"][0]["type"], "Payload");
    assert_eq!(json["blocks"][0]["flags"]["last_block"], true);
    assert_eq!(json["destination"]["Ipn"]["node_number"], 2);
}
