//! Header decoding: version detection, v16 size indirection and magic checks.

mod common;

use common::{Bytes, PageBuilder, config};
use obml_core::model::{Coords, Event, PageHeader};
use obml_core::{Decoder, ObmlError, Version, decode_bytes};

fn header(events: &[Event]) -> &PageHeader {
    match events.first() {
        Some(Event::Header(header)) => header,
        other => panic!("expected header first, got {other:?}"),
    }
}

#[test]
fn test_header_fields_per_version() {
    for version in [6, 12, 13, 16] {
        let data = PageBuilder::new(version).title("Front page").build();
        let events = decode_bytes(&data).unwrap();
        let header = header(&events);

        assert_eq!(header.title, "Front page", "version {version}");
        assert_eq!(header.url, "http://example.com/index.html");
        assert_eq!(header.dimensions, Coords::new(240, 1000));
        assert_eq!(events.len(), 1);
    }
}

#[test]
fn test_version_detected() {
    let data = PageBuilder::new(13).build();
    let mut decoder = Decoder::new(data.as_slice());
    assert_eq!(decoder.version(), None);

    assert!(matches!(decoder.next(), Some(Ok(Event::Header(_)))));
    assert_eq!(decoder.version(), Some(Version::V13));
}

#[test]
fn test_unknown_version_reads_nothing_further() {
    // Only the size prefix and version byte are present; any further read
    // would report truncation instead.
    let data = [0x00, 0x00, 0x10, 99];
    let mut decoder = Decoder::new(&data[..]);

    let err = decoder.next().unwrap().unwrap_err();
    assert!(matches!(err, ObmlError::UnknownVersion(99)));
    assert_eq!(decoder.offset(), 4);
    assert!(decoder.next().is_none());
}

#[test]
fn test_v16_size_indirection() {
    let page = PageBuilder::new(16).metadata(config());
    let data = page.build();
    assert_eq!(&data[..4], &[0x02, 0xd3, 0x55, 16]);
    assert_eq!(data[7], 16);

    let events = decode_bytes(&data).unwrap();
    assert_eq!(header(&events).title, "Test page");
}

#[test]
fn test_v16_bad_sentinel() {
    let mut data = PageBuilder::new(16).build();
    data[2] = 0x56;

    let err = decode_bytes(&data).unwrap_err();
    assert!(matches!(err, ObmlError::BadMagic { offset: 0, .. }));
}

#[test]
fn test_v16_inner_version_mismatch() {
    let mut data = PageBuilder::new(16).build();
    data[7] = 15;

    let err = decode_bytes(&data).unwrap_err();
    assert!(matches!(err, ObmlError::UnknownVersion(15)));
}

#[test]
fn test_v16_alternate_magic() {
    let mut data = PageBuilder::new(16).build();
    // sentinel, version, size, version, dimensions
    let magic = 3 + 1 + 3 + 1 + 5;
    data[magic] = 0xff;
    data[magic + 1] = 0xff;

    assert!(decode_bytes(&data).is_ok());
}

#[test]
fn test_bad_magic() {
    let mut data = PageBuilder::new(12).build();
    let magic = 3 + 1 + 5;
    data[magic + 3] = 0x03;

    let err = decode_bytes(&data).unwrap_err();
    match err {
        ObmlError::BadMagic { offset, found, .. } => {
            assert_eq!(offset, magic as u64);
            assert_eq!(found, vec![0, 0, 0, 3, 0]);
        }
        other => panic!("expected BadMagic, got {other:?}"),
    }
}

#[test]
fn test_v15_header_unsupported() {
    let data = PageBuilder::new(15).build();
    let err = decode_bytes(&data).unwrap_err();
    assert!(matches!(err, ObmlError::UnsupportedVariant(_)));
}

#[test]
fn test_truncated_header() {
    let data = PageBuilder::new(12).build();
    let err = decode_bytes(&data[..12]).unwrap_err();
    assert!(matches!(err, ObmlError::Truncated { .. }));
}

#[test]
fn test_absolute_page_url_kept() {
    let mut page = PageBuilder::new(6);
    page.url = "https://elsewhere.net/a".to_string();
    let events = decode_bytes(&page.build()).unwrap();
    assert_eq!(header(&events).url, "https://elsewhere.net/a");
}

#[test]
fn test_empty_stream() {
    let err = decode_bytes(&Bytes::new().build()).unwrap_err();
    assert!(matches!(err, ObmlError::Truncated { offset: 0, wanted: 3 }));
}

#[test]
fn test_minimal_v6_fixture() {
    let data = hex::decode(concat!(
        "00001c",     // size
        "06",         // version
        "0000000000", // dimensions
        "0000000200", // magic
        "0000",       // title
        "0000",       // unused blob
        "0000",       // URL base
        "0000",       // page URL
        "00",         // trailer
        "53000000",   // link section, empty
        "53000000",   // embedded files, empty
    ))
    .unwrap();

    let events = decode_bytes(&data).unwrap();
    assert_eq!(
        events,
        vec![Event::Header(PageHeader {
            title: String::new(),
            url: String::new(),
            dimensions: Coords::new(0, 0),
        })]
    );
}
