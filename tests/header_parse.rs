mod common;

use common::{boxed, large_boxed};
use mp4walk::{BoxSize, ByteCursor, FourCC, ParseError, read_box_header};

#[test]
fn read_single_ftyp_header() {
    let data = common::ftyp(b"isom", 512, &[b"isom"]);
    let mut cur = ByteCursor::new(&data);

    let hdr = read_box_header(&mut cur, data.len()).expect("read_box_header failed");

    assert_eq!(hdr.start, 0);
    assert_eq!(hdr.size(), 20);
    assert_eq!(hdr.size_field, BoxSize::Normal(20));
    assert_eq!(hdr.typ, FourCC(*b"ftyp"));
    assert_eq!(hdr.header_size, 8);
    assert_eq!(hdr.payload_start, 8);
    assert_eq!(hdr.end, 20);
    assert_eq!(cur.position(), hdr.payload_start);
}

#[test]
fn ordinary_and_large_headers_round_trip() {
    let payload = [7u8; 5];
    let cases = [(boxed(b"free", &payload), 8), (large_boxed(b"free", &payload), 16)];
    for (bytes, header_size) in cases {
        let mut cur = ByteCursor::new(&bytes);
        let hdr = read_box_header(&mut cur, bytes.len()).unwrap();
        assert_eq!(hdr.typ, FourCC(*b"free"));
        assert_eq!(hdr.header_size, header_size);
        assert_eq!(hdr.size(), bytes.len() as u64);
        assert_eq!(hdr.payload_len(), payload.len());
    }
}

#[test]
fn large_size_of_sixteen_is_accepted() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"skip");
    data.extend_from_slice(&16u64.to_be_bytes());

    let mut cur = ByteCursor::new(&data);
    let hdr = read_box_header(&mut cur, data.len()).unwrap();
    assert_eq!(hdr.size_field, BoxSize::Large(16));
    assert_eq!(hdr.end, hdr.start + 16);
    assert_eq!(hdr.payload_start, 16);
    assert_eq!(hdr.payload_len(), 0);
}

#[test]
fn large_size_below_header_is_invalid() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"skip");
    data.extend_from_slice(&8u64.to_be_bytes());

    let mut cur = ByteCursor::new(&data);
    assert_eq!(
        read_box_header(&mut cur, data.len()),
        Err(ParseError::InvalidSize { offset: 0, size: 8 })
    );
}

#[test]
fn large_size_past_range_is_invalid() {
    let mut data = large_boxed(b"mdat", &[0u8; 4]);
    data[8..16].copy_from_slice(&1000u64.to_be_bytes());
    let mut cur = ByteCursor::new(&data);
    assert!(matches!(
        read_box_header(&mut cur, data.len()),
        Err(ParseError::InvalidSize { size: 1000, .. })
    ));
}

#[test]
fn small_sizes_are_invalid() {
    for size in [2u32, 7] {
        let mut data = boxed(b"free", &[0u8; 8]);
        data[..4].copy_from_slice(&size.to_be_bytes());
        let mut cur = ByteCursor::new(&data);
        assert_eq!(
            read_box_header(&mut cur, data.len()),
            Err(ParseError::InvalidSize { offset: 0, size: size as u64 })
        );
    }
}

#[test]
fn size_past_range_end_is_invalid() {
    let data = boxed(b"free", &[0u8; 8]);
    let mut cur = ByteCursor::new(&data);
    // range ends before the box does
    assert_eq!(
        read_box_header(&mut cur, 12),
        Err(ParseError::InvalidSize { offset: 0, size: 16 })
    );
}

#[test]
fn size_zero_extends_to_range_end() {
    let mut data = boxed(b"mdat", &[1, 2, 3, 4, 5]);
    data[..4].copy_from_slice(&0u32.to_be_bytes());
    let mut cur = ByteCursor::new(&data);
    let hdr = read_box_header(&mut cur, data.len()).unwrap();
    assert_eq!(hdr.size_field, BoxSize::ToEnd);
    assert_eq!(hdr.end, data.len());
    assert_eq!(hdr.payload_len(), 5);
}

#[test]
fn fewer_than_eight_bytes_is_truncated() {
    let data = [0u8, 0, 0, 8, b'f', b'r'];
    let mut cur = ByteCursor::new(&data);
    assert_eq!(
        read_box_header(&mut cur, data.len()),
        Err(ParseError::TruncatedHeader { offset: 0, available: 6 })
    );
}

#[test]
fn large_header_needs_sixteen_bytes() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&[0, 0, 0]);
    let mut cur = ByteCursor::new(&data);
    assert_eq!(
        read_box_header(&mut cur, data.len()),
        Err(ParseError::TruncatedHeader { offset: 0, available: 11 })
    );
}

#[test]
fn range_end_past_buffer_is_out_of_bounds() {
    let data = boxed(b"free", &[]);
    let mut cur = ByteCursor::new(&data);
    assert!(matches!(
        read_box_header(&mut cur, 100),
        Err(ParseError::OutOfBounds { .. })
    ));
}

#[test]
fn uuid_box_carries_user_type() {
    let user = [0xAAu8; 16];
    let mut payload = user.to_vec();
    payload.extend_from_slice(b"xyz");
    let data = boxed(b"uuid", &payload);

    let mut cur = ByteCursor::new(&data);
    let hdr = read_box_header(&mut cur, data.len()).unwrap();
    assert_eq!(hdr.user_type, Some(user));
    assert_eq!(hdr.header_size, 24);
    assert_eq!(hdr.payload_len(), 3);
}

#[test]
fn uuid_box_too_small_for_user_type() {
    let data = boxed(b"uuid", &[0u8; 4]);
    let mut cur = ByteCursor::new(&data);
    assert!(matches!(
        read_box_header(&mut cur, data.len()),
        Err(ParseError::InvalidSize { offset: 0, size: 12 })
    ));
}

#[test]
fn header_at_nonzero_offset() {
    let mut data = vec![0xEEu8; 3];
    data.extend(boxed(b"abcd", &[9, 9]));
    let mut cur = ByteCursor::new(&data);
    cur.seek(3).unwrap();
    let hdr = read_box_header(&mut cur, data.len()).unwrap();
    assert_eq!(hdr.start, 3);
    assert_eq!(hdr.payload_start, 11);
    assert_eq!(hdr.end, 13);
}
