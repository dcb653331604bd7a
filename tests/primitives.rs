use chrono::{TimeZone, Utc};
use mp4walk::{ByteCursor, FourCC, ParseError};

#[test]
fn fixed_16_16_one() {
    let data = [0x00, 0x01, 0x00, 0x00];
    let v = ByteCursor::new(&data).read_fixed_16_16().unwrap();
    assert_eq!(v.to_f64(), 1.0);
    assert_eq!(v.integer_part(), 1);
    assert_eq!(v.fraction_part(), 0);
}

#[test]
fn fixed_8_8_one() {
    let data = [0x01, 0x00];
    let v = ByteCursor::new(&data).read_fixed_8_8().unwrap();
    assert_eq!(v.to_f64(), 1.0);
    assert_eq!(v.integer_part(), 1);
    assert_eq!(v.fraction_part(), 0);
}

#[test]
fn fixed_point_keeps_fraction() {
    // 1920.5 as 16.16, 0.75 as 8.8
    let data = [0x07, 0x80, 0x80, 0x00, 0x00, 0xC0];
    let mut cur = ByteCursor::new(&data);
    let w = cur.read_fixed_16_16().unwrap();
    let vol = cur.read_fixed_8_8().unwrap();
    assert_eq!(w.integer_part(), 1920);
    assert_eq!(w.fraction_part(), 0x8000);
    assert_eq!(w.to_f64(), 1920.5);
    assert_eq!(w.to_bits(), 0x0780_8000);
    assert_eq!(vol.to_f64(), 0.75);
}

#[test]
fn mac_epoch_zero() {
    let data = [0u8; 4];
    let t = ByteCursor::new(&data).read_mac_epoch_time(4).unwrap();
    assert_eq!(t, Utc.with_ymd_and_hms(1904, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn mac_epoch_eight_byte_word() {
    // 2020-01-01T00:00:00Z is 3_660_681_600 s after 1904
    let data = 3_660_681_600u64.to_be_bytes();
    let mut cur = ByteCursor::new(&data);
    let t = cur.read_mac_epoch_time(8).unwrap();
    assert_eq!(t, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(cur.position(), 8);
}

#[test]
fn mac_epoch_out_of_range() {
    let data = u64::MAX.to_be_bytes();
    assert_eq!(
        ByteCursor::new(&data).read_mac_epoch_time(8),
        Err(ParseError::InvalidTimestamp { value: u64::MAX })
    );
}

#[test]
fn big_endian_integers() {
    let data = [0x00, 0x00, 0x02, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xff, 0xfe];
    let mut cur = ByteCursor::new(&data);
    assert_eq!(cur.read_u32_be().unwrap(), 512);
    assert_eq!(cur.read_u64_be().unwrap(), 0x0102_0304_0506_0708);
    assert_eq!(cur.read_i16_be().unwrap(), -2);
    assert!(matches!(cur.read_u8(), Err(ParseError::OutOfBounds { offset: 14, .. })));
}

#[test]
fn fourcc_is_compared_bytewise() {
    let data = [0xA9, b'n', b'a', b'm'];
    let cc = ByteCursor::new(&data).read_fourcc().unwrap();
    assert_eq!(cc, FourCC([0xA9, b'n', b'a', b'm']));
    assert_ne!(cc, FourCC(*b".nam"));
    assert_eq!(cc.to_string(), ".nam");
}
