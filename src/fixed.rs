//! Fixed-point fields found in movie and track headers.
//!
//! Each type keeps the raw bits it was read from, so nothing is lost going
//! through `f64` for display.

use serde::{Serialize, Serializer};
use std::fmt;

/// Signed 16.16 fixed-point value (rate, most matrix entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed16_16(i32);

impl Fixed16_16 {
    pub const ONE: Self = Fixed16_16(0x0001_0000);

    pub const fn from_bits(bits: i32) -> Self {
        Fixed16_16(bits)
    }

    pub const fn to_bits(self) -> i32 {
        self.0
    }

    pub const fn integer_part(self) -> i16 {
        (self.0 >> 16) as i16
    }

    pub const fn fraction_part(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// `integer_part + fraction_part / 2^16`, exact.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }
}

/// Unsigned 16.16 fixed-point value (track width and height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UFixed16_16(u32);

impl UFixed16_16 {
    pub const fn from_bits(bits: u32) -> Self {
        UFixed16_16(bits)
    }

    pub const fn to_bits(self) -> u32 {
        self.0
    }

    pub const fn integer_part(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn fraction_part(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }
}

/// Signed 8.8 fixed-point value (volume).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed8_8(i16);

impl Fixed8_8 {
    pub const ONE: Self = Fixed8_8(0x0100);

    pub const fn from_bits(bits: i16) -> Self {
        Fixed8_8(bits)
    }

    pub const fn to_bits(self) -> i16 {
        self.0
    }

    pub const fn integer_part(self) -> i8 {
        (self.0 >> 8) as i8
    }

    pub const fn fraction_part(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }
}

impl fmt::Display for Fixed16_16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Display for UFixed16_16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Display for Fixed8_8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl Serialize for Fixed16_16 {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.to_f64())
    }
}

impl Serialize for UFixed16_16 {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.to_f64())
    }
}

impl Serialize for Fixed8_8 {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.to_f64())
    }
}

/// The 3x3 transformation matrix `{a, b, u, c, d, v, x, y, w}`.
///
/// `u`, `v` and `w` are 2.30 fixed point, the rest 16.16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matrix(pub [i32; 9]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([
        0x0001_0000,
        0,
        0,
        0,
        0x0001_0000,
        0,
        0,
        0,
        0x4000_0000,
    ]);

    pub fn raw(&self) -> &[i32; 9] {
        &self.0
    }

    /// Entry `i` (row-major) as a real number.
    pub fn get(&self, i: usize) -> Option<f64> {
        let bits = *self.0.get(i)?;
        Some(match i {
            2 | 5 | 8 => bits as f64 / (1u64 << 30) as f64,
            _ => bits as f64 / 65536.0,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Matrix::IDENTITY
    }

    /// Big-endian bytes of each entry, as stored in the file.
    pub fn to_be_bytes(&self) -> [[u8; 4]; 9] {
        self.0.map(i32::to_be_bytes)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let values: Vec<f64> = (0..9).filter_map(|i| self.get(i)).collect();
        values.serialize(s)
    }
}
