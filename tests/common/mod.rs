#![allow(dead_code)]

//! Hand-built box bytes for tests.

pub const IDENTITY: [i32; 9] = [0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000];

pub fn boxed(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&((payload.len() + 8) as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

/// Box written with `size == 1` and a 64-bit large size.
pub fn large_boxed(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(&((payload.len() + 16) as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

pub fn container(typ: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    boxed(typ, &children.concat())
}

pub fn full_box(typ: &[u8; 4], version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut p = vec![version];
    p.extend_from_slice(&flags.to_be_bytes()[1..]);
    p.extend_from_slice(body);
    boxed(typ, &p)
}

pub fn ftyp(major: &[u8; 4], minor: u32, brands: &[&[u8; 4]]) -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(major);
    p.extend_from_slice(&minor.to_be_bytes());
    for b in brands {
        p.extend_from_slice(*b);
    }
    boxed(b"ftyp", &p)
}

fn word(v: &mut Vec<u8>, version: u8, x: u64) {
    if version == 1 {
        v.extend_from_slice(&x.to_be_bytes());
    } else {
        v.extend_from_slice(&(x as u32).to_be_bytes());
    }
}

fn matrix(v: &mut Vec<u8>, m: &[i32; 9]) {
    for x in m {
        v.extend_from_slice(&x.to_be_bytes());
    }
}

pub struct Mvhd {
    pub version: u8,
    pub creation: u64,
    pub modification: u64,
    pub timescale: u32,
    pub duration: u64,
    pub rate: i32,
    pub volume: i16,
    pub matrix: [i32; 9],
    pub next_track_id: u32,
}

impl Default for Mvhd {
    fn default() -> Self {
        Mvhd {
            version: 0,
            creation: 0,
            modification: 0,
            timescale: 1000,
            duration: 0,
            rate: 0x0001_0000,
            volume: 0x0100,
            matrix: IDENTITY,
            next_track_id: 2,
        }
    }
}

impl Mvhd {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut b = Vec::new();
        word(&mut b, self.version, self.creation);
        word(&mut b, self.version, self.modification);
        b.extend_from_slice(&self.timescale.to_be_bytes());
        word(&mut b, self.version, self.duration);
        b.extend_from_slice(&self.rate.to_be_bytes());
        b.extend_from_slice(&self.volume.to_be_bytes());
        b.extend_from_slice(&[0u8; 10]);
        matrix(&mut b, &self.matrix);
        b.extend_from_slice(&[0u8; 24]);
        b.extend_from_slice(&self.next_track_id.to_be_bytes());
        full_box(b"mvhd", self.version, 0, &b)
    }
}

pub struct Tkhd {
    pub version: u8,
    pub flags: u32,
    pub creation: u64,
    pub modification: u64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    pub volume: i16,
    pub width: u32,
    pub height: u32,
}

impl Default for Tkhd {
    fn default() -> Self {
        Tkhd {
            version: 0,
            flags: 0x3,
            creation: 0,
            modification: 0,
            track_id: 1,
            duration: 0,
            layer: 0,
            alternate_group: 0,
            volume: 0,
            width: 0,
            height: 0,
        }
    }
}

impl Tkhd {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut b = Vec::new();
        word(&mut b, self.version, self.creation);
        word(&mut b, self.version, self.modification);
        b.extend_from_slice(&self.track_id.to_be_bytes());
        b.extend_from_slice(&[0u8; 4]);
        word(&mut b, self.version, self.duration);
        b.extend_from_slice(&[0u8; 8]);
        b.extend_from_slice(&self.layer.to_be_bytes());
        b.extend_from_slice(&self.alternate_group.to_be_bytes());
        b.extend_from_slice(&self.volume.to_be_bytes());
        b.extend_from_slice(&[0u8; 2]);
        matrix(&mut b, &IDENTITY);
        b.extend_from_slice(&(self.width << 16).to_be_bytes());
        b.extend_from_slice(&(self.height << 16).to_be_bytes());
        full_box(b"tkhd", self.version, self.flags, &b)
    }
}

pub fn mdhd(version: u8, timescale: u32, duration: u64, lang: u16) -> Vec<u8> {
    let mut b = Vec::new();
    word(&mut b, version, 0);
    word(&mut b, version, 0);
    b.extend_from_slice(&timescale.to_be_bytes());
    word(&mut b, version, duration);
    b.extend_from_slice(&lang.to_be_bytes());
    b.extend_from_slice(&[0u8; 2]);
    full_box(b"mdhd", version, 0, &b)
}

pub fn hdlr(handler: &[u8; 4], name: &str) -> Vec<u8> {
    let mut b = vec![0u8; 4];
    b.extend_from_slice(handler);
    b.extend_from_slice(&[0u8; 12]);
    b.extend_from_slice(name.as_bytes());
    b.push(0);
    full_box(b"hdlr", 0, 0, &b)
}

pub fn stco(entries: &[u32]) -> Vec<u8> {
    let mut b = (entries.len() as u32).to_be_bytes().to_vec();
    for e in entries {
        b.extend_from_slice(&e.to_be_bytes());
    }
    full_box(b"stco", 0, 0, &b)
}

pub fn co64(entries: &[u64]) -> Vec<u8> {
    let mut b = (entries.len() as u32).to_be_bytes().to_vec();
    for e in entries {
        b.extend_from_slice(&e.to_be_bytes());
    }
    full_box(b"co64", 0, 0, &b)
}

/// `trak` with `tkhd` and `mdia/{mdhd,hdlr,minf/stbl/<chunk table>}`.
pub fn trak(tkhd: &Tkhd, handler: &[u8; 4], chunk_table: Vec<u8>) -> Vec<u8> {
    let stbl = container(b"stbl", &[boxed(b"stsd", &[0u8; 8]), chunk_table]);
    let minf = container(b"minf", &[full_box(b"vmhd", 0, 1, &[0u8; 8]), stbl]);
    let mdia = container(
        b"mdia",
        &[mdhd(0, 90_000, 180_000, 0x15c7), hdlr(handler, "Handler"), minf],
    );
    container(b"trak", &[tkhd.to_bytes(), mdia])
}
