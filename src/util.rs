use std::fmt::Write;

/// Uppercase hex bytes separated by spaces, e.g. `00 01 00 00`.
pub fn spaced_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// Classic 16-bytes-per-line dump; `base` is the absolute offset of `bytes[0]`.
pub fn hex_dump(bytes: &[u8], base: usize) -> String {
    let mut out = String::new();
    for (i, line) in bytes.chunks(16).enumerate() {
        let ascii: String = line
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect();
        let hex = line.iter().map(|b| hex::encode([*b])).collect::<Vec<_>>().join(" ");
        let _ = writeln!(out, "{:08x}  {:<47}  |{}|", base + i * 16, hex, ascii);
    }
    out
}
