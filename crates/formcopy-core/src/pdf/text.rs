//! PDF text string decoding and encoding.
//!
//! Decoding never fails: undecodable units become U+FFFD so one malformed name
//! cannot abort a whole extraction.

use lopdf::{Object, StringFormat};

const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

/// PDFDocEncoding code points for 0x18..=0x1F.
const PDFDOC_18_1F: [char; 8] = [
    '\u{02D8}', '\u{02C7}', '\u{02C6}', '\u{02D9}', '\u{02DD}', '\u{02DB}', '\u{02DA}', '\u{02DC}',
];

/// PDFDocEncoding code points for 0x80..=0xA0. 0x9F is undefined.
const PDFDOC_80_A0: [char; 33] = [
    '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}', '\u{2044}',
    '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}', '\u{201D}', '\u{2018}',
    '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}', '\u{0141}', '\u{0152}', '\u{0160}',
    '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}', '\u{0153}', '\u{0161}', '\u{017E}', REPLACEMENT,
    '\u{20AC}',
];

/// Decode the bytes of a PDF text string.
///
/// Handles UTF-16BE and UTF-16LE with byte order mark, UTF-8 with BOM, and
/// falls back to PDFDocEncoding.
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => bytes.iter().map(|&b| pdfdoc_char(b)).collect(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units: Vec<u16> = chunks.map(|pair| to_unit([pair[0], pair[1]])).collect();

    let mut text: String = char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(REPLACEMENT))
        .collect();
    if dangling {
        text.push(REPLACEMENT);
    }
    text
}

fn pdfdoc_char(byte: u8) -> char {
    match byte {
        0x18..=0x1F => PDFDOC_18_1F[(byte - 0x18) as usize],
        0x7F | 0xAD => REPLACEMENT,
        0x80..=0xA0 => PDFDOC_80_A0[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

/// Encode text as a PDF string object.
///
/// ASCII stays a literal string; anything else becomes UTF-16BE with BOM.
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
