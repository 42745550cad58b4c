//! Encoding repair.
//!
//! Undecodable input is never an error: invalid UTF-8 byte sequences are
//! dropped, and so are characters that cannot appear in serialized markup
//! (C0 controls other than tab, line feed and carriage return, plus the
//! noncharacters U+FFFE and U+FFFF).

use log::debug;
use std::borrow::Cow;

/// Decodes `bytes` as UTF-8, dropping every invalid sequence.
pub fn repair_bytes(bytes: &[u8]) -> String {
    let mut repaired = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in bytes.utf8_chunks() {
        repaired.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    if dropped > 0 {
        debug!("Dropped {} undecodable byte(s) from input.", dropped);
    }
    repair_text(&repaired).into_owned()
}

fn is_representable(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{0}'..='\u{1f}' => false,
        '\u{fffe}' | '\u{ffff}' => false,
        _ => true,
    }
}

/// Removes characters that cannot be represented in the output text.
///
/// Borrows when nothing needs removing.
pub fn repair_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_representable) {
        return Cow::Borrowed(text);
    }
    let repaired: String = text.chars().filter(|c| is_representable(*c)).collect();
    debug!(
        "Removed {} unrepresentable character(s).",
        text.chars().count() - repaired.chars().count()
    );
    Cow::Owned(repaired)
}
