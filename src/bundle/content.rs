//! Decoding and normalising file content before it enters a bundle

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// A `USE <database>` line immediately followed by a `GO` line
static USE_GO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*USE[ \t]+[^\n]*\n[ \t]*GO[ \t]*(?:\n|$)").expect("valid USE/GO regex")
});

/// Decode, normalise newlines and drop database switches.
///
/// The result always ends with a newline (unless empty).
pub fn prepare(bytes: &[u8], path: &str) -> String {
    let text = decode(bytes, path);
    let mut text = strip_use_statements(&normalise_newlines(&text));
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Decode bytes, honouring a BOM when present.
///
/// Without a BOM the bytes are read as UTF-8, falling back to Windows-1252
/// for anything else.
pub fn decode(bytes: &[u8], path: &str) -> String {
    match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding != UTF_8 => {
            let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            if had_errors {
                warn!(path, encoding = encoding.name(), "Malformed sequences replaced while decoding");
            }
            text.into_owned()
        }
        Some((_, bom_len)) => decode_utf8_or_cp1252(&bytes[bom_len..], path),
        None => decode_utf8_or_cp1252(bytes, path),
    }
}

fn decode_utf8_or_cp1252(bytes: &[u8], path: &str) -> String {
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            warn!(path, "File is not valid UTF-8; decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
    }
}

/// Convert CRLF (and stray CR) line endings to LF
pub fn normalise_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove `USE <database>` / `GO` pairs so a file cannot retarget the bundle
pub fn strip_use_statements(text: &str) -> String {
    USE_GO.replace_all(text, "").into_owned()
}
