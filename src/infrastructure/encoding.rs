// ============================================================
// UPLOAD DECODING
// ============================================================
// Uploaded byte content to text with encoding detection

use encoding_rs::{Encoding, WINDOWS_1252};

/// Decode uploaded bytes into text. A byte-order mark wins when present;
/// otherwise strict UTF-8 is tried first, then windows-1252 as the legacy
/// spreadsheet-export fallback. Never fails: worst case is a lossy decode.
pub fn decode_upload(bytes: &[u8]) -> String {
    if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}
