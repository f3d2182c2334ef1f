use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, WINDOWS_1252};
use engine_logging::engine_debug;

pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// One candidate in the decoding chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Latin1,
    Iso8859_1,
    Windows1252,
    /// An encoding supplied by detection or by the caller.
    Label(&'static Encoding),
}

/// Tried in order when no hint is given or the hint fails.
pub const FALLBACK_CHAIN: [Charset; 4] = [
    Charset::Utf8,
    Charset::Latin1,
    Charset::Iso8859_1,
    Charset::Windows1252,
];

impl Charset {
    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "latin-1",
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::Windows1252 => "windows-1252",
            Charset::Label(encoding) => encoding.name(),
        }
    }

    /// Decode without replacement; `None` on any malformed sequence.
    fn decode_strict<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Charset::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            // Every byte maps to the code point of the same value.
            Charset::Latin1 | Charset::Iso8859_1 => {
                Some(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
            }
            Charset::Windows1252 => decode_strict_with(WINDOWS_1252, bytes),
            Charset::Label(encoding) => decode_strict_with(*encoding, bytes),
        }
    }
}

fn decode_strict_with<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    (!had_errors).then_some(text)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: &'static str,
    /// Set when every candidate failed and invalid bytes were dropped.
    pub lossy: bool,
}

/// Decode bytes with `hint` first, then [`FALLBACK_CHAIN`]. Never fails.
pub fn decode_bytes(bytes: &[u8], hint: Option<&'static Encoding>) -> DecodedText {
    let chain: Vec<Charset> = hint
        .map(Charset::Label)
        .into_iter()
        .chain(FALLBACK_CHAIN)
        .collect();
    decode_with_chain(bytes, &chain)
}

/// Accept the first candidate that decodes cleanly and yields no U+FFFD;
/// otherwise decode as UTF-8 dropping invalid sequences.
pub fn decode_with_chain(bytes: &[u8], chain: &[Charset]) -> DecodedText {
    for charset in chain {
        match charset.decode_strict(bytes) {
            Some(text) if !text.contains(REPLACEMENT_CHARACTER) => {
                return DecodedText {
                    text: text.into_owned(),
                    encoding_label: charset.label(),
                    lossy: false,
                };
            }
            Some(_) => engine_debug!("{} produced replacement characters", charset.label()),
            None => engine_debug!("bytes are not valid {}", charset.label()),
        }
    }

    DecodedText {
        text: decode_utf8_dropping_invalid(bytes),
        encoding_label: "UTF-8",
        lossy: true,
    }
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Best guess at the encoding of `bytes`: BOM first, then statistical
/// detection. Empty input is indeterminate.
pub fn detect_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() {
        return None;
    }
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    Some(detector.guess(None, true))
}

/// Decode an HTML body with a known encoding, substituting U+FFFD for
/// malformed sequences.
pub fn decode_html(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _had_errors) = encoding.decode_with_bom_removal(bytes);
    text.into_owned()
}
