use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::debug;

/// Lenient standard-alphabet engine: padding optional, trailing bits tolerated.
const LENIENT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// What a symbol decoder hands back for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSymbol {
    /// Byte-mode content, already raw.
    Binary(Vec<u8>),
    /// Text carrying base64-encoded bytes.
    Base64(String),
    /// Text to be taken as its UTF-8 bytes.
    Text(String),
}

impl DecodedSymbol {
    /// Classify decoder text: base64 when it decodes cleanly, plain text otherwise.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if decode_base64(&text).is_some() {
            DecodedSymbol::Base64(text)
        } else {
            DecodedSymbol::Text(text)
        }
    }

    /// Canonical byte sequence handed to the chunk parser.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            DecodedSymbol::Binary(b) => b,
            DecodedSymbol::Base64(s) => match decode_base64(&s) {
                Some(b) => b,
                None => {
                    debug!("base64 symbol did not decode; using its text bytes");
                    s.into_bytes()
                }
            },
            DecodedSymbol::Text(s) => s.into_bytes(),
        }
    }
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    LENIENT_B64.decode(compact.as_bytes()).ok()
}
