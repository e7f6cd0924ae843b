use super::SymbolVersion;

/// Segment encoding mode, from the 4-bit mode indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// 0001: digits 0-9
    Numeric,
    /// 0010: the 45-character alphanumeric set
    Alphanumeric,
    /// 0100: 8-bit bytes
    Byte,
    /// 1000: Shift-JIS double-byte characters
    Kanji,
    /// 0111: extended channel interpretation
    Eci,
    /// 0011: structured append header
    StructuredAppend,
    /// 0101: FNC1 in first position
    Fnc1First,
    /// 1001: FNC1 in second position
    Fnc1Second,
    /// 1101: GB 2312 Hanzi
    Hanzi,
    /// Any other indicator value
    Unknown(u8),
}

impl Mode {
    /// Mode for an indicator value. `None` is the 0000 end-of-message marker.
    pub fn from_indicator(bits: u8) -> Option<Self> {
        let mode = match bits & 0x0F {
            0b0000 => return None,
            0b0001 => Mode::Numeric,
            0b0010 => Mode::Alphanumeric,
            0b0100 => Mode::Byte,
            0b1000 => Mode::Kanji,
            0b0111 => Mode::Eci,
            0b0011 => Mode::StructuredAppend,
            0b0101 => Mode::Fnc1First,
            0b1001 => Mode::Fnc1Second,
            0b1101 => Mode::Hanzi,
            other => Mode::Unknown(other),
        };
        Some(mode)
    }

    /// Width of the character count indicator, for the modes that have one
    pub fn char_count_bits(self, version: SymbolVersion) -> Option<usize> {
        let widths: [usize; 3] = match self {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
            Mode::Kanji => [8, 10, 12],
            _ => return None,
        };
        Some(widths[version.count_tier()])
    }

    /// Number of payload bits carrying `count` characters
    pub fn payload_bits(self, count: usize) -> Option<usize> {
        match self {
            Mode::Numeric => Some(count / 3 * 10 + [0, 4, 7][count % 3]),
            Mode::Alphanumeric => Some(count / 2 * 11 + (count % 2) * 6),
            Mode::Byte => Some(count * 8),
            Mode::Kanji => Some(count * 13),
            _ => None,
        }
    }
}

/// Payload bits of one segment, realigned to start at bit 0 of `payload`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    /// Encoding mode
    pub mode: Mode,
    /// Number of meaningful bits in `payload`; trailing bits are zero
    pub valid_bit_count: usize,
    /// Payload bits packed MSB-first
    pub payload: Vec<u8>,
}

/// How the decoded payload should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Plain text
    Text,
    /// Raw bytes
    Binary,
    /// Text naming an action (URL, phone number, contact, ...)
    Action,
}

/// Decoded content, either text or raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text content
    Text(String),
    /// Binary content
    Binary(Vec<u8>),
}

impl Payload {
    /// Text content, if this payload is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Binary(_) => None,
        }
    }

    /// Payload bytes. Text is re-encoded as Latin-1, the byte mode's native charset.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Text(text) => latin1_bytes(text),
            Payload::Binary(bytes) => bytes.clone(),
        }
    }
}

/// Latin-1 encoding of `text`; characters above U+00FF become `?`
pub fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

/// Fully decoded symbol content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedData {
    /// Content interpretation
    pub content_type: ContentType,
    /// Decoded content
    pub payload: Payload,
}

/// Outcome of a scan as seen by callers that only need success and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Whether a payload was recovered
    pub success: bool,
    /// Content interpretation, on success
    pub content_type: Option<ContentType>,
    /// Decoded content, on success
    pub payload: Option<Payload>,
}

impl ScanResult {
    /// A failed scan: no content type and no payload
    pub fn failure() -> Self {
        Self {
            success: false,
            content_type: None,
            payload: None,
        }
    }

    /// Text content of a successful scan
    pub fn text(&self) -> Option<&str> {
        self.payload.as_ref().and_then(Payload::as_text)
    }
}

impl From<DecodedData> for ScanResult {
    fn from(data: DecodedData) -> Self {
        Self {
            success: true,
            content_type: Some(data.content_type),
            payload: Some(data.payload),
        }
    }
}
