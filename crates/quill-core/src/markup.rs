//! `&`-prefixed colour codes in chat text, e.g. `&bWelcome &7to the chat`.

/// Sixteen-colour palette addressed by a single hex digit.
const PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (0, 0, 170),
    (0, 170, 0),
    (0, 170, 170),
    (170, 0, 0),
    (170, 0, 170),
    (255, 170, 0),
    (170, 170, 170),
    (85, 85, 85),
    (85, 85, 255),
    (85, 255, 85),
    (85, 255, 255),
    (255, 85, 85),
    (255, 85, 255),
    (255, 255, 85),
    (255, 255, 255),
];

const MARKER: char = '&';

/// Index into the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const WHITE: ColorCode = ColorCode(15);

    /// Parses the digit following a `&`. Upper- and lower-case hex are both accepted.
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(16).map(|d| Self(d as u8))
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        PALETTE[usize::from(self.0)]
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A run of text drawn in one colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: ColorCode,
}

/// Splits `line` into coloured runs. Text before the first code is white;
/// a `&` not followed by a hex digit is kept as-is.
pub fn parse_markup(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut color = ColorCode::default();
    let mut text = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == MARKER {
            if let Some(code) = chars.peek().copied().and_then(ColorCode::from_char) {
                chars.next();
                if !text.is_empty() {
                    spans.push(Span {
                        text: std::mem::take(&mut text),
                        color,
                    });
                }
                color = code;
                continue;
            }
        }
        text.push(c);
    }

    if !text.is_empty() {
        spans.push(Span { text, color });
    }
    spans
}

/// `line` with every colour code removed.
pub fn strip_markup(line: &str) -> String {
    parse_markup(line).into_iter().map(|span| span.text).collect()
}
