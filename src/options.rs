/// Default nesting limit for lists and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Whether whitespace between elements is tolerated.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Whitespace {
    /// Canonical grammar only.
    #[default]
    Strict,
    /// Skip `' '` and `'\n'` before any value and between container elements.
    /// Meant for hand-written fixtures; the encoder never emits it.
    Lenient,
}

impl Whitespace {
    pub(crate) fn skips(self, byte: u8) -> bool {
        self == Whitespace::Lenient && matches!(byte, b' ' | b'\n')
    }
}

/// Knobs for [`crate::decode_with`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecodeOptions {
    pub whitespace: Whitespace,
    pub max_depth: usize,
    /// When false, bytes after the first complete value are an error.
    pub allow_trailing: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            whitespace: Whitespace::Strict,
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: true,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self::default().with_whitespace(Whitespace::Lenient)
    }

    pub fn with_whitespace(mut self, whitespace: Whitespace) -> Self {
        self.whitespace = whitespace;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_allow_trailing(mut self, allow_trailing: bool) -> Self {
        self.allow_trailing = allow_trailing;
        self
    }
}
