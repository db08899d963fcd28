use {
    crossterm::{
        Command,
        style::{Attribute, Color, SetAttribute, SetForegroundColor},
    },
    std::{
        fmt::{self, Display, Write},
        iter::repeat_n,
        str::FromStr,
    },
};


/// the character that introduces a style tag, unless configured otherwise.
pub const DEFAULT_PREFIX: char = '#';

/// how text is encoded for the terminal.
///
/// this is decided once at startup and handed to everything that renders text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderConfig {
    /// whether style tags emit terminal escape sequences, or are stripped.
    pub styled: bool,
    /// the character that introduces a style tag.
    pub prefix: char,
}

/// a style that a tag selects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Code {
    Reset,
    Bold,
    /// red.
    Danger,
    /// yellow.
    Warn,
    /// green.
    Good,
    Cyan,
    Blue,
    Purple,
}

/// a piece of parsed markup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// literal text, with escaped prefixes already resolved.
    Text(String),
    /// a style switch. these occupy no terminal columns.
    Style(Code),
}

/// text with inline styles, parsed once from the `#x` tag language.
///
/// a tag is the prefix character followed by one code character: a digit `0`-`7` or the
/// mnemonic letter of a [`Code`]. a doubled prefix (`##`) is a literal prefix character.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Markup {
    tokens: Vec<Token>,
}

/// how [`Markup::justify`] distributes padding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Eq, PartialEq)]
pub enum MarkupError {
    /// a prefix was followed by a character that is not in the code table.
    UnknownCode { code: char, position: usize },
    /// the input ended directly after a prefix.
    Dangling { position: usize },
}

// === impl RenderConfig ===

impl RenderConfig {
    /// a configuration that strips every style tag.
    pub const fn plain() -> Self {
        Self {
            styled: false,
            prefix: DEFAULT_PREFIX,
        }
    }

    /// a configuration that emits terminal escape sequences for style tags.
    pub const fn fancy() -> Self {
        Self {
            styled: true,
            prefix: DEFAULT_PREFIX,
        }
    }

    /// parses markup using this configuration's prefix.
    pub fn parse(&self, input: &str) -> Result<Markup, MarkupError> {
        Markup::parse(input, self.prefix)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::plain()
    }
}

// === impl Code ===

impl Code {
    /// every code, in digit order.
    const ALL: [Self; 8] = [
        Self::Reset,
        Self::Bold,
        Self::Danger,
        Self::Warn,
        Self::Good,
        Self::Cyan,
        Self::Blue,
        Self::Purple,
    ];

    /// looks up the code named by the character following a prefix.
    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|code| code.digit() == c || code.mnemonic() == c)
    }

    pub const fn digit(self) -> char {
        match self {
            Self::Reset => '0',
            Self::Bold => '1',
            Self::Danger => '2',
            Self::Warn => '3',
            Self::Good => '4',
            Self::Cyan => '5',
            Self::Blue => '6',
            Self::Purple => '7',
        }
    }

    pub const fn mnemonic(self) -> char {
        match self {
            Self::Reset => 'r',
            Self::Bold => 'b',
            Self::Danger => 'd',
            Self::Warn => 'w',
            Self::Good => 'g',
            Self::Cyan => 'c',
            Self::Blue => 'u',
            Self::Purple => 'p',
        }
    }

    /// writes the escape sequence that switches the terminal to this style.
    fn write_ansi(self, f: &mut impl Write) -> fmt::Result {
        let color = match self {
            Self::Reset => return SetAttribute(Attribute::Reset).write_ansi(f),
            Self::Bold => return SetAttribute(Attribute::Bold).write_ansi(f),
            Self::Danger => Color::Red,
            Self::Warn => Color::Yellow,
            Self::Good => Color::Green,
            Self::Cyan => Color::Cyan,
            Self::Blue => Color::Blue,
            Self::Purple => Color::Magenta,
        };

        SetForegroundColor(color).write_ansi(f)
    }
}

// === impl Markup ===

impl Markup {
    /// returns empty markup.
    pub fn new() -> Self {
        Self::default()
    }

    /// parses `input`, treating `prefix` as the tag character.
    pub fn parse(input: &str, prefix: char) -> Result<Self, MarkupError> {
        let mut markup = Self::new();
        let mut text = String::new();
        let mut chars = input.char_indices();

        while let Some((position, c)) = chars.next() {
            if c != prefix {
                text.push(c);
                continue;
            }

            match chars.next() {
                None => return Err(MarkupError::Dangling { position }),
                Some((_, c)) if c == prefix => text.push(prefix),
                Some((_, c)) => {
                    let code = Code::from_char(c)
                        .ok_or(MarkupError::UnknownCode { code: c, position })?;
                    markup = markup.text(std::mem::take(&mut text)).style(code);
                }
            }
        }

        Ok(markup.text(text))
    }

    /// appends a style switch.
    pub fn style(mut self, code: Code) -> Self {
        self.tokens.push(Token::Style(code));
        self
    }

    /// appends literal text. the text is not parsed for tags.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }

        match self.tokens.last_mut() {
            Some(Token::Text(last)) => last.push_str(&text),
            _ => self.tokens.push(Token::Text(text)),
        }

        self
    }

    /// appends the tokens of another piece of markup.
    pub fn append(self, other: Markup) -> Self {
        other
            .tokens
            .into_iter()
            .fold(self, |markup, token| match token {
                Token::Text(text) => markup.text(text),
                Token::Style(code) => markup.style(code),
            })
    }

    /// rewrites every run of literal text, leaving styles in place.
    pub fn map_text(self, mut f: impl FnMut(&str) -> String) -> Self {
        let tokens = self
            .tokens
            .into_iter()
            .map(|token| match token {
                Token::Text(text) => Token::Text(f(&text)),
                style => style,
            })
            .collect();
        Self { tokens }
    }

    /// returns the literal text, without any styles.
    pub fn plain_text(&self) -> String {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Text(text) => Some(text.as_str()),
                Token::Style(_) => None,
            })
            .collect()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// returns the logical length: the number of terminal columns this occupies.
    ///
    /// style tags contribute nothing, and an escaped prefix counts once.
    pub fn len(&self) -> usize {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Text(text) => text.chars().count(),
                Token::Style(_) => 0,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// pads this with `fill` until its logical length reaches `width`.
    ///
    /// markup that is already at least `width` wide is returned unchanged. centered padding
    /// places the smaller half before the text.
    pub fn justify(self, width: usize, align: Align, fill: char) -> Self {
        let pad = width.saturating_sub(self.len());
        if pad == 0 {
            return self;
        }

        let (before, after) = match align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };

        Self::new()
            .text(repeat_n(fill, before).collect::<String>())
            .append(self)
            .text(repeat_n(fill, after).collect::<String>())
    }

    /// encodes this for the terminal, terminated by a reset if it is not already.
    pub fn encode(&self, config: &RenderConfig) -> String {
        let mut encoded = String::with_capacity(self.len());
        let mut write = |token: &Token| -> fmt::Result {
            match token {
                Token::Text(text) => encoded.push_str(text),
                Token::Style(code) if config.styled => code.write_ansi(&mut encoded)?,
                Token::Style(_) => {}
            }
            Ok(())
        };

        let reset = Token::Style(Code::Reset);
        let trailer = (self.tokens.last() != Some(&reset)).then_some(&reset);

        // writing into a `String` cannot fail.
        let _ = self.tokens.iter().chain(trailer).try_for_each(&mut write);

        encoded
    }
}

impl FromStr for Markup {
    type Err = MarkupError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input, DEFAULT_PREFIX)
    }
}

// === impl MarkupError ===

impl Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode { code, position } => {
                write!(f, "unknown style code `{code}` at byte {position}")
            }
            Self::Dangling { position } => {
                write!(f, "style prefix at byte {position} is missing its code")
            }
        }
    }
}

impl std::error::Error for MarkupError {}
