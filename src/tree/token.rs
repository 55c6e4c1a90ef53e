use std::fmt;

/// Token type of the end-of-input token.
pub const EOF: i32 = -1;

/// A lexed token as carried by terminal nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Token type, [`EOF`] at end of input
    pub token_type: i32,
    /// Matched text
    pub text: String,
    /// Position in the token stream
    pub index: usize,
    /// 1-based line of the first character
    pub line: u32,
    /// 0-based column of the first character
    pub column: u32,
}

impl Token {
    /// Creates a token of `token_type` with `text` at an unspecified position.
    pub fn new(token_type: i32, text: impl Into<String>) -> Self {
        Token {
            token_type,
            text: text.into(),
            index: 0,
            line: 1,
            column: 0,
        }
    }

    /// Creates the end-of-input token.
    #[must_use]
    pub fn eof() -> Self {
        Token::new(EOF, "<EOF>")
    }

    /// Returns `true` for the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.token_type == EOF
    }

    /// Sets the stream position of the token.
    #[must_use]
    pub fn at(mut self, index: usize, line: u32, column: u32) -> Self {
        self.index = index;
        self.line = line;
        self.column = column;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .text
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t");
        write!(
            f,
            "[@{},'{}',<{}>,{}:{}]",
            self.index, text, self.token_type, self.line, self.column
        )
    }
}
