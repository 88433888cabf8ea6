//! Tokenizer for the extended JSON grammar.

use crate::error::{Error, Result};

/// The syntactic class of a [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind<'a> {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    ParenOpen,
    ParenClose,
    Colon,
    Comma,
    /// A quoted string, already unescaped.
    String(String),
    /// The literal text of a number, validated against the JSON number grammar.
    Number(&'a str),
    /// A bare word: an unquoted key, a constant or a constructor name.
    Identifier(&'a str),
    Eof,
}

impl TokenKind<'_> {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::ObjectOpen => "'{'".to_string(),
            TokenKind::ObjectClose => "'}'".to_string(),
            TokenKind::ArrayOpen => "'['".to_string(),
            TokenKind::ArrayClose => "']'".to_string(),
            TokenKind::ParenOpen => "'('".to_string(),
            TokenKind::ParenClose => "')'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::String(s) => format!("string {s:?}"),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Identifier(name) => format!("identifier `{name}`"),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with the byte span it was read from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind<'a>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// A pull-based lexer over a UTF-8 buffer. Copying a lexer snapshots its position, which is
/// how the parser peeks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn input(&self) -> &'a str {
        self.input
    }

    /// Moves the lexer back (or forward) to `pos`, which must be a token boundary.
    pub(crate) fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn peek(&self) -> Result<Token<'a>> {
        let mut copy = *self;
        copy.next_token()
    }

    pub(crate) fn next_token(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace();

        let start = self.pos;
        let bytes = self.input.as_bytes();
        let Some(&b) = bytes.get(start) else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            });
        };

        let punct = match b {
            b'{' => Some(TokenKind::ObjectOpen),
            b'}' => Some(TokenKind::ObjectClose),
            b'[' => Some(TokenKind::ArrayOpen),
            b']' => Some(TokenKind::ArrayClose),
            b'(' => Some(TokenKind::ParenOpen),
            b')' => Some(TokenKind::ParenClose),
            b':' => Some(TokenKind::Colon),
            b',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = punct {
            self.pos += 1;
            return Ok(Token {
                kind,
                start,
                end: self.pos,
            });
        }

        let kind = match b {
            b'"' => TokenKind::String(self.read_string()?),
            b'-' | b'0'..=b'9' => TokenKind::Number(self.read_number()?),
            b if is_identifier_start(b) => TokenKind::Identifier(self.read_identifier()),
            _ => {
                let c = self.input[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(Error::syntax(start, format!("unexpected character {c:?}")));
            }
        };

        Ok(Token {
            kind,
            start,
            end: self.pos,
        })
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = bytes.get(self.pos) {
            self.pos += 1;
        }
    }

    fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while bytes.get(self.pos).is_some_and(|&b| is_identifier_byte(b)) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn read_number(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let digits = |pos: &mut usize| {
            let from = *pos;
            while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
                *pos += 1;
            }
            *pos - from
        };

        let mut pos = start;
        if bytes[pos] == b'-' {
            pos += 1;
        }
        match bytes.get(pos) {
            Some(b'0') => pos += 1,
            Some(b'1'..=b'9') => {
                digits(&mut pos);
            }
            _ => return Err(Error::syntax(pos, "expected a digit")),
        }
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            if digits(&mut pos) == 0 {
                return Err(Error::syntax(pos, "expected a digit after the decimal point"));
            }
        }
        if let Some(b'e' | b'E') = bytes.get(pos) {
            pos += 1;
            if let Some(b'+' | b'-') = bytes.get(pos) {
                pos += 1;
            }
            if digits(&mut pos) == 0 {
                return Err(Error::syntax(pos, "expected a digit in the exponent"));
            }
        }

        self.pos = pos;
        Ok(&self.input[start..pos])
    }

    fn read_string(&mut self) -> Result<String> {
        let open = self.pos;
        let bytes = self.input.as_bytes();
        let mut out = String::new();
        let mut pos = open + 1;
        let mut run = pos;

        loop {
            let Some(&b) = bytes.get(pos) else {
                return Err(Error::syntax(open, "unterminated string"));
            };
            match b {
                b'"' => {
                    out.push_str(&self.input[run..pos]);
                    self.pos = pos + 1;
                    return Ok(out);
                }
                b'\\' => {
                    out.push_str(&self.input[run..pos]);
                    pos = self.read_escape(pos, &mut out)?;
                    run = pos;
                }
                0x00..=0x1f => {
                    return Err(Error::syntax(pos, "control character in string"));
                }
                _ => pos += 1,
            }
        }
    }

    /// Decodes the escape sequence starting at the backslash at `pos` into `out` and returns the
    /// position just past it.
    fn read_escape(&self, pos: usize, out: &mut String) -> Result<usize> {
        let bytes = self.input.as_bytes();
        let Some(&c) = bytes.get(pos + 1) else {
            return Err(Error::syntax(pos, "unterminated string"));
        };
        let simple = match c {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let first = self.read_hex4(pos + 2)?;
                let mut next = pos + 6;
                let c = match first {
                    0xD800..=0xDBFF => {
                        let low = if bytes.get(next) == Some(&b'\\')
                            && bytes.get(next + 1) == Some(&b'u')
                        {
                            Some(self.read_hex4(next + 2)?)
                        } else {
                            None
                        };
                        match low {
                            Some(low @ 0xDC00..=0xDFFF) => {
                                next += 6;
                                let code = 0x10000 + ((first - 0xD800) << 10) + (low - 0xDC00);
                                char::from_u32(code).unwrap_or('\u{fffd}')
                            }
                            _ => '\u{fffd}',
                        }
                    }
                    0xDC00..=0xDFFF => '\u{fffd}',
                    code => char::from_u32(code).unwrap_or('\u{fffd}'),
                };
                out.push(c);
                return Ok(next);
            }
            _ => {
                return Err(Error::syntax(
                    pos,
                    format!("invalid escape sequence '\\{}'", c as char),
                ));
            }
        };
        out.push(simple);
        Ok(pos + 2)
    }

    fn read_hex4(&self, pos: usize) -> Result<u32> {
        let digits = self
            .input
            .get(pos..pos + 4)
            .filter(|s| s.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| Error::syntax(pos, "invalid unicode escape"))?;
        u32::from_str_radix(digits, 16).map_err(|_| Error::syntax(pos, "invalid unicode escape"))
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
