//! Recursive-descent decoder for extended JSON.
//!
//! The decoder reads one value with the grammar of strict JSON extended by bare identifiers:
//! unquoted object keys, constants such as `MinKey` and constructor calls such as
//! `ObjectId("...")`. Every object whose first key names a keyed hook is re-decoded from its raw
//! text with the registry's restricted counterpart and handed to the hook. Constructor calls
//! are rewritten into the object form of their hook, so both spellings of a literal share one
//! implementation.

use crate::{
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::{
        lexer::{Lexer, Token, TokenKind},
        registry::{KeyedHook, Registry},
        ser,
    },
    spec::ElementType,
};

/// How deeply arrays, objects and constructor calls may nest.
pub const MAX_DEPTH: usize = 256;

/// Decodes one extended JSON value from `bytes` using `registry`.
pub fn decode_with(bytes: &[u8], registry: &Registry) -> Result<Bson> {
    decode_nested(bytes, registry, 0)
}

/// Decodes one extended JSON object from `bytes` using `registry`. Any other top-level value is
/// a type mismatch.
pub fn decode_document_with(bytes: &[u8], registry: &Registry) -> Result<Document> {
    decode_document_nested(bytes, registry, 0)
}

fn decode_nested(bytes: &[u8], registry: &Registry, depth: usize) -> Result<Bson> {
    let input = simdutf8::compat::from_utf8(bytes)
        .map_err(|e| Error::syntax(e.valid_up_to(), "invalid UTF-8"))?;
    let mut parser = Parser {
        lexer: Lexer::new(input),
        registry,
        depth,
    };
    let first = parser.lexer.next_token()?;
    let value = parser.parse_value(first)?;
    let trailing = parser.lexer.next_token()?;
    if trailing.kind != TokenKind::Eof {
        return Err(Error::syntax(
            trailing.start,
            format!("unexpected {} after the value", trailing.kind.describe()),
        ));
    }
    Ok(value)
}

fn decode_document_nested(bytes: &[u8], registry: &Registry, depth: usize) -> Result<Document> {
    match decode_nested(bytes, registry, depth)? {
        Bson::Document(doc) => Ok(doc),
        other => Err(Error::unexpected_type(
            ElementType::Document,
            other.element_type(),
        )),
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    registry: &'a Registry,
    depth: usize,
}

fn unexpected(token: &Token<'_>) -> Error {
    Error::syntax(token.start, format!("unexpected {}", token.kind.describe()))
}

impl<'a> Parser<'a> {
    fn enter(&mut self, offset: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::syntax(
                offset,
                format!("nesting deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self, token: Token<'a>) -> Result<Bson> {
        match token.kind {
            TokenKind::ObjectOpen => {
                self.enter(token.start)?;
                let value = self.parse_object(token.start)?;
                self.leave();
                Ok(value)
            }
            TokenKind::ArrayOpen => {
                self.enter(token.start)?;
                let value = self.parse_array()?;
                self.leave();
                Ok(Bson::Array(value))
            }
            TokenKind::String(s) => Ok(Bson::String(s)),
            TokenKind::Number(text) => parse_number(text, token.start),
            TokenKind::Identifier(name) => self.parse_identifier(name, token.start),
            _ => Err(unexpected(&token)),
        }
    }

    fn parse_array(&mut self) -> Result<Vec<Bson>> {
        let mut values = Vec::new();
        let mut token = self.lexer.next_token()?;
        if token.kind == TokenKind::ArrayClose {
            return Ok(values);
        }

        loop {
            let index = values.len();
            values.push(self.parse_value(token).map_err(|e| with_index(e, index))?);

            let separator = self.lexer.next_token()?;
            match separator.kind {
                TokenKind::ArrayClose => return Ok(values),
                TokenKind::Comma => {
                    token = self.lexer.next_token()?;
                    if token.kind == TokenKind::ArrayClose {
                        if self.registry.allows_trailing_commas() {
                            return Ok(values);
                        }
                        return Err(Error::syntax(separator.start, "trailing comma"));
                    }
                }
                _ => return Err(unexpected(&separator)),
            }
        }
    }

    fn parse_key(&self, token: Token<'a>) -> Result<String> {
        match token.kind {
            TokenKind::String(key) => Ok(key),
            TokenKind::Identifier(key) if self.registry.allows_unquoted_keys() => {
                Ok(key.to_string())
            }
            TokenKind::Identifier(key) => Err(Error::syntax(
                token.start,
                format!("unquoted key `{key}`"),
            )),
            _ => Err(unexpected(&token)),
        }
    }

    fn expect_colon(&mut self) -> Result<()> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Colon => Ok(()),
            _ => Err(unexpected(&token)),
        }
    }

    fn parse_object(&mut self, open: usize) -> Result<Bson> {
        let mut doc = Document::new();
        let mut token = self.lexer.next_token()?;
        if token.kind == TokenKind::ObjectClose {
            return Ok(Bson::Document(doc));
        }

        let first = self.parse_key(token)?;
        if let Some(hook) = self.registry.keyed_hook(&first) {
            return self.dispatch_keyed(&first, hook, open);
        }

        let mut key = first;
        loop {
            self.expect_colon()?;
            let value_token = self.lexer.next_token()?;
            let value = self
                .parse_value(value_token)
                .map_err(|e| with_key(e, &key))?;
            doc.insert(key, value);

            let separator = self.lexer.next_token()?;
            match separator.kind {
                TokenKind::ObjectClose => return Ok(Bson::Document(doc)),
                TokenKind::Comma => {
                    token = self.lexer.next_token()?;
                    if token.kind == TokenKind::ObjectClose {
                        if self.registry.allows_trailing_commas() {
                            return Ok(Bson::Document(doc));
                        }
                        return Err(Error::syntax(separator.start, "trailing comma"));
                    }
                    key = self.parse_key(token)?;
                }
                _ => return Err(unexpected(&separator)),
            }
        }
    }

    /// Hands the object opened at `open` to `hook`. The object is skipped to find its span, then
    /// that span is decoded again with the restricted registry.
    fn dispatch_keyed(&mut self, key: &str, hook: KeyedHook, open: usize) -> Result<Bson> {
        self.lexer.reset(open);
        let end = self.skip_value()?;
        let raw = &self.lexer.input()[open..end];

        let body = decode_document_nested(raw.as_bytes(), self.registry.restricted(), self.depth)
            .map_err(|e| {
                e.relocate(&|offset: usize| open + offset)
                    .into_invalid_literal(key, raw.as_bytes())
            })?;
        self.registry
            .dispatch(key, hook, body)
            .map_err(|e| e.into_invalid_literal(key, raw.as_bytes()))
    }

    fn parse_identifier(&mut self, name: &'a str, start: usize) -> Result<Bson> {
        match name {
            "true" => return Ok(Bson::Boolean(true)),
            "false" => return Ok(Bson::Boolean(false)),
            "null" => return Ok(Bson::Null),
            _ => {}
        }

        let mut full_name = name.to_string();
        if name == "new" {
            if let TokenKind::Identifier(class) = self.lexer.peek()?.kind {
                self.lexer.next_token()?;
                full_name = format!("new {class}");
            }
        }

        if self.lexer.peek()?.kind == TokenKind::ParenOpen {
            self.enter(start)?;
            let value = self.parse_call(&full_name, start)?;
            self.leave();
            return Ok(value);
        }

        self.registry
            .constant(&full_name)
            .cloned()
            .ok_or_else(|| Error::syntax(start, format!("unknown identifier `{full_name}`")))
    }

    /// Decodes `Name(args...)` by rewriting it into the object form registered for `Name`.
    fn parse_call(&mut self, name: &str, start: usize) -> Result<Bson> {
        let registry = self.registry;
        let Some(constructor) = registry.constructor(name) else {
            return Err(Error::syntax(start, format!("unknown constructor `{name}`")));
        };
        let paren = self.lexer.next_token()?;
        debug_assert_eq!(paren.kind, TokenKind::ParenOpen);

        let mut args = Vec::new();
        let close = loop {
            let next = self.lexer.peek()?;
            if next.kind == TokenKind::ParenClose {
                self.lexer.next_token()?;
                break next.end;
            }
            let arg_start = next.start;
            let arg_end = self.skip_value()?;
            args.push((arg_start, &self.lexer.input()[arg_start..arg_end]));

            let separator = self.lexer.next_token()?;
            match separator.kind {
                TokenKind::ParenClose => break separator.end,
                TokenKind::Comma => {
                    let next = self.lexer.peek()?;
                    if next.kind == TokenKind::ParenClose && !registry.allows_trailing_commas() {
                        return Err(Error::syntax(separator.start, "trailing comma"));
                    }
                }
                _ => return Err(unexpected(&separator)),
            }
        };

        if args.len() > constructor.args.len() {
            return Err(Error::syntax(
                start,
                format!(
                    "{name} takes at most {} argument(s), {} given",
                    constructor.args.len(),
                    args.len()
                ),
            ));
        }

        // (offset in `synthetic`, offset in the input, length) of every argument.
        let mut placed = Vec::with_capacity(args.len());
        let mut synthetic = String::from("{");
        ser::write_quoted(&mut synthetic, &constructor.key);
        synthetic.push_str(":{");
        for (i, (arg_name, &(arg_start, raw))) in constructor.args.iter().zip(&args).enumerate() {
            if i > 0 {
                synthetic.push(',');
            }
            ser::write_quoted(&mut synthetic, arg_name);
            synthetic.push(':');
            placed.push((synthetic.len(), arg_start, raw.len()));
            synthetic.push_str(raw);
        }
        synthetic.push_str("}}");

        // Offsets inside an argument map back into it, anything else to the call itself.
        let relocate = |offset: usize| {
            placed
                .iter()
                .find(|&&(at, _, len)| (at..=at + len).contains(&offset))
                .map_or(start, |&(at, from, _)| from + (offset - at))
        };

        let raw_call = &self.lexer.input()[start..close];
        tracing::trace!(
            constructor = name,
            key = %constructor.key,
            "rewriting constructor call"
        );

        match registry.keyed_hook(&constructor.key) {
            Some(hook) => {
                let body =
                    decode_document_nested(synthetic.as_bytes(), registry.restricted(), self.depth)
                        .map_err(|e| {
                            e.relocate(&relocate)
                                .into_invalid_literal(name, raw_call.as_bytes())
                        })?;
                registry
                    .dispatch(&constructor.key, hook, body)
                    .map_err(|e| e.into_invalid_literal(name, raw_call.as_bytes()))
            }
            None => decode_nested(synthetic.as_bytes(), registry, self.depth).map_err(|e| {
                e.relocate(&relocate)
                    .into_invalid_literal(name, raw_call.as_bytes())
            }),
        }
    }

    /// Consumes one value without building it and returns the offset just past it. Only the
    /// bracket structure is checked; the content is validated when the span is decoded.
    fn skip_value(&mut self) -> Result<usize> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::ObjectOpen | TokenKind::ArrayOpen | TokenKind::ParenOpen => {
                self.skip_group(token)
            }
            TokenKind::Identifier(name) => {
                let mut end = token.end;
                let mut next = self.lexer.peek()?;
                if name == "new" {
                    if let TokenKind::Identifier(_) = next.kind {
                        self.lexer.next_token()?;
                        end = next.end;
                        next = self.lexer.peek()?;
                    }
                }
                if next.kind == TokenKind::ParenOpen {
                    let paren = self.lexer.next_token()?;
                    end = self.skip_group(paren)?;
                }
                Ok(end)
            }
            TokenKind::String(_) | TokenKind::Number(_) => Ok(token.end),
            _ => Err(unexpected(&token)),
        }
    }

    fn skip_group(&mut self, open: Token<'a>) -> Result<usize> {
        let mut closers = vec![closer_of(&open.kind)];
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::ObjectOpen | TokenKind::ArrayOpen | TokenKind::ParenOpen => {
                    if self.depth + closers.len() >= MAX_DEPTH {
                        return Err(Error::syntax(
                            token.start,
                            format!("nesting deeper than {MAX_DEPTH} levels"),
                        ));
                    }
                    closers.push(closer_of(&token.kind));
                }
                TokenKind::ObjectClose | TokenKind::ArrayClose | TokenKind::ParenClose => {
                    if closers.pop() != Some(closer_of(&token.kind)) {
                        return Err(unexpected(&token));
                    }
                    if closers.is_empty() {
                        return Ok(token.end);
                    }
                }
                TokenKind::Eof => {
                    return Err(Error::syntax(token.start, "unexpected end of input"));
                }
                _ => {}
            }
        }
    }
}

/// The closing byte of the bracket pair a punctuation token belongs to.
fn closer_of(kind: &TokenKind<'_>) -> u8 {
    match kind {
        TokenKind::ObjectOpen | TokenKind::ObjectClose => b'}',
        TokenKind::ArrayOpen | TokenKind::ArrayClose => b']',
        _ => b')',
    }
}

/// Integer literals become [`Bson::Integer`] unless they overflow `i64`; anything with a
/// fraction or an exponent is a double.
fn parse_number(text: &str, offset: usize) -> Result<Bson> {
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Bson::Integer(n));
        }
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Bson::Double(f)),
        Ok(_) => Err(Error::syntax(offset, format!("number {text} is out of range"))),
        Err(e) => Err(Error::syntax(offset, format!("invalid number {text}: {e}"))),
    }
}

fn with_key(error: Error, key: &str) -> Error {
    if error.key.is_some() || error.index.is_some() {
        error
    } else {
        error.with_key(key)
    }
}

fn with_index(error: Error, index: usize) -> Error {
    if error.key.is_some() || error.index.is_some() {
        error
    } else {
        error.with_index(index)
    }
}
