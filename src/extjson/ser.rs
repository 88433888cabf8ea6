//! Encoder producing dense extended JSON in either of its two output modes.

use std::fmt::Write;

use crate::{
    bson::Bson,
    document::Document,
    error::Result,
    extjson::hooks,
};

/// The flavour of extended JSON to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Mode {
    /// Strict JSON. Values with no JSON counterpart are written as `$`-keyed wrapper objects
    /// such as `{"$oid":"..."}`.
    #[default]
    Canonical,

    /// The constructor-literal syntax of the MongoDB shell, e.g. `ObjectId("...")`. This output
    /// is not JSON.
    Extended,
}

/// Encodes `value` in `mode`.
pub fn to_string(value: &Bson, mode: Mode) -> Result<String> {
    let mut encoder = Encoder::new(mode);
    encoder.write_value(value)?;
    Ok(encoder.into_string())
}

/// Encodes `doc` in `mode`.
pub fn document_to_string(doc: &Document, mode: Mode) -> Result<String> {
    let mut encoder = Encoder::new(mode);
    encoder.write_document(doc)?;
    Ok(encoder.into_string())
}

/// Accumulates the output of one encode call.
pub(crate) struct Encoder {
    out: String,
    mode: Mode,
}

impl Encoder {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            out: String::new(),
            mode,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn into_string(self) -> String {
        self.out
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub(crate) fn push_display(&mut self, value: impl std::fmt::Display) {
        // Writing into a String cannot fail.
        let _ = write!(self.out, "{value}");
    }

    pub(crate) fn write_string(&mut self, s: &str) {
        write_quoted(&mut self.out, s);
    }

    /// Writes `{"<key>":` so a hook only has to add the value and the closing brace.
    pub(crate) fn open_wrapper(&mut self, key: &str) {
        self.out.push('{');
        self.write_string(key);
        self.out.push(':');
    }

    pub(crate) fn write_value(&mut self, value: &Bson) -> Result<()> {
        match value {
            Bson::Null => self.push_str("null"),
            Bson::Boolean(b) => self.push_str(if *b { "true" } else { "false" }),
            Bson::String(s) => self.write_string(s),
            Bson::Double(f) => hooks::number::write_double(self, *f)?,
            Bson::Integer(n) => hooks::number::write_integer(self, *n),
            Bson::Int32(n) => hooks::number::write_int32(self, *n),
            Bson::Int64(n) => hooks::number::write_int64(self, *n),
            Bson::Decimal128(d) => hooks::decimal::write(self, d),
            Bson::Binary(b) => hooks::binary::write(self, b),
            Bson::DateTime(d) => hooks::date::write(self, *d),
            Bson::Timestamp(ts) => hooks::timestamp::write(self, *ts),
            Bson::ObjectId(oid) => hooks::oid::write(self, *oid),
            Bson::RegularExpression(regex) => hooks::regex::write(self, regex),
            Bson::Undefined => hooks::undefined::write(self),
            Bson::MinKey | Bson::MaxKey => hooks::key::write(self),
            Bson::Array(values) => self.write_array(values)?,
            Bson::Document(doc) => self.write_document(doc)?,
        }
        Ok(())
    }

    fn write_array(&mut self, values: &[Bson]) -> Result<()> {
        self.out.push('[');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_value(value).map_err(|e| {
                if e.key.is_some() || e.index.is_some() {
                    e
                } else {
                    e.with_index(i)
                }
            })?;
        }
        self.out.push(']');
        Ok(())
    }

    pub(crate) fn write_document(&mut self, doc: &Document) -> Result<()> {
        self.out.push('{');
        for (i, (key, value)) in doc.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_string(key);
            self.out.push(':');
            self.write_value(value).map_err(|e| {
                if e.key.is_some() || e.index.is_some() {
                    e
                } else {
                    e.with_key(key.as_str())
                }
            })?;
        }
        self.out.push('}');
        Ok(())
    }
}

/// Appends `s` to `out` as a JSON string literal, escaping exactly what the lexer unescapes.
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    let mut run = 0;
    for (i, c) in s.char_indices() {
        let escape = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{8}' => "\\b",
            '\u{c}' => "\\f",
            c if c < ' ' => "",
            _ => continue,
        };
        out.push_str(&s[run..i]);
        if escape.is_empty() {
            let _ = write!(out, "\\u{:04x}", c as u32);
        } else {
            out.push_str(escape);
        }
        run = i + c.len_utf8();
    }
    out.push_str(&s[run..]);
    out.push('"');
}

