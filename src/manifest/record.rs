//! Literal-only parser for the `key=value, ...` lines of the data file.
//!
//! Lines look like keyword arguments, for example
//! `number=19, name="019 - KK Inv.Nr3940", tags="Deutschland\tRenaissance\tx", year=1496`.
//! Only literals are understood: integers, floats, quoted strings, `None`, `True`,
//! `False` and bracketed lists of those. Nothing on the line is ever executed.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::error::{RecordParseError, RecordParseErrorKind};
use crate::models::DataRecord;

/// How the raw `tags` string is split into tags.
#[derive(Debug, Clone)]
pub struct TagRules {
    /// Separator between tags.
    pub separator: String,
    /// Placeholder tag dropped from the result.
    pub sentinel: String,
}

impl Default for TagRules {
    fn default() -> Self {
        Self {
            separator: "\t".into(),
            sentinel: "x".into(),
        }
    }
}

impl TagRules {
    /// Split a raw tag string, removing every sentinel occurrence.
    pub fn split(&self, raw: &str) -> Vec<String> {
        raw.split(self.separator.as_str())
            .filter(|tag| *tag != self.sentinel)
            .map(str::to_string)
            .collect()
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("invalid identifier regex"))
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?").expect("invalid number regex")
    })
}

/// Parse every non-blank line of a data file into records.
///
/// The first malformed line aborts parsing; records parsed before it are discarded.
pub fn parse_data_file(text: &str, rules: &TagRules) -> Result<Vec<DataRecord>, RecordParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_record_line(line, index + 1, rules))
        .collect()
}

/// Parse one data file line into a record.
///
/// `number` must be an integer and `tags` a string, which is split into a list in place.
/// Field order follows the line. An `audio` value on the line keeps its position but is
/// reset to `null` because it is always recomputed.
pub fn parse_record_line(
    line: &str,
    line_no: usize,
    rules: &TagRules,
) -> Result<DataRecord, RecordParseError> {
    let mut fields = parse_fields(line, line_no)?;
    let at_line = |kind| RecordParseError::new(line_no, 1, kind);

    if let Some(tags) = fields.get_mut("tags") {
        let Value::String(raw) = tags else {
            return Err(at_line(RecordParseErrorKind::WrongType {
                field: "tags",
                expected: "a string",
            }));
        };
        let split = rules.split(raw).into_iter().map(Value::String).collect();
        *tags = Value::Array(split);
    }

    if let Some(audio) = fields.get_mut("audio") {
        *audio = Value::Null;
    }

    DataRecord::from_fields(fields).map_err(at_line)
}

/// Parse the `key=value` pairs of a line, preserving their order.
pub fn parse_fields(line: &str, line_no: usize) -> Result<Map<String, Value>, RecordParseError> {
    let mut cursor = Cursor::new(line, line_no);
    let mut fields = Map::new();

    cursor.skip_whitespace();
    while !cursor.at_end() {
        let key_column = cursor.column();
        let key = cursor.identifier()?;
        cursor.skip_whitespace();
        cursor.expect('=')?;
        cursor.skip_whitespace();
        let value = cursor.value()?;

        if fields.contains_key(&key) {
            return Err(RecordParseError::new(
                line_no,
                key_column,
                RecordParseErrorKind::DuplicateField(key),
            ));
        }
        fields.insert(key, value);

        cursor.skip_whitespace();
        if cursor.at_end() {
            break;
        }
        cursor.expect(',')?;
        cursor.skip_whitespace();
    }

    Ok(fields)
}

struct Cursor<'a> {
    line: &'a str,
    line_no: usize,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str, line_no: usize) -> Self {
        Self {
            line,
            line_no,
            pos: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn column(&self) -> usize {
        self.line[..self.pos].chars().count() + 1
    }

    fn error(&self, kind: RecordParseErrorKind) -> RecordParseError {
        RecordParseError::new(self.line_no, self.column(), kind)
    }

    fn unexpected(&self) -> RecordParseError {
        match self.peek() {
            Some(c) => self.error(RecordParseErrorKind::UnexpectedChar(c)),
            None => self.error(RecordParseErrorKind::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), RecordParseError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn identifier(&mut self) -> Result<String, RecordParseError> {
        let Some(found) = identifier_pattern().find(self.rest()) else {
            return Err(self.unexpected());
        };
        self.pos += found.end();
        Ok(found.as_str().to_string())
    }

    fn value(&mut self) -> Result<Value, RecordParseError> {
        match self.peek() {
            None => Err(self.unexpected()),
            Some('"') | Some('\'') => self.string().map(Value::String),
            Some('u') | Some('U')
                if self.rest()[1..].starts_with('"') || self.rest()[1..].starts_with('\'') =>
            {
                self.bump();
                self.string().map(Value::String)
            }
            Some('[') => self.list('['),
            Some('(') => self.list('('),
            Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(),
            Some(_) => self.constant(),
        }
    }

    fn constant(&mut self) -> Result<Value, RecordParseError> {
        let start = self.column();
        let word = self.identifier()?;
        match word.as_str() {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => Err(RecordParseError::new(
                self.line_no,
                start,
                RecordParseErrorKind::UnknownIdentifier(word),
            )),
        }
    }

    fn number(&mut self) -> Result<Value, RecordParseError> {
        let Some(found) = number_pattern().find(self.rest()) else {
            return Err(self.unexpected());
        };
        let start = self.column();
        let literal = found.as_str();
        self.pos += found.end();

        let invalid = || {
            RecordParseError::new(
                self.line_no,
                start,
                RecordParseErrorKind::InvalidNumber(literal.to_string()),
            )
        };

        if literal.contains(['.', 'e', 'E']) {
            let parsed: f64 = literal.parse().map_err(|_| invalid())?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(invalid)
        } else {
            let parsed: i64 = literal.parse().map_err(|_| invalid())?;
            Ok(Value::Number(parsed.into()))
        }
    }

    fn list(&mut self, open: char) -> Result<Value, RecordParseError> {
        let close = if open == '[' { ']' } else { ')' };
        self.expect(open)?;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn string(&mut self) -> Result<String, RecordParseError> {
        let start = self.column();
        let Some(quote) = self.bump() else {
            return Err(self.unexpected());
        };
        let mut text = String::new();

        loop {
            match self.bump() {
                None => {
                    return Err(RecordParseError::new(
                        self.line_no,
                        start,
                        RecordParseErrorKind::UnterminatedString,
                    ));
                }
                Some(c) if c == quote => return Ok(text),
                Some('\\') => self.escape(&mut text)?,
                Some(c) => text.push(c),
            }
        }
    }

    fn escape(&mut self, text: &mut String) -> Result<(), RecordParseError> {
        let Some(code) = self.bump() else {
            return Err(self.error(RecordParseErrorKind::UnterminatedString));
        };
        match code {
            't' => text.push('\t'),
            'n' => text.push('\n'),
            'r' => text.push('\r'),
            '0' => text.push('\0'),
            'a' => text.push('\u{7}'),
            'b' => text.push('\u{8}'),
            'f' => text.push('\u{c}'),
            'v' => text.push('\u{b}'),
            '\\' | '\'' | '"' => text.push(code),
            'x' => text.push(self.hex_escape(code, 2)?),
            'u' => text.push(self.hex_escape(code, 4)?),
            other => {
                // Unknown escapes stay literal, backslash included.
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, code: char, len: usize) -> Result<char, RecordParseError> {
        let digits: String = self.rest().chars().take(len).collect();
        let invalid = || {
            self.error(RecordParseErrorKind::InvalidEscape(format!(
                "{code}{digits}"
            )))
        };
        if digits.chars().count() != len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(&digits, 16).map_err(|_| invalid())?;
        let decoded = char::from_u32(value).ok_or_else(invalid)?;
        self.pos += digits.len();
        Ok(decoded)
    }
}
