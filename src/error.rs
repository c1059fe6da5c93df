//! Typed errors raised while reading the record data file.

use thiserror::Error;

/// A data file line that could not be turned into a record.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}, column {column}: {kind}")]
pub struct RecordParseError {
  /// One-based line number inside the data file.
  pub line: usize,
  /// One-based character column where parsing stopped.
  pub column: usize,
  /// What went wrong.
  pub kind: RecordParseErrorKind,
}

/// Reasons a record line is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum RecordParseErrorKind {
  /// The line ended while a value or pair was still expected.
  #[error("unexpected end of line")]
  UnexpectedEnd,
  /// A character that cannot start or continue the current token.
  #[error("unexpected character `{0}`")]
  UnexpectedChar(char),
  /// A bare word that is neither a field name nor a known constant.
  #[error("unknown identifier `{0}`")]
  UnknownIdentifier(String),
  /// A quoted string without its closing quote.
  #[error("unterminated string")]
  UnterminatedString,
  /// A backslash escape that is not supported.
  #[error("invalid escape sequence `\\{0}`")]
  InvalidEscape(String),
  /// A numeric literal that does not fit the record model.
  #[error("invalid number `{0}`")]
  InvalidNumber(String),
  /// The same field name appears twice on one line.
  #[error("duplicate field `{0}`")]
  DuplicateField(String),
  /// A required field is absent.
  #[error("missing field `{0}`")]
  MissingField(&'static str),
  /// A field holds a value of the wrong type.
  #[error("field `{field}` must be {expected}")]
  WrongType {
    /// Field name.
    field: &'static str,
    /// Human readable expected type.
    expected: &'static str,
  },
}

impl RecordParseError {
  pub(crate) fn new(line: usize, column: usize, kind: RecordParseErrorKind) -> Self {
    Self { line, column, kind }
  }
}
