use std::fmt::Display;

use crate::eval::{evaluate, EvaluationError};

/// Text of the expression being shifted into the calculator, one byte at a
/// time. Owned by whoever drives the data port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionBuilder {
    buf: String,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte from the data port. Bytes above 0x7f are kept as
    /// the corresponding Latin-1 character so the evaluator can reject them.
    pub fn push(&mut self, c: u8) {
        self.buf.push(char::from(c));
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the end marker `=` has been received.
    pub fn is_complete(&self) -> bool {
        self.buf.ends_with('=')
    }

    /// Return the buffered text and start over with an empty buffer.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    pub fn evaluate(&self) -> Result<i64, EvaluationError> {
        evaluate(&self.buf)
    }
}

impl Extend<u8> for ExpressionBuilder {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        for c in iter {
            self.push(c);
        }
    }
}

impl From<&str> for ExpressionBuilder {
    fn from(value: &str) -> Self {
        Self {
            buf: value.to_string(),
        }
    }
}

impl Display for ExpressionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.buf)
    }
}
