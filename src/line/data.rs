//! The Line type - one separator-delimited piece of a byte stream.

use std::fmt;

/// A decoded line with its position in the original stream.
///
/// The text never ends with the line feed that terminated it, nor with a
/// carriage return that came right before that line feed.
///
/// # Example
///
/// ```
/// use linesrs::Line;
///
/// let line = Line::new("hello");
/// assert_eq!(line.as_str(), "hello");
/// assert_eq!(line.number, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    /// The decoded text.
    pub text: String,

    /// 1-based position of the line in its stream (0 if unknown).
    pub number: u64,

    /// Byte offset of the line's first byte in the stream.
    pub offset: u64,
}

impl Line {
    /// Creates a line with no position information.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            number: 0,
            offset: 0,
        }
    }

    /// Creates a line at the given position.
    pub fn at(text: impl Into<String>, number: u64, offset: u64) -> Self {
        Self {
            text: text.into(),
            number,
            offset,
        }
    }

    /// Returns the text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the line is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the line and returns the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Line> for String {
    fn from(line: Line) -> Self {
        line.text
    }
}

impl PartialEq<str> for Line {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Line {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let line = Line::new("hello");
        assert_eq!(line.len(), 5);
        assert!(!line.is_empty());
        assert_eq!(line.number, 0);
    }

    #[test]
    fn test_empty() {
        let line = Line::new("");
        assert!(line.is_empty());
    }

    #[test]
    fn test_at() {
        let line = Line::at("b", 2, 3);
        assert_eq!(line.number, 2);
        assert_eq!(line.offset, 3);
        assert_eq!(line, "b");
    }

    #[test]
    fn test_display_is_plain_text() {
        let line = Line::at("read me", 7, 100);
        assert_eq!(line.to_string(), "read me");
    }

    #[test]
    fn test_into_text() {
        let text: String = Line::new("owned").into();
        assert_eq!(text, "owned");
    }
}
