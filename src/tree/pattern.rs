//! Chunks of a tree pattern such as `<ID> = <expr>;`.
//!
//! A pattern string splits into literal text and `<tag>` / `<label:tag>` placeholders. Both
//! kinds validate their input when constructed.

use std::fmt;

use crate::Result;

/// Literal text between tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextChunk {
    text: String,
}

impl TextChunk {
    /// Creates a text chunk.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `text` is empty.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(illegal_argument!("text cannot be empty").into());
        }

        Ok(TextChunk { text })
    }

    /// The literal text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TextChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

/// A placeholder naming a token or rule, optionally labelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagChunk {
    tag: String,
    label: Option<String>,
}

impl TagChunk {
    /// Creates an unlabelled tag.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `tag` is empty.
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        Self::labeled(tag, None::<String>)
    }

    /// Creates a tag with an optional label; an empty label counts as none.
    ///
    /// # Errors
    /// Raises an `IllegalArgument` if `tag` is empty.
    pub fn labeled(tag: impl Into<String>, label: Option<impl Into<String>>) -> Result<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(illegal_argument!("tag cannot be empty").into());
        }

        Ok(TagChunk {
            tag,
            label: label.map(Into::into).filter(|label| !label.is_empty()),
        })
    }

    /// The token or rule name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Display for TagChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}:{}", self.tag),
            None => f.write_str(&self.tag),
        }
    }
}

/// One piece of a split pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Chunk {
    /// Literal text
    Text(TextChunk),
    /// A placeholder
    Tag(TagChunk),
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Text(text) => fmt::Display::fmt(text, f),
            Chunk::Tag(tag) => fmt::Display::fmt(tag, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::{IllegalArgument, RuntimeFailure};

    #[test]
    fn empty_text_is_illegal_argument() {
        let err = TextChunk::new("").unwrap_err();
        let raised = err.as_raised().unwrap();
        assert!(raised.is::<IllegalArgument>());
        assert!(raised.is::<RuntimeFailure>());
        assert_eq!(raised.message(), "text cannot be empty");
    }

    #[test]
    fn empty_tag_is_illegal_argument() {
        assert!(TagChunk::new("").is_err());
        assert!(TagChunk::labeled("", Some("x")).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(TextChunk::new(" = ").unwrap().to_string(), "' = '");
        assert_eq!(TagChunk::new("ID").unwrap().to_string(), "ID");
        assert_eq!(
            TagChunk::labeled("expr", Some("lhs")).unwrap().to_string(),
            "lhs:expr"
        );
        assert_eq!(TagChunk::labeled("expr", Some("")).unwrap().label(), None);

        let chunk = Chunk::Tag(TagChunk::new("ID").unwrap());
        assert_eq!(chunk.to_string(), "ID");
    }
}
