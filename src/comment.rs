//! Comment text normalisation.
//!
//! Doc comments are indexed with their declarations, so markers and the
//! leading `*` gutter are stripped before the text is stored.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not a comment: `{0}`")]
pub struct NotAComment(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Text without markers, gutters or surrounding whitespace.
    pub content: String,
    pub doc_comment: bool,
    pub multiline: bool,
}

impl Comment {
    pub fn parse(raw: &str) -> Result<Self, NotAComment> {
        let raw = raw.trim();
        if let Some(body) = raw.strip_prefix("//") {
            return Ok(Self {
                content: body.trim().to_string(),
                doc_comment: false,
                multiline: false,
            });
        }

        let body = raw
            .strip_prefix("/*")
            .and_then(|b| b.strip_suffix("*/"))
            .ok_or_else(|| NotAComment(raw.to_string()))?;
        let doc_comment = body.starts_with('*');

        let lines: Vec<&str> = body
            .lines()
            .map(|l| l.trim().trim_start_matches('*').trim_end_matches('*').trim())
            .filter(|l| !l.is_empty())
            .collect();

        Ok(Self {
            content: lines.join("\n"),
            doc_comment,
            multiline: body.contains('\n'),
        })
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comment: {}", self.content)?;
        if self.doc_comment {
            f.write_str(" (docstring)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment() {
        let c = Comment::parse("// comment 1").unwrap();
        assert_eq!(c.content, "comment 1");
        assert!(!c.doc_comment);
        assert!(!c.multiline);
        assert_eq!(c.to_string(), "Comment: comment 1");
    }

    #[test]
    fn doc_comment_with_gutter() {
        let c = Comment::parse("/*******************\n * Comment2 _ \n****/").unwrap();
        assert_eq!(c.content, "Comment2 _");
        assert!(c.doc_comment);
        assert!(c.multiline);
        assert_eq!(c.to_string(), "Comment: Comment2 _ (docstring)");
    }

    #[test]
    fn rejects_code() {
        assert!(Comment::parse("int x = 2;").is_err());
    }
}
