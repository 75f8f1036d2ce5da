//! Comment display parts: the already-parsed body of a documentation comment.

use serde::{Deserialize, Serialize};

use crate::project::EntityId;

/// Where a resolved inline link points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    /// An entity in the current project.
    Entity(EntityId),
    /// An absolute URL, from an external resolver or a bare link.
    Url(String),
}

/// An inline tag such as `{@link Foo#bar | the bar}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineTag {
    /// Symbol identifier supplied by whoever built the comment, looked up in
    /// the project's symbol table before any parsing happens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_target: Option<String>,
    /// Literal display text override that came with `known_target`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    /// Tag name including the `@`, e.g. `@link`.
    pub tag: String,
    /// Resolved target. `None` until link resolution succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LinkTarget>,
    /// Raw text between the tag name and the closing brace; after resolution, the display text.
    pub text: String,
}

impl InlineTag {
    /// An unresolved `@link` tag with the given raw text.
    pub fn link(text: impl Into<String>) -> Self {
        return Self {
            tag: "@link".to_string(),
            text: text.into(),
            ..Self::default()
        };
    }

    /// Whether this tag is one of the link tags handled by resolution.
    pub fn is_link(&self) -> bool {
        return matches!(self.tag.as_str(), "@link" | "@linkcode" | "@linkplain");
    }
}

/// One segment of a comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DisplayPart {
    /// Inline code span.
    Code {
        /// Code text including backticks.
        text: String,
    },
    /// Inline tag, possibly a link.
    InlineTag(InlineTag),
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
}

impl DisplayPart {
    /// Plain text part.
    pub fn text(text: impl Into<String>) -> Self {
        return Self::Text { text: text.into() };
    }
}

/// A block tag such as `@returns` or `@see` with its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTag {
    /// Parts following the tag name.
    #[serde(default)]
    pub content: Vec<DisplayPart>,
    /// Tag name including the `@`.
    pub tag: String,
}

/// A documentation comment attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Block tags in source order.
    #[serde(default)]
    pub block_tags: Vec<BlockTag>,
    /// Value of `@label`, used by `:LABEL` meanings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Summary section before the first block tag.
    #[serde(default)]
    pub summary: Vec<DisplayPart>,
}

impl Comment {
    /// A comment whose summary is the given parts.
    pub fn with_summary(summary: Vec<DisplayPart>) -> Self {
        return Self {
            summary,
            ..Self::default()
        };
    }
}

/// A free-form markdown body attached to an entity, such as a readme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Parsed body.
    #[serde(default)]
    pub content: Vec<DisplayPart>,
    /// Document title.
    pub name: String,
}
