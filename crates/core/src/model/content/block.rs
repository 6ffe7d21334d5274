use serde::{Deserialize, Serialize};

//
// ─── CONTENT BLOCKS ────────────────────────────────────────────────────────────
//

/// One renderable unit of lesson content.
///
/// Blocks carry no identity of their own; their position in the sequence
/// returned by [`crate::parser::parse`] is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading { level: usize, text: String },
    Paragraph { text: String },
    /// Raw code with one trailing newline per source line.
    Code { text: String },
    List { items: Vec<String> },
}

impl ContentBlock {
    #[must_use]
    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    #[must_use]
    pub fn code(text: impl Into<String>) -> Self {
        Self::Code { text: text.into() }
    }

    #[must_use]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Flattens the block into plain text for hosts without rich rendering.
    ///
    /// List items are prefixed with a bullet and separated by newlines; code is
    /// returned verbatim.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text } | Self::Code { text } => {
                text.clone()
            }
            Self::List { items } => items
                .iter()
                .map(|item| format!("• {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::Code { .. } => "code",
            Self::List { .. } => "list",
        }
    }
}
