use serde::Serialize;

/// Inline text spans within a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Span {
    /// Text outside any `**…**` pair. A lone or unclosed `**` is kept here
    /// verbatim, so this text may still contain `**`.
    PlainText(String),
    /// Bold text, with the `**` delimiters already removed
    Emphasis(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::PlainText(text) | Span::Emphasis(text) => text,
        }
    }
}

/// One display block per line of summary text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading3 {
        text: String,
    },
    Heading2 {
        text: String,
    },
    ListItem {
        spans: Vec<Span>,
        /// Set once a divider has appeared earlier in the summary
        indented_style: bool,
    },
    Divider,
    Spacer,
    Paragraph {
        spans: Vec<Span>,
        indented: bool,
    },
}

impl Block {
    /// Whether the block sits after the first divider.
    /// Headings, dividers and spacers never carry the flag.
    pub fn is_indented(&self) -> bool {
        match self {
            Block::ListItem { indented_style, .. } => *indented_style,
            Block::Paragraph { indented, .. } => *indented,
            _ => false,
        }
    }
}

/// Index one past the last consecutive list item sharing `indented_style`
pub(crate) fn list_run_end(blocks: &[Block], start: usize, indented: bool) -> usize {
    blocks[start..]
        .iter()
        .position(|block| {
            !matches!(block, Block::ListItem { indented_style, .. } if *indented_style == indented)
        })
        .map_or(blocks.len(), |offset| start + offset)
}
