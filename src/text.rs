use crate::block::{Block, Span};
use crate::config::RenderConfig;

const RULE_WIDTH: usize = 40;

/// Render blocks as plain terminal text, one output line per block plus an
/// underline below each heading.
pub fn blocks_to_text(blocks: &[Block], config: &RenderConfig) -> String {
    let mut out = String::new();
    let indent = " ".repeat(config.text_indent);

    for block in blocks {
        match block {
            Block::Heading3 { text } => underlined(text, '=', &mut out),
            Block::Heading2 { text } => underlined(text, '-', &mut out),
            Block::ListItem {
                spans,
                indented_style,
            } => {
                if *indented_style {
                    out.push_str(&indent);
                }
                out.push_str(&config.bullet);
                out.push(' ');
                push_spans(spans, &mut out);
                out.push('\n');
            }
            Block::Paragraph { spans, indented } => {
                if *indented {
                    out.push_str(&indent);
                }
                push_spans(spans, &mut out);
                out.push('\n');
            }
            Block::Divider => {
                out.push_str(&"─".repeat(RULE_WIDTH));
                out.push('\n');
            }
            Block::Spacer => out.push('\n'),
        }
    }

    out
}

fn underlined(text: &str, underline: char, out: &mut String) {
    out.push_str(text);
    out.push('\n');
    out.extend(std::iter::repeat_n(underline, text.chars().count().max(1)));
    out.push('\n');
}

fn push_spans(spans: &[Span], out: &mut String) {
    for span in spans {
        out.push_str(span.text());
    }
}
