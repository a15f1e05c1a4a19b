use crate::block::{Block, Span, list_run_end};
use crate::config::RenderConfig;

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &RenderConfig) -> String {
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");

    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i] {
            Block::Heading3 { .. } | Block::Heading2 { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_heading(&blocks[i], &mut out);
                i += 1;

                if i < blocks.len() {
                    i = emit_unit(blocks, i, config, &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => {
                i = emit_unit(blocks, i, config, &mut out);
            }
        }
    }

    out
}

fn emit_heading(block: &Block, out: &mut String) {
    let (marker, text) = match block {
        Block::Heading3 { text } => ("=", text),
        Block::Heading2 { text } => ("==", text),
        _ => return,
    };
    out.push_str(marker);
    out.push(' ');
    escape_into(text, out);
    out.push_str("\n\n");
}

/// Emit the block at `start` (or the run of list items beginning there) and
/// return the index of the next unconsumed block.
fn emit_unit(blocks: &[Block], start: usize, config: &RenderConfig, out: &mut String) -> usize {
    match &blocks[start] {
        Block::ListItem { indented_style, .. } => {
            let end = list_run_end(blocks, start, *indented_style);
            if *indented_style {
                open_pad(config, out);
                list_to_typst(&blocks[start..end], out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(&blocks[start..end], out);
                out.push('\n');
            }
            end
        }
        block => {
            emit_block(block, config, out);
            start + 1
        }
    }
}

fn emit_block(block: &Block, config: &RenderConfig, out: &mut String) {
    match block {
        Block::Heading3 { .. } | Block::Heading2 { .. } => {
            emit_heading(block, out);
        }
        Block::Paragraph { spans, indented } => {
            if *indented {
                open_pad(config, out);
                spans_to_typst(spans, out);
                out.push_str("\n]\n\n");
            } else {
                spans_to_typst(spans, out);
                out.push_str("\n\n");
            }
        }
        Block::ListItem { .. } => {
            list_to_typst(std::slice::from_ref(block), out);
            out.push('\n');
        }
        Block::Divider => {
            out.push_str("#line(length: 100%)\n\n");
        }
        Block::Spacer => {
            out.push_str(&format!("#v({})\n\n", config.spacer));
        }
    }
}

fn open_pad(config: &RenderConfig, out: &mut String) {
    out.push_str(&format!("#pad(left: {})[\n", config.indent));
}

fn list_to_typst(items: &[Block], out: &mut String) {
    for item in items {
        if let Block::ListItem { spans, .. } = item {
            out.push_str("- ");
            spans_to_typst(spans, out);
            out.push('\n');
        }
    }
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for (i, span) in spans.iter().enumerate() {
        match span {
            Span::PlainText(text) => {
                if i == 0 {
                    escape_line_start(text, out);
                } else {
                    escape_into(text, out);
                }
            }
            // `**` would open and immediately close strong emphasis
            Span::Emphasis(text) if text.is_empty() => {}
            Span::Emphasis(text) => {
                out.push('*');
                escape_into(text, out);
                out.push('*');
            }
        }
    }
}

/// Escape text that begins a line, where Typst would otherwise read a
/// heading, list, enum or term marker.
fn escape_line_start(text: &str, out: &mut String) {
    // Indentation does not stop Typst from reading a marker
    let body = text.trim_start();
    out.push_str(&text[..text.len() - body.len()]);
    let text = body;

    if text.starts_with(['=', '-', '+']) {
        out.push('\\');
        escape_into(text, out);
        return;
    }

    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && text[digits..].starts_with('.') {
        out.push_str(&text[..digits]);
        out.push('\\');
        escape_into(&text[digits..], out);
        return;
    }

    escape_into(text, out);
}

fn escape_into(text: &str, out: &mut String) {
    // Escape special Typst characters
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}
