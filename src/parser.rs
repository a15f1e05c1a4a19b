use log::debug;

use crate::block::{Block, Span};

const EMPHASIS: &str = "**";

/// Parse summary text into one block per line
pub fn parse(summary: &str) -> Vec<Block> {
    let mut state = ParseState::default();
    let blocks: Vec<Block> = summary
        .split('\n')
        .map(|line| classify_line(strip_carriage_return(line), &mut state))
        .collect();

    debug!(
        "formatted {} lines (divider seen: {})",
        blocks.len(),
        state.seen_divider
    );
    blocks
}

#[derive(Default)]
struct ParseState {
    // Flips on the first `---` line and stays on for the rest of the summary
    seen_divider: bool,
}

fn strip_carriage_return(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn classify_line(line: &str, state: &mut ParseState) -> Block {
    if let Some(rest) = line.strip_prefix("###") {
        return Block::Heading3 {
            text: rest.trim_start().to_string(),
        };
    }

    if line.starts_with(EMPHASIS) && !line.contains(':') {
        return Block::Heading2 {
            text: line.replace(EMPHASIS, ""),
        };
    }

    if let Some(rest) = line.strip_prefix("- ") {
        return Block::ListItem {
            spans: parse_spans(rest),
            indented_style: state.seen_divider,
        };
    }

    let trimmed = line.trim();
    if trimmed == "---" {
        state.seen_divider = true;
        return Block::Divider;
    }
    if trimmed.is_empty() {
        return Block::Spacer;
    }

    Block::Paragraph {
        spans: parse_spans(line),
        indented: state.seen_divider,
    }
}

/// Split a fragment into plain and emphasized runs.
///
/// Each `**` opens a run that closes at the nearest following `**`. A lone
/// or unclosed `**` is left in the surrounding plain text.
pub(crate) fn parse_spans(fragment: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = fragment;

    while let Some(open) = rest.find(EMPHASIS) {
        let after_open = &rest[open + EMPHASIS.len()..];
        let Some(close) = after_open.find(EMPHASIS) else {
            break;
        };
        push_plain(&mut spans, &rest[..open]);
        spans.push(Span::Emphasis(after_open[..close].to_string()));
        rest = &after_open[close + EMPHASIS.len()..];
    }
    push_plain(&mut spans, rest);

    spans
}

fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if !text.is_empty() {
        spans.push(Span::PlainText(text.to_string()));
    }
}
