use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd, html};

use crate::block::{Block, Span, list_run_end};
use crate::config::RenderConfig;

/// Convert blocks to an HTML fragment.
///
/// Blocks are lowered to pulldown-cmark events so escaping and tag layout
/// come from its HTML writer. Content after the first divider is wrapped in
/// a `div` carrying `config.indent_class`.
pub fn blocks_to_html(blocks: &[Block], config: &RenderConfig) -> String {
    let mut events = Vec::new();
    let indent_open = format!("<div class=\"{}\">\n", config.indent_class.replace('"', "&quot;"));

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];
        let indented = block.is_indented();
        if indented {
            events.push(Event::Html(CowStr::from(indent_open.clone())));
        }

        match block {
            Block::Heading3 { text } => heading_events(HeadingLevel::H3, text, &mut events),
            Block::Heading2 { text } => heading_events(HeadingLevel::H2, text, &mut events),
            Block::ListItem { .. } => {
                let end = list_run_end(blocks, i, indented);
                events.push(Event::Start(Tag::List(None)));
                for item in &blocks[i..end] {
                    if let Block::ListItem { spans, .. } = item {
                        events.push(Event::Start(Tag::Item));
                        span_events(spans, &mut events);
                        events.push(Event::End(TagEnd::Item));
                    }
                }
                events.push(Event::End(TagEnd::List(false)));
                // Skip the items consumed by this run
                i = end - 1;
            }
            Block::Paragraph { spans, .. } => {
                events.push(Event::Start(Tag::Paragraph));
                span_events(spans, &mut events);
                events.push(Event::End(TagEnd::Paragraph));
            }
            Block::Divider => events.push(Event::Rule),
            Block::Spacer => {
                events.push(Event::Html(CowStr::Borrowed("<div class=\"spacer\"></div>\n")));
            }
        }

        if indented {
            events.push(Event::Html(CowStr::Borrowed("</div>\n")));
        }
        i += 1;
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

fn heading_events<'a>(level: HeadingLevel, text: &'a str, events: &mut Vec<Event<'a>>) {
    events.push(Event::Start(Tag::Heading {
        level,
        id: None,
        classes: Vec::new(),
        attrs: Vec::new(),
    }));
    events.push(Event::Text(CowStr::Borrowed(text)));
    events.push(Event::End(TagEnd::Heading(level)));
}

fn span_events<'a>(spans: &'a [Span], events: &mut Vec<Event<'a>>) {
    for span in spans {
        match span {
            Span::PlainText(text) => events.push(Event::Text(CowStr::Borrowed(text))),
            Span::Emphasis(text) => {
                events.push(Event::Start(Tag::Strong));
                events.push(Event::Text(CowStr::Borrowed(text)));
                events.push(Event::End(TagEnd::Strong));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Config;
    use crate::summary_to_html;

    fn html(summary: &str) -> String {
        summary_to_html(summary, &Config::default())
    }

    #[test]
    fn headings() {
        assert_eq!(html("### Key Points"), "<h3>Key Points</h3>\n");
        assert_eq!(html("**Overview**"), "<h2>Overview</h2>\n");
    }

    #[test]
    fn paragraph_with_emphasis() {
        assert_eq!(
            html("**Note**: detail"),
            "<p><strong>Note</strong>: detail</p>\n"
        );
    }

    #[test]
    fn consecutive_items_share_a_list() {
        assert_eq!(
            html("- one\n- **two**"),
            "<ul>\n<li>one</li>\n<li><strong>two</strong></li>\n</ul>\n"
        );
    }

    #[test]
    fn divider_wraps_following_content() {
        let out = html("intro\n---\ntail\n- item");
        assert!(out.starts_with("<p>intro</p>\n<hr />\n"));
        assert!(out.contains("<div class=\"indented\">\n<p>tail</p>\n</div>\n"));
        assert!(out.contains("<div class=\"indented\">\n<ul>\n<li>item</li>\n</ul>\n</div>\n"));
    }

    #[test]
    fn custom_indent_class() {
        let mut config = Config::default();
        config.render.indent_class = "pl-7".to_string();
        let out = summary_to_html("---\ntext", &config);
        assert!(out.contains("<div class=\"pl-7\">"));
    }

    #[test]
    fn spacer() {
        assert_eq!(html(""), "<div class=\"spacer\"></div>\n");
    }

    #[test]
    fn escapes_text() {
        assert_eq!(html("a < b & c"), "<p>a &lt; b &amp; c</p>\n");
    }
}
