mod block;
mod config;
mod error;
mod html;
mod parser;
pub mod record;
pub mod service;
mod text;
mod typst;

pub use block::{Block, Span};
pub use config::{BACKEND_URL_ENV, Config, RenderConfig, ServiceConfig};
pub use error::{Error, Result};

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Format summary text into one display block per line.
pub fn format(summary: &str) -> Vec<Block> {
    parser::parse(summary)
}

/// Render summary text as an HTML fragment.
pub fn summary_to_html(summary: &str, config: &Config) -> String {
    html::blocks_to_html(&format(summary), &config.render)
}

/// Render summary text as Typst markup.
pub fn summary_to_typst(summary: &str, config: &Config) -> String {
    typst::blocks_to_typst(&format(summary), &config.render)
}

/// Render summary text for a terminal.
pub fn summary_to_text(summary: &str, config: &Config) -> String {
    text::blocks_to_text(&format(summary), &config.render)
}

/// Serialize the formatted blocks as pretty-printed JSON.
pub fn summary_to_json(summary: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&format(summary))?)
}

/// Convert summary text to PDF bytes.
pub fn summary_to_pdf(summary: &str, config: &Config) -> Result<Vec<u8>> {
    use typst_library::layout::PagedDocument;

    let typst_content = summary_to_typst(summary, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Typst(format!("{:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_tagged_by_type() {
        let json = summary_to_json("### Title\n**Note**: x\n---").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "type": "heading3", "text": "Title" },
                {
                    "type": "paragraph",
                    "spans": [
                        { "type": "emphasis", "text": "Note" },
                        { "type": "plain_text", "text": ": x" }
                    ],
                    "indented": false
                },
                { "type": "divider" }
            ])
        );
    }

    #[test]
    fn pdf_compiles_every_block_kind() {
        let summary = "### Title\n**Section**\n- **Point:** one\n  - nested\n\n---\n12. closing #tag";
        let pdf = summary_to_pdf(summary, &Config::default()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn renderers_accept_every_block_kind() {
        let summary = "### A\n**B**\n- c\n---\n\nd";
        let config = Config::default();
        assert_eq!(format(summary).len(), 6);
        assert!(!summary_to_html(summary, &config).is_empty());
        assert!(!summary_to_typst(summary, &config).is_empty());
        assert!(!summary_to_text(summary, &config).is_empty());
    }
}
