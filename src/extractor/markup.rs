use crate::error::ExtractError;
use crate::extractor::TextExtractor;
use crate::models::FileType;
use crate::utils;
use scraper::{ElementRef, Html, Node};
use std::path::Path;

/// Elements whose content is never rendered as page text
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Markup (HTML) extractor: strips tags and keeps the visible text
pub struct MarkupExtractor;

impl MarkupExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Visible text nodes of `html`, joined by single spaces
    pub fn html_to_text(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut parts = Vec::new();
        Self::collect_text(document.root_element(), &mut parts);
        utils::collapse_whitespace(&parts.join(" "))
    }

    fn collect_text<'a>(element: ElementRef<'a>, parts: &mut Vec<&'a str>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => parts.push(&**text),
                Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()) => {}
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        Self::collect_text(child_element, parts);
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for MarkupExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextExtractor for MarkupExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ExtractError::io(path, e))?;

        Ok(Self::html_to_text(&html))
    }

    fn file_type(&self) -> FileType {
        FileType::Markup
    }

    fn supports_extension(&self, ext: &str) -> bool {
        FileType::from_extension(ext) == Some(FileType::Markup)
    }
}
