use std::fs;
use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported file type: .{0}. Allowed types: {allowed}", allowed = SUPPORTED_EXTENSIONS.join(", "))]
    UnsupportedFormat(String),
    #[error("failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),
    #[error("text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("DOCX parse error: {0}")]
    Docx(String),
}

/// Extract the text content of a document, dispatching on its declared extension.
pub fn extract_text(path: &Path, extension: &str) -> Result<String, ExtractError> {
    let ext = extension.trim_start_matches('.').to_lowercase();

    match ext.as_str() {
        "txt" => Ok(String::from_utf8(fs::read(path)?)?),
        "pdf" => {
            let bytes = fs::read(path)?;
            let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| ExtractError::Pdf(e.to_string()))?;
            Ok(join_pages(pages))
        }
        "docx" => {
            let bytes = fs::read(path)?;
            let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;
            let paragraphs: Vec<String> = docx
                .document
                .children
                .iter()
                .filter_map(|child| match child {
                    DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
                    _ => None,
                })
                .collect();
            Ok(paragraphs.join("\n"))
        }
        _ => Err(ExtractError::UnsupportedFormat(ext)),
    }
}

/// Join per-page PDF text, skipping pages that produced no text.
pub fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}

/// Hard cutoff at `max` characters, no word boundary awareness.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
