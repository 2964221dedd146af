//! PDF text extraction, one entry per page

use crate::error::{Error, Result};
use crate::types::PageContent;

/// Page-aware PDF text extractor
pub struct PdfExtractor;

impl PdfExtractor {
    /// Whether a filename looks like a PDF
    pub fn accepts(filename: &str) -> bool {
        std::path::Path::new(filename)
            .extension()
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }

    /// Extract the text of every page.
    ///
    /// Pages without text are kept (empty) so the page count matches the file.
    /// Fails when the file is not a PDF, cannot be parsed, or holds no text at all.
    pub fn extract(filename: &str, data: &[u8]) -> Result<Vec<PageContent>> {
        if !Self::accepts(filename) {
            let extension = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
            return Err(Error::UnsupportedFileType(format!(
                "{} - only PDF documents are accepted",
                if extension.is_empty() { filename } else { extension }
            )));
        }

        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(filename, format!("Failed to load PDF: {}", e)))?;

        let mut pages: Vec<PageContent> = doc
            .get_pages()
            .keys()
            .map(|&page_number| {
                let content = match doc.extract_text(&[page_number]) {
                    Ok(text) => cleanup_pdf_text(&text),
                    Err(e) => {
                        tracing::debug!("{}: no text on page {}: {}", filename, page_number, e);
                        String::new()
                    }
                };
                PageContent { page_number, content }
            })
            .collect();

        if pages.is_empty() {
            return Err(Error::extraction(filename, "PDF has no pages"));
        }

        if pages.iter().all(|p| p.content.is_empty()) {
            tracing::warn!("{}: per-page extraction found no text, trying pdf-extract", filename);
            pages = Self::extract_whole(filename, data, pages.len())?;
        }

        if pages.iter().all(|p| p.content.trim().is_empty()) {
            return Err(Error::extraction(
                filename,
                "No text content could be extracted; the PDF may be image-based or encrypted",
            ));
        }

        tracing::debug!(
            "{}: extracted {} pages, {} chars",
            filename,
            pages.len(),
            pages.iter().map(|p| p.content.chars().count()).sum::<usize>()
        );

        Ok(pages)
    }

    /// Fallback through pdf-extract. Its output separates pages with form feeds;
    /// when the split does not match the page count, the text becomes page 1.
    fn extract_whole(filename: &str, data: &[u8], page_count: usize) -> Result<Vec<PageContent>> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, format!("pdf-extract failed: {}", e)))?;

        let parts: Vec<&str> = text.split('\u{c}').collect();
        let parts = if parts.len() == page_count {
            parts
        } else {
            vec![text.as_str()]
        };

        Ok(parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| PageContent {
                page_number: i as u32 + 1,
                content: cleanup_pdf_text(part),
            })
            .collect())
    }
}

/// Normalise extracted text: typographic ligatures and spaces, NULs, blank lines
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Minimal PDFs for tests, one text line per page
#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
