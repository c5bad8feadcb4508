//! PDF document loading.
//!
//! [`PdfLoader`] plugs PDF support into the indexing pipeline: each page of
//! the document becomes one [`TextUnit`], in page order, with the text layer
//! lightly normalized. Scanned pages without a text layer come back empty and
//! are skipped; no OCR is attempted.

use std::path::Path;

use lopdf::Document;

use tendex_index::{DocumentLoader, IndexError, Result, TextUnit};

/// Loader that extracts the text layer of a PDF, one unit per page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl PdfLoader {
    /// Creates a PDF loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<TextUnit>> {
        let doc = Document::load(path).map_err(|err| IndexError::document(path, err))?;

        let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let mut units = Vec::with_capacity(page_numbers.len());
        for (idx, page_number) in page_numbers.iter().enumerate() {
            let raw = doc
                .extract_text(&[*page_number])
                .unwrap_or_else(|_| String::new());
            let text = normalize_text(&raw);
            if text.is_empty() {
                tracing::debug!(page = idx + 1, "page has no extractable text, skipping");
                continue;
            }
            units.push(TextUnit::new(idx, text));
        }

        tracing::debug!(
            path = %path.display(),
            pages = page_numbers.len(),
            units = units.len(),
            "pdf loaded"
        );
        Ok(units)
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

/// Collapses the raw extraction output into trimmed, non-empty lines.
fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use std::fs;
    use tempfile::tempdir;

    fn make_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
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

        let count = i64::try_from(kids.len()).unwrap();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = PdfLoader
            .load(&dir.path().join("absent.pdf"))
            .unwrap_err();
        assert!(matches!(err, IndexError::DocumentUnreadable { .. }));
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfLoader.load(&path).unwrap_err();
        assert!(matches!(err, IndexError::DocumentUnreadable { .. }));
    }

    #[test]
    fn extracts_pages_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tender.pdf");
        fs::write(&path, make_pdf(&["First page text", "Second page text"])).unwrap();

        let units = PdfLoader.load(&path).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].order, 0);
        assert!(units[0].text.contains("First page text"));
        assert_eq!(units[1].order, 1);
        assert!(units[1].text.contains("Second page text"));
    }

    #[test]
    fn normalization_strips_blank_lines() {
        assert_eq!(normalize_text("  a  \n\n   \n b \n"), "a\nb");
    }
}
