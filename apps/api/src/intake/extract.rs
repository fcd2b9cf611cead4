//! Plain-text extraction for the two accepted upload formats.
//!
//! Dispatch is by file extension: `.docx` goes through the zip/XML path,
//! everything else is treated as PDF. Callers decide what an extraction
//! failure means — the classifier degrades to empty text per document.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;

/// Extracts plain text from a document, choosing the decoder by extension.
pub fn extract_text(path: &Path) -> Result<String> {
    let is_docx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false);

    if is_docx {
        extract_docx(path)
    } else {
        extract_pdf(path)
    }
}

fn extract_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path)
        .with_context(|| format!("Failed to extract PDF text from {}", path.display()))
}

/// A DOCX file is a zip archive; the document body lives in
/// `word/document.xml`. Concatenating the XML text nodes (with a newline
/// per `w:p` paragraph) matches how word processors export plain text.
fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid DOCX archive", path.display()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX archive has no word/document.xml")?
        .read_to_string(&mut xml)
        .context("Failed to read word/document.xml")?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                if let Ok(chunk) = t.unescape() {
                    text.push_str(&chunk);
                }
            }
            Ok(Event::End(end)) if end.name().as_ref() == b"w:p" => {
                text.push('\n');
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow::anyhow!("Malformed document XML: {e}")),
            _ => {}
        }
    }

    Ok(text)
}

/// Test fixture support: builds a minimal but structurally valid DOCX on
/// disk, so extraction tests elsewhere in the crate exercise the real
/// zip/XML path instead of mocking it.
#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::Path;

    pub(crate) fn write_docx(path: &Path, paragraphs: &[&str]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();

        let mut body = String::new();
        for paragraph in paragraphs {
            body.push_str(&format!("<w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p>"));
        }
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
}
