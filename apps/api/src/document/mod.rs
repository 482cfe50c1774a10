//! Document text extraction.
//!
//! Thin boundary over the upload formats. Extraction failures never
//! propagate: a document that cannot be decoded yields empty text, which the
//! field extractor treats as "no fields found".

use tracing::warn;

/// Extracts plain text from an uploaded document based on its extension.
pub fn extract_text(filename: &str, data: &[u8]) -> String {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to extract text from PDF '{filename}': {e}");
                String::new()
            }
        },
        "txt" => String::from_utf8_lossy(data).into_owned(),
        "docx" | "png" | "jpg" | "jpeg" => {
            // OCR and DOCX decoding are external collaborators; without them
            // these uploads degrade to an empty-field record.
            warn!("No decoder for '{filename}' ({extension}) in this build");
            String::new()
        }
        _ => {
            warn!("Unsupported document type for '{filename}'");
            String::new()
        }
    }
}
