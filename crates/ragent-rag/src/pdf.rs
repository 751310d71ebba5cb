//! PDF text extraction

use ragent_core::{Error, Result};

/// Extract the text content of a PDF from raw bytes
///
/// Fails when the bytes are not a readable PDF or when the document
/// contains no extractable text (scanned images, empty pages).
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| Error::Ingestion(format!("Failed to read PDF: {}", e)))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(Error::Ingestion(
            "PDF contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(extract_pdf_text(b"definitely not a pdf").is_err());
    }
}
