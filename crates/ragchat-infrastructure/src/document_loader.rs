//! Reads upload payloads from disk.

use std::path::Path;

use ragchat_core::conversation::Document;
use ragchat_core::error::{ChatError, Result};

/// Loads a file into a [`Document`], guessing its MIME type from the extension.
pub async fn load_document(path: &Path) -> Result<Document> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ChatError::storage(format!("Not a file path: {}", path.display())))?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ChatError::storage(format!("Failed to read {}: {}", path.display(), e)))?;

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!(
        "[DocumentLoader] Loaded {} ({} bytes, {})",
        file_name,
        bytes.len(),
        content_type
    );

    Ok(Document::new(file_name, content_type, bytes))
}
