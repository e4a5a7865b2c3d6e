//! Local sitemap files (`.xml` and `.xml.gz` uploads)

use crate::config::FetcherConfig;
use crate::fetcher::decode::decode_body;
use crate::fetcher::{Diagnostic, FetchFailure, FetchedDocument};
use crate::FetchError;
use std::path::Path;

/// Reads and decodes a sitemap file from disk under the fetcher ceilings
///
/// The extension is advisory only: compression is detected from content,
/// so a mislabelled file still loads, with a warning.
pub async fn load_file(
    path: &Path,
    limits: &FetcherConfig,
) -> Result<FetchedDocument, FetchFailure> {
    let label = path.display().to_string();
    let mut diagnostics = Vec::new();

    let io_error = |source: std::io::Error| FetchError::Io {
        url: label.clone(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
    if metadata.len() > limits.max_download_bytes {
        return Err(FetchError::TooLarge {
            url: label,
            limit: limits.max_download_bytes,
        }
        .into());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !(name.ends_with(".xml") || name.ends_with(".xml.gz") || name.ends_with(".gz")) {
        diagnostics.push(Diagnostic::warning(format!(
            "unexpected file extension for {}",
            label
        )));
    }

    let bytes = tokio::fs::read(path).await.map_err(io_error)?;

    tracing::debug!("Read {} bytes from {}", bytes.len(), label);

    let bytes_read = bytes.len() as u64;
    match decode_body(&bytes, limits, &label, &mut diagnostics) {
        Ok(decoded) => Ok(FetchedDocument {
            url: label,
            text: decoded.text,
            charset: decoded.charset,
            compressed: decoded.compressed,
            bytes_read,
            diagnostics,
        }),
        Err(error) => Err(FetchFailure::with_diagnostics(error, diagnostics)),
    }
}
