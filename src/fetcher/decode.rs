//! Body decoding: transparent gzip decompression and charset fallback
//!
//! Sitemaps are served both plain and gzip-compressed, frequently without a
//! matching `Content-Encoding` header, so compression is detected from the
//! magic bytes. Text is decoded by trying a fixed list of charsets in order;
//! the first one that accepts the bytes wins.

use crate::config::FetcherConfig;
use crate::fetcher::Diagnostic;
use crate::FetchError;
use flate2::read::MultiGzDecoder;
use std::fmt;
use std::io::Read;

/// Leading bytes of every gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Charsets attempted when decoding a document, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// UTF-8 without a byte order mark
    Utf8,
    /// UTF-8 prefixed by `EF BB BF`; the mark is stripped
    Utf8Bom,
    /// Latin-1 text, rejecting the C1 control range `80..=9F`
    Latin1,
    /// ISO-8859-1 as a total byte-to-codepoint mapping
    Iso8859_1,
}

impl Charset {
    /// The order in which charsets are tried
    pub const FALLBACK_ORDER: [Charset; 4] = [
        Charset::Utf8,
        Charset::Utf8Bom,
        Charset::Latin1,
        Charset::Iso8859_1,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::Latin1 => "latin-1",
            Self::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Decodes `bytes` with this charset, describing the failure otherwise
    pub fn decode(&self, bytes: &[u8]) -> Result<String, String> {
        if let Some(pos) = bytes.iter().position(|&b| b == 0) {
            return Err(format!("NUL byte at offset {}", pos));
        }

        match self {
            Self::Utf8 => {
                if bytes.starts_with(&UTF8_BOM) {
                    return Err("input starts with a byte order mark".to_string());
                }
                std::str::from_utf8(bytes)
                    .map(str::to_string)
                    .map_err(|e| format!("invalid byte sequence at offset {}", e.valid_up_to()))
            }
            Self::Utf8Bom => {
                let rest = bytes
                    .strip_prefix(&UTF8_BOM)
                    .ok_or_else(|| "no byte order mark".to_string())?;
                std::str::from_utf8(rest)
                    .map(str::to_string)
                    .map_err(|e| {
                        format!(
                            "invalid byte sequence at offset {}",
                            e.valid_up_to() + UTF8_BOM.len()
                        )
                    })
            }
            Self::Latin1 => {
                if let Some(pos) = bytes.iter().position(|b| (0x80..=0x9f).contains(b)) {
                    return Err(format!("C1 control byte at offset {}", pos));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            Self::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text produced from a raw body
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub charset: Charset,
    /// Whether the body was gzip-compressed
    pub compressed: bool,
}

/// Returns true if `bytes` begins with the gzip magic number
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decompresses a gzip stream (every member), refusing to produce more than `limit` bytes
pub fn decompress_gzip(bytes: &[u8], limit: u64, source: &str) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();
    MultiGzDecoder::new(bytes)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| FetchError::Decompress {
            url: source.to_string(),
            message: e.to_string(),
        })?;

    if out.len() as u64 > limit {
        return Err(FetchError::TooLarge {
            url: source.to_string(),
            limit,
        });
    }

    Ok(out)
}

/// Decodes bytes to text by trying each charset in [`Charset::FALLBACK_ORDER`]
///
/// Failed attempts are recorded as diagnostics. A fallback success (anything
/// other than plain UTF-8) is noted as well.
pub fn decode_text(
    bytes: &[u8],
    source: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(String, Charset), FetchError> {
    for charset in Charset::FALLBACK_ORDER {
        match charset.decode(bytes) {
            Ok(text) => {
                if charset != Charset::Utf8 {
                    diagnostics.push(Diagnostic::info(format!("decoded as {}", charset)));
                }
                return Ok((text, charset));
            }
            Err(reason) => {
                // A missing BOM is the normal case, not worth reporting
                if charset == Charset::Utf8Bom && !bytes.starts_with(&UTF8_BOM) {
                    continue;
                }
                diagnostics.push(Diagnostic::warning(format!(
                    "{} decode failed: {}",
                    charset, reason
                )));
            }
        }
    }

    Err(FetchError::Decode {
        url: source.to_string(),
    })
}

/// Turns a raw body into text: gunzip if needed, then charset fallback
///
/// # Arguments
///
/// * `bytes` - The raw body as read from the network or disk
/// * `limits` - Fetcher limits (the decompressed ceiling is enforced here)
/// * `source` - URL or path, used for error attribution
/// * `diagnostics` - Receives decode notes
pub fn decode_body(
    bytes: &[u8],
    limits: &FetcherConfig,
    source: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<DecodedText, FetchError> {
    if is_gzip(bytes) {
        let inflated = decompress_gzip(bytes, limits.max_decompressed_bytes, source)?;
        diagnostics.push(Diagnostic::info(format!(
            "gzip payload decompressed ({} -> {} bytes)",
            bytes.len(),
            inflated.len()
        )));
        let (text, charset) = decode_text(&inflated, source, diagnostics)?;
        return Ok(DecodedText {
            text,
            charset,
            compressed: true,
        });
    }

    let (text, charset) = decode_text(bytes, source, diagnostics)?;
    Ok(DecodedText {
        text,
        charset,
        compressed: false,
    })
}
