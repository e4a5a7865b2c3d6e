//! Streaming sitemap parser
//!
//! This module turns decoded XML text into a [`SitemapDocument`]:
//! - Index documents (`<sitemapindex>`) yield their child references
//! - Leaf documents (`<urlset>`) yield URLs, last-modified dates and tags
//!
//! Matching is done on local names, so `<loc>`, `<sm:loc>` and a `<loc>` in a
//! default namespace are the same element. Individual bad entries are skipped;
//! only a document that is not well-formed XML is rejected.

use crate::sitemap::dates::{has_time_component, parse_timestamp};
use crate::sitemap::types::{IndexEntry, LeafSitemapResult, SitemapDocument, TagCategory};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// The input is not well-formed XML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MalformedDocument {
    pub message: String,
}

impl MalformedDocument {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Prefixes whose elements belong to an extension, never to the core schema
const EXTENSION_PREFIXES: &[&str] = &["image", "video", "news", "xhtml", "mobile"];

/// Parses sitemap XML text
///
/// # Arguments
///
/// * `xml` - Decoded document text
///
/// # Returns
///
/// * `Ok(SitemapDocument::Index)` - A `sitemapindex` element appears anywhere
/// * `Ok(SitemapDocument::Leaf)` - Otherwise
/// * `Err(MalformedDocument)` - The text is not well-formed XML
///
/// # Example
///
/// ```
/// use sitemap_inspector::sitemap::{parse_document, SitemapDocument};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc><![CDATA[ https://example.com/a ]]></loc></url>
///   <url><loc>https://example.com/a</loc><lastmod>2024-01-15</lastmod></url>
/// </urlset>"#;
///
/// match parse_document(xml).unwrap() {
///     SitemapDocument::Leaf(leaf) => {
///         assert_eq!(leaf.urls.len(), 1);
///         assert_eq!(leaf.modification_dates.len(), 1);
///     }
///     SitemapDocument::Index(_) => unreachable!(),
/// }
/// ```
pub fn parse_document(xml: &str) -> Result<SitemapDocument, MalformedDocument> {
    let mut reader = Reader::from_str(xml);
    let mut state = ParseState::default();
    let mut depth = 0usize;
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 && saw_element {
                    return Err(second_root(&reader));
                }
                depth += 1;
                saw_element = true;
                state.open(&e, depth);
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && saw_element {
                    return Err(second_root(&reader));
                }
                saw_element = true;
                state.open(&e, depth + 1);
                state.close(depth + 1);
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    return Err(MalformedDocument::new(format!(
                        "unmatched closing tag at position {}",
                        reader.buffer_position()
                    )));
                }
                state.close(depth);
                depth -= 1;
            }
            Ok(Event::Text(t)) => {
                if depth == 0 && !is_blank(&t) {
                    return Err(MalformedDocument::new(format!(
                        "text outside the root element at position {}",
                        reader.buffer_position()
                    )));
                }
                if state.is_capturing() {
                    match t.unescape() {
                        Ok(text) => state.push_text(&text),
                        // Unknown entities or stray '&' in a URL are kept verbatim
                        Err(_) => state.push_text(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if depth == 0 {
                    return Err(MalformedDocument::new(format!(
                        "CDATA outside the root element at position {}",
                        reader.buffer_position()
                    )));
                }
                if state.is_capturing() {
                    state.push_text(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MalformedDocument::new(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(MalformedDocument::new(format!(
            "unexpected end of document with {} unclosed element(s)",
            depth
        )));
    }

    if !saw_element {
        return Err(MalformedDocument::new("document contains no XML element"));
    }

    Ok(state.finish())
}

fn is_blank(bytes: &[u8]) -> bool {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

fn second_root(reader: &Reader<&[u8]>) -> MalformedDocument {
    MalformedDocument::new(format!(
        "second root element at position {}",
        reader.buffer_position()
    ))
}

/// Prefix and local part of an element name
struct ElementName {
    prefix: Option<String>,
    local: String,
}

impl ElementName {
    fn of(e: &BytesStart) -> Self {
        let qname = e.name();
        Self {
            prefix: qname
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
            local: String::from_utf8_lossy(qname.local_name().as_ref()).into_owned(),
        }
    }

    fn is_extension(&self) -> bool {
        self.prefix
            .as_deref()
            .map(|p| EXTENSION_PREFIXES.contains(&p))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    /// `<url>` inside a urlset
    Page,
    /// `<sitemap>` inside a sitemapindex
    ChildSitemap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    Lastmod,
}

/// An entry element currently open
struct OpenEntry {
    kind: EntryKind,
    depth: usize,
    loc: Option<String>,
    lastmod: Option<String>,
    tags: Vec<(TagCategory, String)>,
}

impl OpenEntry {
    fn new(kind: EntryKind, depth: usize) -> Self {
        Self {
            kind,
            depth,
            loc: None,
            lastmod: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Default)]
struct ParseState {
    is_index: bool,
    entry: Option<OpenEntry>,
    capture: Option<(Field, usize)>,
    text: String,
    leaf: LeafSitemapResult,
    index: Vec<IndexEntry>,
}

impl ParseState {
    fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn open(&mut self, e: &BytesStart, depth: usize) {
        let name = ElementName::of(e);

        if name.local == "sitemapindex" {
            self.is_index = true;
        }

        if self.entry.is_none() {
            let kind = match name.local.as_str() {
                "url" if !name.is_extension() => EntryKind::Page,
                "sitemap" if !name.is_extension() => EntryKind::ChildSitemap,
                _ => return,
            };
            self.entry = Some(OpenEntry::new(kind, depth));
            return;
        }
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if depth == entry.depth + 1 && !name.is_extension() {
            match name.local.as_str() {
                "loc" => {
                    self.capture = Some((Field::Loc, depth));
                    self.text.clear();
                }
                "lastmod" => {
                    self.capture = Some((Field::Lastmod, depth));
                    self.text.clear();
                }
                "changefreq" | "priority" if entry.kind == EntryKind::Page => {
                    entry.tags.push((TagCategory::Standard, name.local.clone()));
                }
                _ => {}
            }
        }

        if entry.kind == EntryKind::Page {
            if let Some(tag) = classify_extension(&name, e) {
                entry.tags.push(tag);
            }
        }
    }

    fn close(&mut self, depth: usize) {
        if let Some((field, capture_depth)) = self.capture {
            if capture_depth == depth {
                self.capture = None;
                let value = self.text.trim().to_string();
                self.text.clear();
                if let Some(entry) = self.entry.as_mut() {
                    let slot = match field {
                        Field::Loc => &mut entry.loc,
                        Field::Lastmod => &mut entry.lastmod,
                    };
                    if slot.is_none() {
                        *slot = Some(value);
                    }
                }
            }
        }

        if self.entry.as_ref().map(|e| e.depth) == Some(depth) {
            if let Some(entry) = self.entry.take() {
                self.commit(entry);
            }
        }
    }

    fn commit(&mut self, entry: OpenEntry) {
        let loc = entry.loc.filter(|loc| !loc.is_empty());

        match entry.kind {
            EntryKind::Page => {
                let Some(loc) = loc else {
                    self.leaf.skipped_entries += 1;
                    return;
                };

                self.leaf.entry_count += 1;
                self.leaf.urls.insert(loc);

                if let Some(raw) = entry.lastmod.filter(|raw| !raw.is_empty()) {
                    if has_time_component(&raw) {
                        self.leaf.has_time_of_day = true;
                    }
                    match parse_timestamp(&raw) {
                        Some(date) => self.leaf.modification_dates.push(date),
                        None => {
                            tracing::trace!("Dropping unparseable lastmod '{}'", raw);
                            self.leaf.unparsed_dates += 1;
                        }
                    }
                }

                for (category, name) in entry.tags {
                    self.leaf.extension_tags.insert(category, name);
                }
            }
            EntryKind::ChildSitemap => {
                let Some(url) = loc else {
                    tracing::debug!("Skipping sitemap index entry without <loc>");
                    return;
                };
                let lastmod = entry.lastmod.as_deref().and_then(parse_timestamp);
                self.index.push(IndexEntry { url, lastmod });
            }
        }
    }

    fn finish(self) -> SitemapDocument {
        if self.is_index {
            SitemapDocument::Index(self.index)
        } else {
            SitemapDocument::Leaf(self.leaf)
        }
    }
}

/// Maps an element inside a `<url>` entry to an extension tag, if it is one
fn classify_extension(name: &ElementName, e: &BytesStart) -> Option<(TagCategory, String)> {
    if let Some(category) = name.prefix.as_deref().and_then(TagCategory::from_prefix) {
        return Some((category, name.local.clone()));
    }

    if name.local == "link" && (name.prefix.as_deref() == Some("xhtml") || has_hreflang(e)) {
        return Some((TagCategory::Language, "alternate".to_string()));
    }

    if name.local == "mobile" {
        return Some((TagCategory::Mobile, "mobile".to_string()));
    }

    None
}

fn has_hreflang(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.local_name().as_ref() == b"hreflang")
}
