use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Category of a sitemap tag, as grouped in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagCategory {
    /// `<changefreq>` and `<priority>`
    Standard,
    /// Google image extension (`image:` prefix)
    Image,
    /// Google video extension (`video:` prefix)
    Video,
    /// Google news extension (`news:` prefix)
    News,
    /// Alternate-language links (`xhtml:link`)
    Language,
    /// Mobile marker (`mobile:mobile`)
    Mobile,
}

impl TagCategory {
    /// All categories in display order
    pub const ALL: [TagCategory; 6] = [
        TagCategory::Standard,
        TagCategory::Image,
        TagCategory::Video,
        TagCategory::News,
        TagCategory::Language,
        TagCategory::Mobile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Image => "image",
            Self::Video => "video",
            Self::News => "news",
            Self::Language => "language",
            Self::Mobile => "mobile",
        }
    }

    /// Maps a namespace-style element prefix to its extension category
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "news" => Some(Self::News),
            _ => None,
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag names observed per category; presence only, not counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTags {
    tags: BTreeMap<TagCategory, BTreeSet<String>>,
}

impl ExtensionTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a tag name under a category
    pub fn insert(&mut self, category: TagCategory, name: impl Into<String>) {
        self.tags.entry(category).or_default().insert(name.into());
    }

    /// Tag names seen for a category, if any
    pub fn get(&self, category: TagCategory) -> Option<&BTreeSet<String>> {
        self.tags.get(&category)
    }

    pub fn contains(&self, category: TagCategory, name: &str) -> bool {
        self.tags
            .get(&category)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates categories in display order with their sorted tag names
    pub fn iter(&self) -> impl Iterator<Item = (TagCategory, &BTreeSet<String>)> {
        self.tags.iter().map(|(category, names)| (*category, names))
    }
}

/// Everything extracted from one leaf sitemap (`<urlset>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafSitemapResult {
    /// Distinct, trimmed, non-empty location URLs
    pub urls: HashSet<String>,

    /// One timestamp per kept entry whose last-modified value parsed
    pub modification_dates: Vec<DateTime<FixedOffset>>,

    /// True if any kept entry's last-modified value carried a time of day
    pub has_time_of_day: bool,

    /// Extension tags seen across all kept entries
    pub extension_tags: ExtensionTags,

    /// Number of entries with a usable location (before deduplication)
    pub entry_count: usize,

    /// Entries dropped because their location was missing or blank
    pub skipped_entries: usize,

    /// Last-modified values that could not be parsed and were dropped
    pub unparsed_dates: usize,
}

impl LeafSitemapResult {
    /// Number of distinct URLs
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// URLs in lexical order, for stable display
    pub fn sorted_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.urls.iter().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }
}

/// One child reference inside a sitemap index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Location of the child sitemap
    pub url: String,

    /// Declared last modification of the child, when present and parseable
    pub lastmod: Option<DateTime<FixedOffset>>,
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq)]
pub enum SitemapDocument {
    /// A `<urlset>` enumerating pages
    Leaf(LeafSitemapResult),
    /// A `<sitemapindex>` enumerating other sitemaps
    Index(Vec<IndexEntry>),
}

impl SitemapDocument {
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}
