//! Robots.txt parser implementation
//!
//! Directives are parsed by hand for reporting (groups, sitemaps, crawl
//! delays) while allow checks are delegated to the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Whether a path rule allows or blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Allow,
    Disallow,
}

/// A single `Allow`/`Disallow` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub kind: RuleKind,
    pub path: String,
}

/// Consecutive `User-agent` lines and the directives that follow them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsGroup {
    /// Agent tokens, lowercased
    pub user_agents: Vec<String>,
    pub rules: Vec<PathRule>,
    pub crawl_delay: Option<f64>,
}

impl RobotsGroup {
    /// Whether this group applies to the agent, ignoring the wildcard
    fn names(&self, agent: &str) -> bool {
        let agent = agent.to_lowercase();
        self.user_agents
            .iter()
            .any(|ua| ua != "*" && agent.contains(ua.as_str()))
    }

    fn is_wildcard(&self) -> bool {
        self.user_agents.iter().any(|ua| ua == "*")
    }

    /// True if the group contains `Disallow: /` and no allow rule
    pub fn blocks_everything(&self) -> bool {
        let disallows_root = self
            .rules
            .iter()
            .any(|rule| rule.kind == RuleKind::Disallow && rule.path == "/");
        let allows_something = self
            .rules
            .iter()
            .any(|rule| rule.kind == RuleKind::Allow && !rule.path.is_empty());
        disallows_root && !allows_something
    }
}

/// Parsed robots.txt data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsFile {
    /// Raw robots.txt content
    content: String,

    /// Groups in file order
    pub groups: Vec<RobotsGroup>,

    /// `Sitemap:` declarations, in file order
    pub sitemaps: Vec<String>,

    /// Lines that were neither blank, comments nor known directives
    pub unknown_lines: usize,
}

impl RobotsFile {
    /// Parses raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// A RobotsFile that can be used to check URL permissions
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_inspector::robots::RobotsFile;
    ///
    /// let robots = RobotsFile::parse("User-agent: *\nDisallow: /admin\nSitemap: https://example.com/sitemap.xml");
    /// assert!(robots.is_allowed("https://example.com/page", "*"));
    /// assert!(!robots.is_allowed("https://example.com/admin/users", "*"));
    /// assert_eq!(robots.sitemaps, vec!["https://example.com/sitemap.xml"]);
    /// ```
    pub fn parse(content: &str) -> Self {
        let mut file = Self {
            content: content.to_string(),
            ..Self::default()
        };

        let mut current: Option<RobotsGroup> = None;
        // A User-agent line after rules starts a new group
        let mut in_agent_lines = false;

        for line in content.lines() {
            let trimmed = match line.split_once('#') {
                Some((before, _)) => before.trim(),
                None => line.trim(),
            };
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                file.unknown_lines += 1;
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if !in_agent_lines {
                        if let Some(group) = current.take() {
                            file.groups.push(group);
                        }
                        current = Some(RobotsGroup::default());
                    }
                    in_agent_lines = true;
                    if let Some(group) = current.as_mut() {
                        group.user_agents.push(value.to_lowercase());
                    }
                }
                "allow" | "disallow" => {
                    in_agent_lines = false;
                    let kind = if key == "allow" {
                        RuleKind::Allow
                    } else {
                        RuleKind::Disallow
                    };
                    if let Some(group) = current.as_mut() {
                        group.rules.push(PathRule {
                            kind,
                            path: value.to_string(),
                        });
                    }
                }
                "crawl-delay" => {
                    in_agent_lines = false;
                    if let (Some(group), Ok(delay)) = (current.as_mut(), value.parse::<f64>()) {
                        group.crawl_delay = Some(delay);
                    }
                }
                // Sitemap lines are global and may appear anywhere
                "sitemap" => {
                    if !value.is_empty() {
                        file.sitemaps.push(value.to_string());
                    }
                }
                _ => file.unknown_lines += 1,
            }
        }

        if let Some(group) = current {
            file.groups.push(group);
        }

        file
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent string
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// The group that applies to an agent: a named group wins over `*`
    pub fn group_for(&self, user_agent: &str) -> Option<&RobotsGroup> {
        self.groups
            .iter()
            .find(|group| group.names(user_agent))
            .or_else(|| self.groups.iter().find(|group| group.is_wildcard()))
    }

    /// The wildcard (`*`) group, if declared
    pub fn wildcard_group(&self) -> Option<&RobotsGroup> {
        self.groups.iter().find(|group| group.is_wildcard())
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay is specified
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|group| group.names(user_agent) && group.crawl_delay.is_some())
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|group| group.is_wildcard() && group.crawl_delay.is_some())
            })
            .and_then(|group| group.crawl_delay)
    }

    /// Whether the file declares the given sitemap URL
    pub fn declares_sitemap(&self, sitemap_url: &str) -> bool {
        let wanted = sitemap_url.trim_end_matches('/');
        self.sitemaps
            .iter()
            .any(|declared| declared.trim_end_matches('/').eq_ignore_ascii_case(wanted))
    }
}
