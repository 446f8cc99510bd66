//! Route matching logic.
//!
//! # Responsibilities
//! - Derive one dispatch pattern per backend from its edge plural names
//! - Decide whether a forward rule owns an inbound href
//! - Extract the (resource, rest) captures needed for forwarding
//!
//! # Design Decisions
//! - Pattern shape is `<internalHost>/(name1|name2|...)(.*)`
//! - Plural names and the host are escaped so they act as literals
//! - Unanchored: the host may appear anywhere in the href
//! - Matching has no side effects

use regex::Regex;
use thiserror::Error;

/// Error compiling a route pattern at rule construction time.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("backend exposes no edges to route on")]
    EmptyEdgeSet,

    #[error("route pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// The two captures of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The matched edge plural name.
    pub resource: String,

    /// Everything after the resource name (id, sub-path, query).
    pub rest: String,
}

/// Matches inbound hrefs against one backend's combined edge alternation.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    pattern: Regex,
}

impl RouteMatcher {
    /// Compile the pattern for one backend.
    ///
    /// `internal_host` is the `host:port` pair the gateway serves on;
    /// `plural_names` must be non-empty and is used in the given order.
    pub fn compile<'a>(
        internal_host: &str,
        plural_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, RouteError> {
        let alternation = plural_names
            .into_iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");

        if alternation.is_empty() {
            return Err(RouteError::EmptyEdgeSet);
        }

        let pattern = Regex::new(&format!(
            "{}/({})(.*)",
            regex::escape(internal_host),
            alternation
        ))?;

        Ok(Self { pattern })
    }

    /// Match an href, returning the captures or None.
    pub fn matches(&self, href: &str) -> Option<RouteMatch> {
        let captures = self.pattern.captures(href)?;
        Some(RouteMatch {
            resource: captures[1].to_string(),
            rest: captures[2].to_string(),
        })
    }

    /// The derived pattern, for logging.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
