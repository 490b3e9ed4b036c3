use std::time::Duration;

use crate::api::Mode;
use crate::router::route;

/// Default time entries are kept in the cache.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Where on the code hosting platform contributors should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubTarget {
    Org(String),
    /// Repository given as `owner/name`.
    Repo(String),
}

impl GithubTarget {
    /// Organization takes precedence over repository when both are given.
    pub fn from_options(org: Option<String>, repo: Option<String>) -> Option<GithubTarget> {
        match (org, repo) {
            (Some(org), _) => Some(GithubTarget::Org(org)),
            (None, Some(repo)) => Some(GithubTarget::Repo(repo)),
            (None, None) => None,
        }
    }

    pub fn org(&self) -> Option<&str> {
        match self {
            GithubTarget::Org(org) => Some(org),
            GithubTarget::Repo(_) => None,
        }
    }

    pub fn repo(&self) -> Option<&str> {
        match self {
            GithubTarget::Repo(repo) => Some(repo),
            GithubTarget::Org(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub collective: String,
    pub mode: Mode,
    pub limit: u32,
    pub github: Option<GithubTarget>,
    pub show_stats: bool,
    /// Zero disables caching.
    pub ttl: Duration,
}

impl RequestDescriptor {
    pub fn new<STR: Into<String>>(collective: STR, mode: Mode) -> Self {
        RequestDescriptor {
            collective: collective.into(),
            mode,
            limit: 100,
            github: None,
            show_stats: false,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_github(mut self, github: Option<GithubTarget>) -> Self {
        self.github = github;
        self
    }

    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Deterministic key over every parameter affecting the result.
    pub fn cache_key(&self) -> String {
        let github = self.github.as_ref();
        format!(
            "supporters|{}|{}|{}|{}|{}|{}|{}",
            route(self).source(),
            self.collective,
            self.mode,
            self.limit,
            github.and_then(GithubTarget::org).unwrap_or_default(),
            github.and_then(GithubTarget::repo).unwrap_or_default(),
            self.show_stats
        )
    }
}
