use crate::api::Mode;
use crate::request::{GithubTarget, RequestDescriptor};

/// Adapter call servicing a request. Exactly one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    OrgMembers { org: &'a str },
    RepoContributors { repo: &'a str },
    Funding { collective: &'a str },
}

impl Route<'_> {
    /// Short tag of the data source, part of the cache key.
    pub fn source(&self) -> &'static str {
        match self {
            Route::OrgMembers { .. } => "github-org",
            Route::RepoContributors { .. } => "github-repo",
            Route::Funding { .. } => "funding",
        }
    }
}

/// Code hosting platform only services `contributors`; every other mode,
/// and `contributors` without a GitHub target, goes to the funding platform.
pub fn route(request: &RequestDescriptor) -> Route<'_> {
    match (request.mode, &request.github) {
        (Mode::Contributors, Some(GithubTarget::Org(org))) => Route::OrgMembers { org },
        (Mode::Contributors, Some(GithubTarget::Repo(repo))) => Route::RepoContributors { repo },
        _ => Route::Funding {
            collective: &request.collective,
        },
    }
}
