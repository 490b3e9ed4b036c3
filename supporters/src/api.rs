use async_trait::async_trait;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(&'static str),
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Unexpected response status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    #[error("Account {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Requested display category. Drives both routing and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Contributors,
    Backers,
    Sponsors,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum AccountType {
    Individual,
    Organization,
}

/// Amount passed through verbatim from the funding platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Constructor)]
pub struct Amount {
    pub value: f64,
    pub currency: Option<String>,
}

/// Source agnostic member record rendered by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMember {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub profile_url: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_contributed: Option<Amount>,
}

impl std::fmt::Display for DisplayMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}\t{}\t{}", self.name, self.account_type, self.profile_url))?;
        if let Some(amount) = &self.total_contributed {
            f.write_fmt(format_args!(
                "\t{} {}",
                amount.value,
                amount.currency.as_deref().unwrap_or_default()
            ))?;
        }
        Ok(())
    }
}

/// Money in minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Constructor)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub minor_units: i64,
    pub currency: String,
}

/// Aggregate collective metrics, only obtainable from the funding platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub balance: Money,
    pub yearly_income: Money,
    pub backers_count: u32,
}

/// Result of one aggregation: the `{members, stats}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Constructor)]
pub struct Aggregate {
    pub members: Vec<DisplayMember>,
    pub stats: Option<Stats>,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Funding platform account types. Anything we do not classify ends up as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingAccountKind {
    Individual,
    Organization,
    Collective,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FundingAccount {
    pub id: String,
    pub name: Option<String>,
    pub slug: String,
    pub kind: FundingAccountKind,
    pub image_url: Option<String>,
}

/// Contributor record as returned by the funding platform, not yet classified.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingContributor {
    pub id: String,
    pub roles: Vec<String>,
    pub is_admin: bool,
    pub is_core: bool,
    pub is_backer: bool,
    pub total_amount_contributed: Option<Amount>,
    pub account: FundingAccount,
}

/// Amount as reported by the funding platform. `value` is in major units,
/// `value_in_cents` is present when the API supports it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawAmount {
    pub value: Option<f64>,
    pub value_in_cents: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FundingStats {
    pub balance: Option<RawAmount>,
    pub yearly_budget: Option<RawAmount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FundingSnapshot {
    pub contributors: Vec<FundingContributor>,
    pub total_count: u32,
    pub stats: Option<FundingStats>,
}

/// REST based code hosting platform.
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Members of `org`, automation accounts excluded.
    async fn org_members(&self, org: &str, limit: u32) -> Result<Vec<DisplayMember>>;

    /// Contributors of `repo` given as `owner/name`, automation accounts excluded.
    async fn repo_contributors(&self, repo: &str, limit: u32) -> Result<Vec<DisplayMember>>;
}

/// GraphQL based funding platform.
#[async_trait]
pub trait FundingPlatform: Send + Sync {
    /// Base URL public profiles are served from, without trailing slash.
    fn profile_base_url(&self) -> &str;

    async fn contributors(&self, slug: &str, limit: u32) -> Result<FundingSnapshot>;
}
