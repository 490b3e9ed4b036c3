use serde::Deserialize;
use supporters::api::{
    Amount, FundingAccount, FundingAccountKind, FundingContributor, FundingSnapshot, FundingStats, RawAmount,
};

#[derive(Deserialize, Debug)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Deserialize, Debug)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct SupportersData {
    pub account: Option<Account>,
}

#[derive(Deserialize, Debug)]
pub struct Account {
    pub contributors: Contributors,
    pub stats: Option<Stats>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Contributors {
    pub total_count: u32,
    pub nodes: Vec<Contributor>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_core: bool,
    #[serde(default)]
    pub is_backer: bool,
    pub total_amount_contributed: Option<ContributedAmount>,
    pub account: ContributorAccount,
}

#[derive(Deserialize, Debug)]
pub struct ContributedAmount {
    pub value: f64,
    pub currency: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContributorAccount {
    pub id: String,
    pub name: Option<String>,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: FundingAccountKind,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub balance: Option<StatsAmount>,
    pub yearly_budget: Option<StatsAmount>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsAmount {
    pub value: Option<f64>,
    pub value_in_cents: Option<i64>,
    pub currency: Option<String>,
}

impl From<Contributor> for FundingContributor {
    fn from(contributor: Contributor) -> Self {
        FundingContributor {
            id: contributor.id,
            roles: contributor.roles,
            is_admin: contributor.is_admin,
            is_core: contributor.is_core,
            is_backer: contributor.is_backer,
            total_amount_contributed: contributor
                .total_amount_contributed
                .map(|amount| Amount::new(amount.value, amount.currency)),
            account: FundingAccount {
                id: contributor.account.id,
                name: contributor.account.name,
                slug: contributor.account.slug,
                kind: contributor.account.kind,
                image_url: contributor.account.image_url,
            },
        }
    }
}

impl From<StatsAmount> for RawAmount {
    fn from(amount: StatsAmount) -> Self {
        RawAmount {
            value: amount.value,
            value_in_cents: amount.value_in_cents,
            currency: amount.currency,
        }
    }
}

impl From<Stats> for FundingStats {
    fn from(stats: Stats) -> Self {
        FundingStats {
            balance: stats.balance.map(RawAmount::from),
            yearly_budget: stats.yearly_budget.map(RawAmount::from),
        }
    }
}

impl From<Account> for FundingSnapshot {
    fn from(account: Account) -> Self {
        FundingSnapshot {
            total_count: account.contributors.total_count,
            contributors: account
                .contributors
                .nodes
                .into_iter()
                .map(FundingContributor::from)
                .collect(),
            stats: account.stats.map(FundingStats::from),
        }
    }
}
