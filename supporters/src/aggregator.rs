use log::{debug, info};

use crate::api::{Aggregate, CodeHost, FundingPlatform, FundingSnapshot, FundingStats, Money, RawAmount, Result, Stats};
use crate::cache::{CacheStore, Clock, SystemClock};
use crate::classifier::classify;
use crate::request::RequestDescriptor;
use crate::router::{route, Route};
use crate::storage::Storage;

/// Currency reported when the funding platform omits one.
const DEFAULT_CURRENCY: &str = "USD";

pub struct AggregationService<GITHUB, FUNDING, STORAGE, CLOCK = SystemClock>
where
    GITHUB: CodeHost,
    FUNDING: FundingPlatform,
    STORAGE: Storage,
    CLOCK: Clock,
{
    github: GITHUB,
    funding: FUNDING,
    cache: CacheStore<STORAGE, CLOCK>,
}

impl<GITHUB, FUNDING, STORAGE, CLOCK> AggregationService<GITHUB, FUNDING, STORAGE, CLOCK>
where
    GITHUB: CodeHost,
    FUNDING: FundingPlatform,
    STORAGE: Storage,
    CLOCK: Clock,
{
    pub fn new(github: GITHUB, funding: FUNDING, cache: CacheStore<STORAGE, CLOCK>) -> Self {
        AggregationService { github, funding, cache }
    }

    /// Returns members (and stats if requested) for `request`, from cache when
    /// a valid entry exists. Any adapter failure fails the whole request.
    pub async fn aggregate(&self, request: &RequestDescriptor) -> Result<Aggregate> {
        let key = request.cache_key();
        if let Some(aggregate) = self.cache.get::<Aggregate>(&key, request.ttl) {
            debug!("Serving {} members from cache", aggregate.members.len());
            return Ok(aggregate);
        }

        let aggregate = match route(request) {
            Route::OrgMembers { org } => {
                info!("Fetching members of organization {}", org);
                Aggregate::new(self.github.org_members(org, request.limit).await?, None)
            }
            Route::RepoContributors { repo } => {
                info!("Fetching contributors of repository {}", repo);
                Aggregate::new(self.github.repo_contributors(repo, request.limit).await?, None)
            }
            Route::Funding { collective } => {
                info!("Fetching {} of collective {}", request.mode, collective);
                let snapshot = self.funding.contributors(collective, request.limit).await?;
                self.funding_aggregate(snapshot, request)
            }
        };
        debug!("Aggregated {} members", aggregate.members.len());

        self.cache.set(&key, request.ttl, &aggregate);
        Ok(aggregate)
    }

    fn funding_aggregate(&self, snapshot: FundingSnapshot, request: &RequestDescriptor) -> Aggregate {
        let members = classify(&snapshot.contributors, request.mode, self.funding.profile_base_url());
        let stats = if request.show_stats {
            snapshot.stats.map(|stats| normalize_stats(stats, snapshot.total_count))
        } else {
            None
        };
        Aggregate::new(members, stats)
    }
}

/// Converts raw collective stats to minor units.
///
/// `valueInCents` is used when the platform returns it; otherwise the major
/// unit `value` is scaled by 100. Yearly income inherits the balance currency
/// when it has none of its own.
pub fn normalize_stats(stats: FundingStats, backers_count: u32) -> Stats {
    let balance = money(stats.balance.as_ref(), DEFAULT_CURRENCY);
    let yearly_income = money(stats.yearly_budget.as_ref(), &balance.currency);
    Stats {
        balance,
        yearly_income,
        backers_count,
    }
}

fn money(amount: Option<&RawAmount>, fallback_currency: &str) -> Money {
    let minor_units = amount
        .and_then(|amount| {
            amount
                .value_in_cents
                .or_else(|| amount.value.map(|value| (value * 100.0).round() as i64))
        })
        .unwrap_or_default();
    let currency = amount
        .and_then(|amount| amount.currency.clone())
        .unwrap_or_else(|| fallback_currency.to_string());
    Money::new(minor_units, currency)
}
