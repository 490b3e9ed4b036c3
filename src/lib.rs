mod args;

use std::time::Duration;

use funding_client::{FundingClient, FundingClientBuilder};
use github_client::{GithubClient, GithubClientBuilder};
use log::info;
use supporters::api::{Aggregate, Result};
use supporters::cache::CacheStore;
use supporters::storage::{FileStorage, MemoryStorage, Storage};
use supporters::{AggregationService, GithubTarget, RequestDescriptor};

pub use args::Args;

pub type Service = AggregationService<GithubClient, FundingClient, Box<dyn Storage>>;

pub fn build_service(args: &Args) -> Result<Service> {
    let mut github = GithubClientBuilder::default().with_github_url(&args.github_url);
    if let Some(token) = args.github_token.clone() {
        github = github.try_with_token(token)?;
    }

    let mut funding = FundingClientBuilder::default()
        .with_graphql_url(&args.funding_url)
        .with_profile_url(&args.funding_profile_url);
    if let Some(token) = args.funding_token.clone() {
        funding = funding.try_with_token(token)?;
    }

    let storage: Box<dyn Storage> = match &args.cache_dir {
        Some(dir) => match FileStorage::new(dir) {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                info!("Falling back to in-memory cache: {}", err);
                Box::new(MemoryStorage::default())
            }
        },
        None => Box::new(MemoryStorage::default()),
    };

    Ok(AggregationService::new(
        github.build()?,
        funding.build()?,
        CacheStore::new(storage),
    ))
}

pub fn request_descriptor(args: &Args) -> RequestDescriptor {
    RequestDescriptor::new(args.collective.clone(), args.mode)
        .with_limit(args.limit)
        .with_github(GithubTarget::from_options(
            args.github_org.clone(),
            args.github_repo.clone(),
        ))
        .with_stats(args.show_stats)
        .with_ttl(Duration::from_millis(args.cache_ttl))
}

pub async fn fetch_supporters(args: Args) -> Result<Aggregate> {
    let service = build_service(&args)?;
    service.aggregate(&request_descriptor(&args)).await
}
