use clap::Parser;
use secrecy::SecretString;
use std::{
    fmt::{Debug, Display},
    path::PathBuf,
    str::FromStr,
};
use supporters::api::Mode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Funding platform collective slug
    #[clap(short, long, env)]
    pub collective: String,

    /// Members to list: contributors, backers, sponsors or all
    #[clap(short, long, env, default_value = "all")]
    pub mode: Mode,

    /// Maximal number of members requested
    #[clap(short, long, env, default_value_t = 100, parse(try_from_str=limit_in_range))]
    pub limit: u32,

    /// GitHub organization listed as contributors. Takes precedence over `github_repo`
    #[clap(long, env)]
    pub github_org: Option<String>,

    /// GitHub repository (`owner/name`) whose contributors are listed
    #[clap(long, env)]
    pub github_repo: Option<String>,

    /// Include collective stats (funding platform only)
    #[clap(long)]
    pub show_stats: bool,

    /// Cache time to live in milliseconds, 0 disables caching
    #[clap(long, env, default_value_t = 3_600_000)]
    pub cache_ttl: u64,

    /// Directory keeping cached results between runs
    #[clap(long, env)]
    pub cache_dir: Option<PathBuf>,

    /// GitHub OAuth access token
    #[clap(long, env)]
    pub github_token: Option<SecretString>,

    /// GitHub API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub github_url: String,

    /// Funding platform personal token
    #[clap(long, env)]
    pub funding_token: Option<SecretString>,

    /// Funding platform GraphQL API URL
    #[clap(long, env, default_value = "https://api.opencollective.com/graphql/v2")]
    pub funding_url: String,

    /// Funding platform public profiles URL
    #[clap(long, env, default_value = "https://opencollective.com")]
    pub funding_profile_url: String,
}

fn limit_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, 1000, "limit".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}
