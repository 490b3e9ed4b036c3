mod builder;
mod payload;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use supporters::api::{CodeHost, DisplayMember, Error, Result};

pub use builder::GithubClientBuilder;

pub struct GithubClient {
    client: Client,
    github_url: String,
}

impl GithubClient {
    async fn accounts(&self, path: String, limit: u32) -> Result<Vec<DisplayMember>> {
        let request_url = format!("{}{}", self.github_url, path);
        debug!("GET {} per_page={}", request_url, limit);
        let response = self
            .client
            .get(&request_url)
            .query(&[("per_page", limit.to_string())])
            .send()
            .await?;
        let accounts = read_response::<Vec<payload::Account>>(response).await?;
        let total = accounts.len();
        let members: Vec<DisplayMember> = accounts
            .into_iter()
            .filter(|account| !account.is_bot())
            .map(DisplayMember::from)
            .collect();
        debug!("Kept {} of {} accounts from {}", members.len(), total, request_url);
        Ok(members)
    }
}

#[async_trait]
impl CodeHost for GithubClient {
    async fn org_members(&self, org: &str, limit: u32) -> Result<Vec<DisplayMember>> {
        self.accounts(format!("/orgs/{}/members", org), limit).await
    }

    async fn repo_contributors(&self, repo: &str, limit: u32) -> Result<Vec<DisplayMember>> {
        self.accounts(format!("/repos/{}/contributors", repo), limit).await
    }
}

/// `204 No Content` (contributors of an empty repository) reads as `T::default()`.
pub(crate) async fn read_response<T: DeserializeOwned + Default>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(T::default());
    }
    Ok(response.json::<T>().await?)
}
