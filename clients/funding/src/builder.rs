use crate::FundingClient;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use supporters::api::Result;
use url::Url;

pub struct FundingClientBuilder {
    client_builder: ClientBuilder,
    graphql_url: String,
    profile_url: String,
    headers: HeaderMap,
}

impl Default for FundingClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("supporters"));
        Self {
            client_builder: ClientBuilder::default(),
            graphql_url: "https://api.opencollective.com/graphql/v2".to_string(),
            profile_url: "https://opencollective.com".to_string(),
            headers,
        }
    }
}

impl FundingClientBuilder {
    /// Personal token, sent as `Api-Key`. Public collectives need none.
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<FundingClientBuilder> {
        Ok(self.try_with_header(HeaderName::from_static("api-key"), token.expose_secret())?)
    }

    pub fn with_graphql_url<STR: AsRef<str>>(mut self, url: STR) -> FundingClientBuilder {
        self.graphql_url = url.as_ref().to_string();
        self
    }

    /// Base URL of public profiles, member slugs are appended to it.
    pub fn with_profile_url<STR: AsRef<str>>(mut self, url: STR) -> FundingClientBuilder {
        self.profile_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }

    fn try_with_header(mut self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<FundingClientBuilder> {
        let mut val = HeaderValue::from_str(val.as_ref())?;
        val.set_sensitive(true);
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<FundingClient> {
        Url::parse(&self.graphql_url).map_err(anyhow::Error::from)?;
        Url::parse(&self.profile_url).map_err(anyhow::Error::from)?;
        let client = self.client_builder.default_headers(self.headers).build()?;
        Ok(FundingClient {
            client,
            graphql_url: self.graphql_url,
            profile_url: self.profile_url,
        })
    }
}
