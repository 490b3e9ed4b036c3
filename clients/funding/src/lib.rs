mod builder;
mod payload;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;
use supporters::api::{Error, FundingPlatform, FundingSnapshot, Result};

pub use builder::FundingClientBuilder;

const SUPPORTERS_QUERY: &str = r#"
query Supporters($slug: String, $limit: Int) {
  account(slug: $slug) {
    contributors(limit: $limit) {
      totalCount
      nodes {
        id
        roles
        isAdmin
        isCore
        isBacker
        totalAmountContributed { value currency }
        account { id name slug type imageUrl }
      }
    }
    stats {
      balance { value valueInCents currency }
      yearlyBudget { value valueInCents currency }
    }
  }
}
"#;

pub struct FundingClient {
    client: Client,
    graphql_url: String,
    profile_url: String,
}

#[async_trait]
impl FundingPlatform for FundingClient {
    fn profile_base_url(&self) -> &str {
        &self.profile_url
    }

    async fn contributors(&self, slug: &str, limit: u32) -> Result<FundingSnapshot> {
        debug!("POST {} slug={} limit={}", self.graphql_url, slug, limit);
        let body = json!({
            "query": SUPPORTERS_QUERY,
            "variables": { "slug": slug, "limit": limit },
        });
        let response = self.client.post(&self.graphql_url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let response = response.json::<payload::GraphQlResponse<payload::SupportersData>>().await?;
        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|error| error.message).collect();
            return Err(Error::GraphQl(messages.join("; ")));
        }
        let account = response
            .data
            .and_then(|data| data.account)
            .ok_or_else(|| Error::NotFound(slug.to_string()))?;
        let snapshot = FundingSnapshot::from(account);
        debug!(
            "Received {} of {} contributors of {}",
            snapshot.contributors.len(),
            snapshot.total_count,
            slug
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use crate::FundingClientBuilder;
    use serde_json::json;
    use supporters::api::{Amount, Error, FundingAccountKind, FundingPlatform};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> crate::FundingClient {
        FundingClientBuilder::default()
            .with_graphql_url(format!("{}/graphql/v2", server.uri()))
            .with_profile_url("https://opencollective.com/")
            .build()
            .unwrap()
    }

    fn response_body() -> serde_json::Value {
        json!({
            "data": {
                "account": {
                    "contributors": {
                        "totalCount": 2,
                        "nodes": [
                            {
                                "id": "c1",
                                "roles": ["BACKER"],
                                "isAdmin": false,
                                "isCore": false,
                                "isBacker": true,
                                "totalAmountContributed": { "value": 25.5, "currency": "USD" },
                                "account": {
                                    "id": "a1",
                                    "name": "Alice",
                                    "slug": "alice",
                                    "type": "INDIVIDUAL",
                                    "imageUrl": "https://images/alice.png"
                                }
                            },
                            {
                                "id": "c2",
                                "roles": ["HOST"],
                                "isAdmin": false,
                                "isCore": false,
                                "isBacker": false,
                                "totalAmountContributed": null,
                                "account": {
                                    "id": "a2",
                                    "name": null,
                                    "slug": "fiscal-host",
                                    "type": "HOST_ORGANIZATION",
                                    "imageUrl": null
                                }
                            }
                        ]
                    },
                    "stats": {
                        "balance": { "value": 10.5, "valueInCents": 1050, "currency": "USD" },
                        "yearlyBudget": { "value": 120.0 }
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn sends_one_query_and_maps_records() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql/v2"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({ "variables": { "slug": "acme", "limit": 100 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let snapshot = client.contributors("acme", 100).await.unwrap();

        assert_eq!(client.profile_base_url(), "https://opencollective.com");
        assert_eq!(snapshot.total_count, 2);
        assert_eq!(snapshot.contributors.len(), 2);

        let alice = &snapshot.contributors[0];
        assert!(alice.is_backer);
        assert_eq!(alice.roles, vec!["BACKER".to_string()]);
        assert_eq!(alice.account.kind, FundingAccountKind::Individual);
        assert_eq!(alice.account.image_url.as_deref(), Some("https://images/alice.png"));
        assert_eq!(alice.total_amount_contributed, Some(Amount::new(25.5, Some("USD".to_string()))));

        let host = &snapshot.contributors[1];
        assert_eq!(host.account.kind, FundingAccountKind::Other);
        assert_eq!(host.account.name, None);
        assert_eq!(host.total_amount_contributed, None);

        let stats = snapshot.stats.unwrap();
        let balance = stats.balance.unwrap();
        assert_eq!(balance.value_in_cents, Some(1050));
        let yearly_budget = stats.yearly_budget.unwrap();
        assert_eq!(yearly_budget.value, Some(120.0));
        assert_eq!(yearly_budget.value_in_cents, None);
    }

    #[tokio::test]
    async fn graphql_errors_fail_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Too many requests" }, { "message": "Try later" }]
            })))
            .mount(&server)
            .await;

        let result = client(&server).await.contributors("acme", 10).await;

        match result {
            Err(Error::GraphQl(message)) => assert_eq!(message, "Too many requests; Try later"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_collective_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "account": null } })))
            .mount(&server)
            .await;

        let result = client(&server).await.contributors("nobody", 10).await;

        assert!(matches!(result, Err(Error::NotFound(slug)) if slug == "nobody"));
    }

    #[tokio::test]
    async fn error_status_fails_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql/v2"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).await.contributors("acme", 10).await;

        assert!(matches!(result, Err(Error::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn token_is_sent_as_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = FundingClientBuilder::default()
            .with_graphql_url(server.uri())
            .try_with_token(secrecy::SecretString::new("secret".to_string()))
            .unwrap()
            .build()
            .unwrap();

        assert!(client.contributors("acme", 10).await.is_ok());
    }
}
