use serde::Deserialize;
use supporters::api::{AccountType, DisplayMember};

/// Account as listed by the org members and repo contributors endpoints.
#[derive(Deserialize, Debug)]
pub struct Account {
    pub login: String,
    pub id: u64,
    pub avatar_url: Option<String>,
    pub html_url: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

impl Account {
    pub fn is_bot(&self) -> bool {
        self.account_type == "Bot" || self.login.ends_with("[bot]")
    }
}

impl From<Account> for DisplayMember {
    fn from(account: Account) -> Self {
        DisplayMember {
            id: account.id.to_string(),
            name: account.login,
            image: account.avatar_url,
            profile_url: account.html_url,
            // no organization distinction on these endpoints
            account_type: AccountType::Individual,
            total_contributed: None,
        }
    }
}
