//! Shared wire types used across API handlers.

use chrono::{DateTime, Utc};
use concours_platform_access::{Account, AccountStatus, Role};
use serde::Serialize;

/// Account representation returned by the API.
///
/// Never includes the credential hash.
#[derive(Clone, Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            email: account.email().to_string(),
            display_name: account.display_name().to_string(),
            role: account.role(),
            status: account.status(),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_response_omits_credential_hash() {
        let account = Account::register(
            "alice@example.com".to_string(),
            "$argon2id$secret-hash".to_string(),
            "Alice".to_string(),
        );
        let response = AccountResponse::from(&account);
        let json = serde_json::to_string(&response).expect("serialize");
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("alice@example.com"));
        assert!(json.contains("\"candidate\""));
    }
}
