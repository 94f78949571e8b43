use chatbot_backend::Account;

/// Label and value pairs describing an account, in display order.
///
/// The API key row is masked. Print [`Account::api_key`] separately when
/// the full key is needed.
pub fn account_rows(account: &Account) -> Vec<(&'static str, String)> {
    vec![
        ("Client", account.client.name.clone()),
        ("Email", account.user.email.clone()),
        ("Role", account.user.role.clone()),
        ("Plan", account.client.plan.name().to_owned()),
        ("Status", account.client.status.clone()),
        ("API key", account.masked_api_key()),
    ]
}

#[cfg(test)]
mod tests {
    use chatbot_backend::{Client, Plan, User};

    use super::*;

    #[test]
    fn test_rows() {
        let account = Account {
            user: User {
                id: "u1".to_owned(),
                email: "budi@example.com".to_owned(),
                role: "client".to_owned(),
            },
            client: Client {
                id: "c1".to_owned(),
                name: "Toko Budi".to_owned(),
                plan: Plan::Basic,
                status: "active".to_owned(),
            },
            api_key: "sk-live-0123456789abcdefghij".to_owned(),
        };
        let rows = account_rows(&account);
        assert_eq!(rows[0], ("Client", "Toko Budi".to_owned()));
        assert_eq!(rows[3], ("Plan", "Basic".to_owned()));
        assert_eq!(rows[5], ("API key", "sk-live-0123456789ab...".to_owned()));
    }
}
