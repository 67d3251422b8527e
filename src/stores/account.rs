use crate::filter::Where;
use crate::models::{Account, AccountType, Entity};

entity_store!(AccountStore, Account);

impl AccountStore {
    pub fn active_accounts(&self) -> Vec<&Account> {
        self.active_items()
    }

    pub fn by_user(&self, user_id: &str) -> Vec<&Account> {
        self.find(Where::new().eq("user_id", user_id))
    }

    pub fn by_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.items().iter().filter(|a| a.account_type == account_type).collect()
    }

    pub fn by_provider(&self, provider: &str) -> Vec<&Account> {
        self.items()
            .iter()
            .filter(|a| a.is_active() && a.provider.eq_ignore_ascii_case(provider))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LoggingOptions, StoreOptions};
    use crate::testing::account;

    #[test]
    fn account_helpers_filter_by_owner_and_provider() {
        let mut store = AccountStore::new(StoreOptions::for_entity().logging(LoggingOptions::disabled()));
        let mut deleted = account("a3", "u1", AccountType::Google);
        deleted.deleted_at = Some(chrono::Utc::now());
        store.set_items(vec![
            account("a1", "u1", AccountType::Google),
            account("a2", "u2", AccountType::Credentials),
            deleted,
        ]);

        assert_eq!(store.by_user("u1").len(), 2);
        assert_eq!(store.by_type(AccountType::Credentials).len(), 1);
        assert_eq!(store.by_provider("GOOGLE").len(), 1);
        assert_eq!(store.active_accounts().len(), 2);
    }
}
