use std::sync::Arc;

use tracing::{debug, info};

use chirp_db::{AccountStore, DuplicateKey};
use chirp_types::models::Account;

use crate::error::{ServiceError, ServiceResult};
use crate::utf16_len;

pub const USERNAME_BLANK: &str = "username must not be blank";
pub const PASSWORD_TOO_SHORT: &str = "password must be at least 5 characters";
pub const USERNAME_TAKEN: &str = "username already exists";
pub const INVALID_LOGIN: &str = "invalid username and password";

const MIN_PASSWORD_LEN: usize = 5;

pub struct AccountLogic<S> {
    store: Arc<S>,
}

impl<S: AccountStore> AccountLogic<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a new account. Checks run in order and the first failure
    /// wins: blank username, short password, taken username.
    ///
    /// Usernames are compared exactly, with no trimming or case folding.
    pub fn register(&self, candidate: Account) -> ServiceResult<Account> {
        if candidate.username.is_empty() {
            debug!("Rejected registration: blank username");
            return Err(ServiceError::invalid_field(USERNAME_BLANK));
        }
        if utf16_len(&candidate.password) < MIN_PASSWORD_LEN {
            debug!("Rejected registration for {}: short password", candidate.username);
            return Err(ServiceError::invalid_field(PASSWORD_TOO_SHORT));
        }
        if self
            .store
            .find_account_by_username(&candidate.username)?
            .is_some()
        {
            debug!("Rejected registration for {}: username taken", candidate.username);
            return Err(ServiceError::conflict(USERNAME_TAKEN));
        }

        // A concurrent registration can slip in between the check and the
        // insert; the unique constraint reports it as the same conflict.
        let row = self
            .store
            .insert_account(&candidate.username, &candidate.password)
            .map_err(|e| {
                if e.is::<DuplicateKey>() {
                    ServiceError::conflict(USERNAME_TAKEN)
                } else {
                    ServiceError::Store(e)
                }
            })?;

        info!("Registered account {} ({})", row.account_id, row.username);
        Ok(row.into())
    }

    /// Return the stored account when both username and password match.
    /// Unknown usernames and wrong passwords fail with the same error.
    pub fn login(&self, credentials: &Account) -> ServiceResult<Account> {
        match self.store.find_account_by_username(&credentials.username)? {
            Some(row) if row.password == credentials.password => Ok(row.into()),
            _ => {
                debug!("Rejected login for {}", credentials.username);
                Err(ServiceError::unauthorized(INVALID_LOGIN))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chirp_db::MemoryStore;
    use chirp_db::models::AccountRow;

    fn logic() -> AccountLogic<MemoryStore> {
        AccountLogic::new(Arc::new(MemoryStore::new()))
    }

    fn assert_invalid(result: ServiceResult<Account>, expected: &str) {
        match result {
            Err(ServiceError::InvalidField(msg)) => assert_eq!(msg, expected),
            other => panic!("expected InvalidField({expected}), got {other:?}"),
        }
    }

    #[test]
    fn register_assigns_an_id() {
        let accounts = logic();
        let stored = accounts.register(Account::new("ann", "secret1")).unwrap();

        assert_eq!(stored.account_id, 1);
        assert_eq!(stored.username, "ann");
        assert_eq!(stored.password, "secret1");
    }

    #[test]
    fn register_ignores_a_client_supplied_id() {
        let accounts = logic();
        let candidate = Account {
            account_id: 99,
            ..Account::new("ann", "secret1")
        };

        assert_eq!(accounts.register(candidate).unwrap().account_id, 1);
    }

    #[test]
    fn blank_username_is_rejected_before_password() {
        assert_invalid(logic().register(Account::new("", "abc")), USERNAME_BLANK);
    }

    #[test]
    fn password_must_have_at_least_five_characters() {
        let accounts = logic();
        assert_invalid(accounts.register(Account::new("ann", "")), PASSWORD_TOO_SHORT);
        assert_invalid(accounts.register(Account::new("ann", "abcd")), PASSWORD_TOO_SHORT);
        assert!(accounts.register(Account::new("ann", "abcde")).is_ok());
    }

    #[test]
    fn password_length_counts_utf16_units() {
        let accounts = logic();
        // three characters, six UTF-16 units
        assert!(accounts.register(Account::new("ann", "😀😀😀")).is_ok());
        // four characters, eight bytes, four UTF-16 units
        assert_invalid(accounts.register(Account::new("bob", "éééé")), PASSWORD_TOO_SHORT);
    }

    #[test]
    fn duplicate_username_conflicts_regardless_of_password() {
        let accounts = logic();
        accounts.register(Account::new("ann", "secret1")).unwrap();

        let err = accounts.register(Account::new("ann", "different")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == USERNAME_TAKEN));
    }

    #[test]
    fn validation_wins_over_conflict() {
        let accounts = logic();
        accounts.register(Account::new("ann", "secret1")).unwrap();

        assert_invalid(accounts.register(Account::new("ann", "abc")), PASSWORD_TOO_SHORT);
    }

    #[test]
    fn usernames_are_not_normalized() {
        let accounts = logic();
        accounts.register(Account::new("ann", "secret1")).unwrap();

        assert!(accounts.register(Account::new("Ann", "secret1")).is_ok());
        assert!(accounts.register(Account::new(" ann", "secret1")).is_ok());
    }

    #[test]
    fn login_returns_the_stored_account() {
        let accounts = logic();
        let stored = accounts.register(Account::new("ann", "secret1")).unwrap();

        let logged_in = accounts.login(&Account::new("ann", "secret1")).unwrap();
        assert_eq!(logged_in, stored);
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let accounts = logic();
        accounts.register(Account::new("ann", "secret1")).unwrap();

        let wrong_password = accounts.login(&Account::new("ann", "wrong")).unwrap_err();
        let unknown_user = accounts.login(&Account::new("zed", "secret1")).unwrap_err();

        assert!(matches!(wrong_password, ServiceError::Unauthorized(_)));
        assert!(matches!(unknown_user, ServiceError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.to_string(), INVALID_LOGIN);
    }

    /// Hides existing accounts from lookups, as if a concurrent registration
    /// committed between the uniqueness check and the insert.
    struct RacingStore(MemoryStore);

    impl AccountStore for RacingStore {
        fn insert_account(&self, username: &str, password: &str) -> Result<AccountRow> {
            self.0.insert_account(username, password)
        }

        fn find_account_by_username(&self, _username: &str) -> Result<Option<AccountRow>> {
            Ok(None)
        }

        fn find_account_by_id(&self, _account_id: i64) -> Result<Option<AccountRow>> {
            Ok(None)
        }
    }

    #[test]
    fn lost_registration_race_is_still_a_conflict() {
        let inner = MemoryStore::new();
        inner.insert_account("ann", "secret1").unwrap();
        let accounts = AccountLogic::new(Arc::new(RacingStore(inner)));

        let err = accounts.register(Account::new("ann", "secret2")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == USERNAME_TAKEN));
    }
}
