//! Account maintenance over book snapshots.

use tracing::debug;
use uuid::Uuid;

use flowcast_domain::{Account, Book};

use crate::CoreError;

/// Stateless helpers that keep account-level invariants intact, chiefly that
/// exactly one account per book is the default.
pub struct AccountService;

impl AccountService {
    pub fn add(book: &mut Book, mut account: Account) -> Result<Uuid, CoreError> {
        if book.account(account.id).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "account {} already exists",
                account.id
            )));
        }
        if book.accounts.is_empty() {
            account.is_default = true;
        } else if account.is_default {
            for existing in book.accounts.iter_mut() {
                existing.is_default = false;
            }
        }
        let id = account.id;
        debug!(account = %id, name = %account.name, "account added");
        book.accounts.push(account);
        Ok(id)
    }

    pub fn remove(book: &mut Book, id: Uuid) -> Result<Account, CoreError> {
        let position = book
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(CoreError::AccountNotFound(id))?;
        if book
            .envelopes
            .iter()
            .any(|e| e.linked_account_id == Some(id))
        {
            return Err(CoreError::InvalidOperation(
                "account still has linked envelopes".into(),
            ));
        }
        let removed = book.accounts.remove(position);
        if removed.is_default {
            if let Some(first) = book.accounts.first_mut() {
                first.is_default = true;
            }
        }
        Ok(removed)
    }

    pub fn set_default(book: &mut Book, id: Uuid) -> Result<(), CoreError> {
        if book.account(id).is_none() {
            return Err(CoreError::AccountNotFound(id));
        }
        for account in book.accounts.iter_mut() {
            account.is_default = account.id == id;
        }
        Ok(())
    }

    pub fn rename(book: &mut Book, id: Uuid, name: impl Into<String>) -> Result<(), CoreError> {
        let account = book.account_mut(id).ok_or(CoreError::AccountNotFound(id))?;
        account.name = name.into();
        Ok(())
    }
}
