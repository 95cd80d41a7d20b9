use crate::domain::{
    loan::Loan,
    value_objects::{BookId, UserId},
};
use crate::ports::loan_store::{LoanStore as LoanStoreTrait, LoanStoreError, Result};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// In-memory implementation of LoanStore
///
/// Used when no database is configured and by the integration tests.
/// The conflict check and the append happen under one mutex guard.
pub struct LoanStore {
    loans: Mutex<Vec<Loan>>,
}

impl LoanStore {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored loans, regardless of status
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Loan>> {
        // A panic while holding the lock cannot leave a half-written loan behind.
        self.loans.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn select(&self, predicate: impl Fn(&Loan) -> bool) -> Vec<Loan> {
        self.guard()
            .iter()
            .filter(|loan| predicate(loan))
            .cloned()
            .collect()
    }
}

impl Default for LoanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    async fn insert(&self, loan: &Loan) -> Result<()> {
        let mut loans = self.guard();

        let conflicting = loans.iter().any(|existing| {
            existing.loan_id == loan.loan_id
                || (existing.is_active
                    && existing.expiry_date > loan.loan_date
                    && (existing.user_id == loan.user_id || existing.book_id == loan.book_id))
        });

        if conflicting {
            return Err(LoanStoreError::Conflict);
        }

        loans.push(loan.clone());
        Ok(())
    }

    async fn find_flagged_active_by_user(&self, user_id: UserId) -> Result<Vec<Loan>> {
        Ok(self.select(|loan| loan.is_active && loan.user_id == user_id))
    }

    async fn find_flagged_active_by_book(&self, book_id: BookId) -> Result<Vec<Loan>> {
        Ok(self.select(|loan| loan.is_active && loan.book_id == book_id))
    }

    async fn find_flagged_active_by_user_and_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Vec<Loan>> {
        Ok(self.select(|loan| loan.is_active && loan.user_id == user_id && loan.book_id == book_id))
    }

    async fn find_all_flagged_active(&self) -> Result<Vec<Loan>> {
        Ok(self.select(|loan| loan.is_active))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Loan>> {
        let mut loans = self.select(|loan| loan.user_id == user_id);
        loans.sort_by(|a, b| b.loan_date.cmp(&a.loan_date));
        Ok(loans)
    }
}
