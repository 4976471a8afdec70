// ABOUTME: Transaction management with RAII guards and retry on SQLite lock contention
// ABOUTME: Every multi-step protocol write runs inside one guarded transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction management with RAII guards and retry patterns
//!
//! - `TransactionGuard`: wrapper that rolls back unless `commit()` is reached
//! - `retry_transaction`: exponential backoff when SQLite reports the
//!   database as locked or busy
//!
//! ```text
//! retry_transaction(|| async {
//!     let mut guard = database.begin().await?;
//!     sqlx::query("INSERT INTO ...").execute(guard.executor()?).await?;
//!     sqlx::query("DELETE FROM ...").execute(guard.executor()?).await?;
//!     guard.commit().await
//! }, MAX_TRANSACTION_RETRIES).await?;
//! ```
//!
//! A retried closure re-runs from its first read, so it always observes the
//! state committed by whichever transaction won the lock.

use std::future::Future;
use std::time::Duration;

use sqlx::{Database, Sqlite, Transaction};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::errors::{AppError, AppResult};

/// Retry a transaction operation if it fails due to lock contention
///
/// Only storage failures whose cause reports a lock, busy, or timeout
/// condition are retried. Protocol errors such as `InvalidGrant` are returned
/// on the first attempt.
///
/// # Errors
///
/// Returns the last error if the operation still fails after `max_retries`
/// attempts, or the first non-retryable error
pub async fn retry_transaction<F, Fut, T>(mut f: F, max_retries: u32) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if !is_retryable_error(&e) {
                    return Err(e);
                }
                if attempts >= max_retries {
                    error!(
                        attempts = attempts,
                        max_retries = max_retries,
                        error = %e,
                        "Transaction failed after max retries"
                    );
                    return Err(e);
                }

                // 20ms, 40ms, 80ms, ...
                let backoff_ms = 10 * (1_u64 << attempts);
                warn!(
                    attempt = attempts,
                    max_retries = max_retries,
                    backoff_ms = backoff_ms,
                    error = %e,
                    "Transaction hit lock contention, retrying after backoff"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// Whether a failed transaction may succeed if run again
pub(crate) fn is_retryable_error(error: &AppError) -> bool {
    error.is_lock_contention()
}

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// If the guard is dropped before `commit()`, `SQLx` rolls the transaction
/// back when the inner `Transaction` is dropped.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from `pool.begin().await`
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed or the
    /// commit itself fails
    pub async fn commit(mut self) -> AppResult<()> {
        let Some(tx) = self.transaction.take() else {
            return Err(AppError::internal(
                "Transaction already consumed - cannot commit",
            ));
        };
        tx.commit().await.map_err(|e| {
            AppError::transaction("Transaction commit failed").with_source(e)
        })?;
        self.committed = true;
        debug!("TransactionGuard committed");
        Ok(())
    }

    /// Explicitly roll the transaction back and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed or the
    /// rollback fails
    pub async fn rollback(mut self) -> AppResult<()> {
        let Some(tx) = self.transaction.take() else {
            return Err(AppError::internal(
                "Transaction already consumed - cannot rollback",
            ));
        };
        tx.rollback().await.map_err(|e| {
            AppError::transaction("Transaction rollback failed").with_source(e)
        })?;
        debug!("TransactionGuard rolled back explicitly");
        Ok(())
    }

    /// Connection for executing queries inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was used after commit or rollback
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            debug!("TransactionGuard dropped without commit - rolling back");
        }
    }
}

/// Type alias for `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, Sqlite>;
