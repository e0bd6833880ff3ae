//! Mailer seam between the login flow and the job queue.
//!
//! `AuthService` only needs "get this code to this address"; how the
//! message leaves the process is an infrastructure decision. Production
//! enqueues an [`EmailJob`]; development and tests log instead.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use super::email_job::EmailJob;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outbound delivery of login codes.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_login_code(&self, email: &str, code: &str, ttl_minutes: i64) -> AppResult<()>;
}

/// Mailer that pushes onto the Postgres-backed job queue.
pub struct QueueMailer {
    storage: PostgresStorage<EmailJob>,
}

impl QueueMailer {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Mailer for QueueMailer {
    async fn send_login_code(&self, email: &str, code: &str, ttl_minutes: i64) -> AppResult<()> {
        let job = EmailJob::login_code(email, code, ttl_minutes);
        // apalis storages are cheap clones over the shared pool
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email job: {}", e)))?;

        tracing::debug!(email = %email, "Login code enqueued for delivery");
        Ok(())
    }
}

/// Mailer that only logs, for local development without a job worker.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_login_code(&self, email: &str, code: &str, ttl_minutes: i64) -> AppResult<()> {
        tracing::info!(
            email = %email,
            code = %code,
            ttl_minutes,
            "Login code (log-only mailer)"
        );
        Ok(())
    }
}
