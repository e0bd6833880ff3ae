//! Email background job.
//!
//! Login codes are delivered by mail. The API only enqueues; the worker
//! process picks jobs up from the Postgres-backed queue. Without SMTP
//! configuration the worker logs the message instead of sending it.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Email body content
    pub body: String,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// The login-code message sent during the first phase of sign-in.
    pub fn login_code(to: impl Into<String>, code: &str, ttl_minutes: i64) -> Self {
        Self::new(
            to,
            "Tu código de acceso",
            format!(
                "Tu código de verificación es: {}\n\nExpira en {} minutos. \
                 Si no intentaste iniciar sesión, ignora este mensaje.",
                code, ttl_minutes
            ),
        )
    }
}

fn smtp_from() -> String {
    env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@practicas.local".to_string())
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let from = smtp_from();

    tracing::info!(to = %job.to, subject = %job.subject, "Processing email job");

    if env::var("SMTP_HOST").is_err() {
        // Development mode: log the email instead of sending
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            from,
            job.to,
            job.subject,
            job.body
        );
        return Ok(());
    }

    // No SMTP transport is wired; configured hosts also fall back to logging.
    tracing::warn!(to = %job.to, "SMTP transport not implemented, logging only");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_code_body_carries_code_and_ttl() {
        let job = EmailJob::login_code("ana@sion.com", "123456", 15);
        assert_eq!(job.to, "ana@sion.com");
        assert!(job.body.contains("123456"));
        assert!(job.body.contains("15 minutos"));
    }
}
