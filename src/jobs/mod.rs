//! Background jobs
//!
//! Job payloads and handlers processed by the apalis worker, plus the
//! mailer seam the API uses to enqueue them.

pub mod email_job;
pub mod mailer;

pub use email_job::{email_job_handler, EmailJob};
pub use mailer::{LogMailer, Mailer, QueueMailer};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
