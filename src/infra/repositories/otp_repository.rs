//! One-time code repository.
//!
//! `replace` deletes any unused code for the email and inserts the new one
//! in a single transaction, so two concurrent login attempts can never leave
//! two live codes behind.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use uuid::Uuid;

use super::entities::otp_code::{self, Entity as OtpEntity};
use crate::domain::OtpCode;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One-time code persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Atomically supersede any live code for the email with `otp`.
    async fn replace(&self, otp: OtpCode) -> AppResult<OtpCode>;

    /// Find an unused code matching email+code; used or unknown codes are
    /// both simply absent.
    async fn find_unused(&self, email: &str, code: &str) -> AppResult<Option<OtpCode>>;

    /// Consume a code. A used row never matches `find_unused` again, even
    /// while unexpired.
    async fn mark_used(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed one-time code store.
pub struct OtpStore {
    db: DatabaseConnection,
}

impl OtpStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OtpRepository for OtpStore {
    async fn replace(&self, otp: OtpCode) -> AppResult<OtpCode> {
        let stored = otp.clone();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    OtpEntity::delete_many()
                        .filter(otp_code::Column::Email.eq(otp.email.as_str()))
                        .filter(otp_code::Column::Used.eq(false))
                        .exec(txn)
                        .await?;

                    otp_code::ActiveModel {
                        id: Set(otp.id),
                        email: Set(otp.email),
                        code: Set(otp.code),
                        expires_at: Set(otp.expires_at),
                        used: Set(false),
                        created_at: Set(otp.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => AppError::Database(e),
                TransactionError::Transaction(e) => AppError::Database(e),
            })?;

        Ok(stored)
    }

    async fn find_unused(&self, email: &str, code: &str) -> AppResult<Option<OtpCode>> {
        let result = OtpEntity::find()
            .filter(otp_code::Column::Email.eq(email))
            .filter(otp_code::Column::Code.eq(code))
            .filter(otp_code::Column::Used.eq(false))
            .one(&self.db)
            .await?;
        Ok(result.map(OtpCode::from))
    }

    async fn mark_used(&self, id: Uuid) -> AppResult<()> {
        let model = OtpEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: otp_code::ActiveModel = model.into();
        active.used = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }
}
