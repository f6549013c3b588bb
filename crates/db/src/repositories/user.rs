//! User repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use mudra_core::StoreResult;
use mudra_core::auth::{IssuedOtp, NewUser, User, UserStore};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::users;
use crate::error::store_error;

/// Accounts stored in the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_user(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        is_verified: model.is_verified,
        otp_code: model.otp_code,
        otp_expires_at: model.otp_expires_at.map(|t| t.with_timezone(&Utc)),
        risk_profile: model.risk_profile,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(to_user))
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let now = Utc::now().into();
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            is_verified: Set(false),
            otp_code: Set(Some(user.otp.code)),
            otp_expires_at: Set(Some(user.otp.expires_at.into())),
            risk_profile: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await.map(to_user).map_err(store_error)
    }

    async fn reissue_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp: &IssuedOtp,
    ) -> StoreResult<Option<User>> {
        let rows = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::OtpCode, Expr::value(otp.code.as_str()))
            .col_expr(users::Column::OtpExpiresAt, Expr::value(otp.expires_at))
            .col_expr(users::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::IsVerified.eq(false))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().next().map(to_user))
    }

    async fn consume_otp(&self, user_id: Uuid, code: &str) -> StoreResult<Option<User>> {
        // Keyed on the stored code so two concurrent verifications cannot both
        // succeed.
        let rows = users::Entity::update_many()
            .col_expr(users::Column::IsVerified, Expr::value(true))
            .col_expr(users::Column::OtpCode, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::OtpExpiresAt,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::OtpCode.eq(code))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().next().map(to_user))
    }

    async fn set_risk_profile(&self, user_id: Uuid, risk_profile: &str) -> StoreResult<()> {
        users::Entity::update_many()
            .col_expr(users::Column::RiskProfile, Expr::value(risk_profile))
            .col_expr(users::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
