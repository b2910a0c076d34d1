//! Credential store

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, Set, SqlErr};
use tracing::debug;

use super::SeaOrmStorage;
use crate::errors::{GeoTrackerError, Result};
use crate::storage::models::User;
use migration::entities::user;

fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password,
        created_at: model.created_at,
    }
}

impl SeaOrmStorage {
    /// 按邮箱精确查找用户
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_user))
    }

    /// 创建用户，`password_hash` 必须已经是 Argon2 哈希
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let active = user::ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            password: Set(password_hash.to_string()),
            created_at: Set(Utc::now()),
        };

        match active.insert(&self.db).await {
            Ok(model) => {
                debug!("Created user {} (id {})", model.email, model.id);
                Ok(model_to_user(model))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                GeoTrackerError::already_exists(format!("User {} already exists", email)),
            ),
            Err(e) => Err(e.into()),
        }
    }
}
