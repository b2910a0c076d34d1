//! History store
//!
//! Every read and delete is scoped by `user_id`; ids belonging to another
//! user are silently ignored.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::{HistoryEntry, NewHistoryEntry};
use migration::entities::search_history;

fn model_to_entry(model: search_history::Model) -> HistoryEntry {
    HistoryEntry {
        id: model.id,
        user_id: model.user_id,
        ip_address: model.ip_address,
        country: model.country,
        city: model.city,
        isp: model.isp,
        searched_at: model.searched_at,
    }
}

impl SeaOrmStorage {
    pub async fn insert_history(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        let active = search_history::ActiveModel {
            id: NotSet,
            user_id: Set(entry.user_id),
            ip_address: Set(entry.ip_address),
            country: Set(entry.country),
            city: Set(entry.city),
            isp: Set(entry.isp),
            searched_at: Set(Utc::now()),
        };

        let model = active.insert(&self.db).await?;
        Ok(model_to_entry(model))
    }

    /// 用户的全部历史，最新在前；同一时刻按 id 倒序
    pub async fn list_history(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        let models = search_history::Entity::find()
            .filter(search_history::Column::UserId.eq(user_id))
            .order_by_desc(search_history::Column::SearchedAt)
            .order_by_desc(search_history::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_entry).collect())
    }

    /// 删除属于该用户的指定记录，返回实际删除的行数
    pub async fn delete_history(&self, user_id: i64, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = search_history::Entity::delete_many()
            .filter(search_history::Column::Id.is_in(ids.iter().copied()))
            .filter(search_history::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
