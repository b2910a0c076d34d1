//! History service: per-user record of explicit-IP lookups

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{GeoTrackerError, Result};
use crate::services::geoip::GeoResult;
use crate::storage::{HistoryEntry, NewHistoryEntry, SeaOrmStorage};

pub struct HistoryService {
    storage: Arc<SeaOrmStorage>,
}

impl HistoryService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 记录一次成功的显式地址查询
    ///
    /// 写入失败只记日志，不影响已经拿到的查询结果。
    pub async fn record(&self, user_id: i64, ip: &str, geo: &GeoResult) -> Option<HistoryEntry> {
        let entry = NewHistoryEntry {
            user_id,
            ip_address: ip.to_string(),
            country: geo.country.clone(),
            city: geo.city.clone(),
            isp: geo.isp.clone(),
        };

        match self.storage.insert_history(entry).await {
            Ok(saved) => {
                debug!("Recorded lookup {} for user {}", ip, user_id);
                Some(saved)
            }
            Err(e) => {
                warn!("Failed to record lookup {} for user {}: {}", ip, user_id, e);
                None
            }
        }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        self.storage.list_history(user_id).await
    }

    /// 删除该用户名下的指定记录；不属于该用户的 id 被忽略
    pub async fn delete(&self, user_id: i64, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Err(GeoTrackerError::invalid_request());
        }

        let removed = self.storage.delete_history(user_id, ids).await?;
        debug!(
            "Deleted {} of {} requested history entries for user {}",
            removed,
            ids.len(),
            user_id
        );
        Ok(removed)
    }
}
