//! # 固定状态账本（ledger）
//!
//! ## 设计思路
//!
//! 平台对“某个快捷方式是否仍被固定”的回答并不总是可靠（旧版系统甚至无法查询），
//! 因此本进程为自己创建过的每个快捷方式留一条记录：
//! - 写路径：每次注册尝试构建出描述对象后写入/覆盖
//! - 读路径：`isPinned` 在平台实时集合中找不到时回退到账本
//!
//! 账本不会自动删除条目（没有取消固定操作）。
//!
//! ## 实现思路
//!
//! 整份 `id → LedgerEntry` 映射序列化为一个 JSON 值，存放在键值存储的一个固定键下。
//! 进程内互斥锁保证单次“读-改-写”原子，不同 id 的并发写入不会互相覆盖；
//! 同一 id 的并发写入以最后完成者为准。
//! 存储内容无法解析时按空映射处理（兼容读取）。

mod store;

pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 账本条目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub label: String,
    pub long_label: String,
    /// 调用方附加数据的原始序列化文本。
    #[serde(default)]
    pub extra_data: Option<String>,
    /// 创建时间（Unix 毫秒）。
    pub created_at: i64,
}

impl LedgerEntry {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        long_label: impl Into<String>,
        extra_data: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            long_label: long_label.into(),
            extra_data,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

type LedgerMap = BTreeMap<String, LedgerEntry>;

/// 固定状态账本。
pub struct PinnedLedger {
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl PinnedLedger {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 写入或覆盖条目。
    pub fn record(&self, entry: LedgerEntry) -> Result<(), AppError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| AppError::Storage(format!("获取账本写锁失败: {}", e)))?;

        let mut map = self.load()?;
        let id = entry.id.clone();
        map.insert(id.clone(), entry);

        let serialized = serde_json::to_string(&map)
            .map_err(|e| AppError::Storage(format!("序列化账本失败: {}", e)))?;
        self.store.put(&self.key, &serialized)?;

        log::debug!("📒 账本已记录 - id: {} 条目数: {}", id, map.len());
        Ok(())
    }

    /// 账本中是否有该 id；读取失败按不存在处理。
    pub fn contains(&self, id: &str) -> bool {
        match self.load() {
            Ok(map) => map.contains_key(id),
            Err(err) => {
                log::warn!("⚠️ 读取账本失败：{}", err);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<LedgerEntry>, AppError> {
        Ok(self.load()?.remove(id))
    }

    /// 全部条目，按 id 排序。
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, AppError> {
        Ok(self.load()?.into_values().collect())
    }

    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.load()?.is_empty())
    }

    fn load(&self) -> Result<LedgerMap, AppError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(LedgerMap::new());
        };

        match serde_json::from_str::<LedgerMap>(&raw) {
            Ok(map) => Ok(map),
            Err(err) => {
                log::warn!("⚠️ 账本内容无法解析，按空账本处理：{}", err);
                Ok(LedgerMap::new())
            }
        }
    }
}
