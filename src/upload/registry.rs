//! アップロード登録簿
//!
//! 進行中アップロードの ID と状態レコードを保持する

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// アップロードの一意識別子
///
/// 連番 `seq` で順序付けし、表示には生成時刻（ミリ秒）を添える
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId {
    seq: u64,
    timestamp_ms: u64,
}

impl UploadId {
    pub fn new(seq: u64, timestamp_ms: u64) -> Self {
        Self { seq, timestamp_ms }
    }

    pub fn seq(self) -> u64 {
        self.seq
    }

    pub fn timestamp_ms(self) -> u64 {
        self.timestamp_ms
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.timestamp_ms, self.seq)
    }
}

/// アップロード状態レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    /// プレースホルダー挿入時の位置（文字単位、置換時は参考値）
    pub position: usize,
    /// プレースホルダー文字列
    pub placeholder: String,
    pub active: bool,
    pub created_at_ms: u64,
}

/// プロセス全体で共有する連番（セッションをまたいで重複させない）
static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// アップロード登録簿
#[derive(Debug, Default)]
pub struct UploadRegistry {
    records: HashMap<UploadId, UploadRecord>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい ID を払い出す（プロセス内で単調増加）
    pub fn generate_id(&mut self) -> UploadId {
        let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed) + 1;
        UploadId::new(seq, timestamp_ms())
    }

    /// レコードを登録（同じ ID は上書き）
    pub fn add(&mut self, id: UploadId, position: usize, placeholder: String) {
        let record = UploadRecord {
            position,
            placeholder,
            active: true,
            created_at_ms: timestamp_ms(),
        };
        self.records.insert(id, record);
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadRecord> {
        self.records.get(&id)
    }

    pub fn remove(&mut self, id: UploadId) -> Option<UploadRecord> {
        self.records.remove(&id)
    }

    /// 進行中の件数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis() as u64)
        .unwrap_or_default()
}
