use chrono::Utc;
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use utils_common::compression::to_compressed;
use utils_common::models::{ContentItem, ContentSnapshot};

/// 快照格式版本
pub const SNAPSHOT_VERSION: [u8; 2] = [1, 0];

/// 内容快照构建器
pub struct SnapshotBuilder {
    collection: String,
    items: Vec<ContentItem>,
    seen_ids: HashSet<String>,
}

impl SnapshotBuilder {
    /// 创建指定集合的快照构建器
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            items: Vec::new(),
            seen_ids: HashSet::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// 添加条目，重复的标识符会被丢弃，返回是否添加成功
    pub fn add_item(&mut self, item: ContentItem) -> bool {
        if !self.seen_ids.insert(item.id.clone()) {
            warn!("集合 {} 中出现重复的条目标识符 {}，已忽略", self.collection, item.id);
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ContentItem>) {
        for item in items {
            self.add_item(item);
        }
    }

    /// 构建快照
    pub fn build(&self) -> ContentSnapshot {
        ContentSnapshot {
            collection: self.collection.clone(),
            generated_at: Utc::now(),
            items: self.items.clone(),
        }
    }

    /// 保存压缩快照到文件
    pub fn save_snapshot(&self, path: &Path) -> Result<usize, std::io::Error> {
        let snapshot = self.build();
        let data = to_compressed(&snapshot, SNAPSHOT_VERSION)?;

        let mut file = File::create(path)?;
        file.write_all(&data)?;

        info!("快照已写入 {}，条目: {}，大小: {} 字节",
              path.display(), snapshot.items.len(), data.len());
        Ok(data.len())
    }

    /// 保存JSON快照到文件，供不加载wasm的页面直接使用
    pub fn save_json(&self, path: &Path) -> Result<(), std::io::Error> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.build())?;
        info!("JSON快照已写入 {}", path.display());
        Ok(())
    }
}
