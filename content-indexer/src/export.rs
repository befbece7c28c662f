use crate::adapter::ContentAdapter;
use crate::error::AdapterResult;
use crate::source::ContentSource;
use content_filter::SnapshotBuilder;
use log::error;
use std::path::{Path, PathBuf};
use utils_common::models::ContentKind;

/// 快照文件路径
pub fn snapshot_path(output_dir: &Path, kind: ContentKind, extension: &str) -> PathBuf {
    output_dir.join(format!("{}_snapshot.{}", kind.collection(), extension))
}

/// 抓取单个集合并写入快照，返回是否抓取成功
///
/// 抓取失败时不写文件，已有快照保持不变。
pub fn export_collection<S: ContentSource>(
    adapter: &ContentAdapter<S>,
    kind: ContentKind,
    output_dir: &Path,
    write_json: bool,
) -> AdapterResult<bool> {
    let outcome = adapter.fetch_all(kind);
    if let Some(e) = &outcome.error {
        error!("跳过 {}: {}", kind.collection(), e);
        return Ok(false);
    }

    let mut builder = SnapshotBuilder::new(kind.collection());
    builder.extend(outcome.items);

    builder.save_snapshot(&snapshot_path(output_dir, kind, "bin"))?;
    if write_json {
        builder.save_json(&snapshot_path(output_dir, kind, "json"))?;
    }
    Ok(true)
}
