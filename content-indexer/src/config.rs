use crate::error::{AdapterError, AdapterResult};
use serde::Deserialize;
use std::path::Path;
use utils_common::models::ContentKind;

/// 索引器配置，可从TOML文件加载，缺失字段使用默认值
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IndexerConfig {
    /// CMS站点地址
    pub base_url: String,
    /// REST接口前缀
    pub api_prefix: String,
    /// 关联字段展开深度
    pub depth: u8,
    /// 全量抓取时每次请求的条数
    pub batch_size: usize,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 只抓取已发布的文章
    pub published_only: bool,
    /// 默认抓取的集合
    pub collections: Vec<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_prefix: "/api".to_string(),
            depth: 1,
            batch_size: 100,
            timeout_secs: 15,
            published_only: true,
            collections: vec![
                "posts".to_string(),
                "gallery".to_string(),
                "projects".to_string(),
            ],
        }
    }
}

impl IndexerConfig {
    /// 从TOML文件加载
    pub fn load(path: &Path) -> AdapterResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AdapterError::Config(format!("无法读取配置文件 {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> AdapterResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| AdapterError::Config(format!("配置文件格式错误: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> AdapterResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AdapterError::Config(format!("base_url 必须以 http:// 或 https:// 开头: {}", self.base_url)));
        }
        if self.batch_size == 0 {
            return Err(AdapterError::Config("batch_size 必须大于0".to_string()));
        }
        for name in &self.collections {
            if ContentKind::from_collection(name).is_none() {
                return Err(AdapterError::UnknownCollection(name.clone()));
            }
        }
        Ok(())
    }

    /// 集合的REST地址
    pub fn collection_url(&self, kind: ContentKind) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_matches('/'),
            kind.collection()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = IndexerConfig::from_toml_str("base_url = \"https://cms.example.com/\"").unwrap();
        assert_eq!(config.depth, 1);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.collection_url(ContentKind::Gallery), "https://cms.example.com/api/gallery");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            IndexerConfig::from_toml_str("base_url = \"cms.local\""),
            Err(AdapterError::Config(_))
        ));
        assert!(IndexerConfig::from_toml_str("batch_size = 0").is_err());
        assert!(matches!(
            IndexerConfig::from_toml_str("collections = [\"users\"]"),
            Err(AdapterError::UnknownCollection(name)) if name == "users"
        ));
        assert!(IndexerConfig::from_toml_str("depth = \"deep\"").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.toml");
        std::fs::write(&path, "depth = 2\npublished_only = false\n").unwrap();

        let config = IndexerConfig::load(&path).unwrap();
        assert_eq!(config.depth, 2);
        assert!(!config.published_only);

        assert!(IndexerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
