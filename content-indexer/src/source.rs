use crate::config::IndexerConfig;
use crate::error::{AdapterError, AdapterResult};
use content_filter::SortKey;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use utils_common::models::ContentKind;

/// 一次集合查询的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindQuery {
    /// 每页条数
    pub limit: usize,
    /// 页码，从1开始
    pub page: usize,
    /// 关联字段展开深度
    pub depth: u8,
    pub sort: SortKey,
    /// 标题或摘要包含的文本
    pub search: Option<String>,
    /// 命中任意一个即可的标签
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub slug: Option<String>,
    /// 只返回已发布的文章
    pub published_only: bool,
}

impl Default for FindQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 1,
            depth: 1,
            sort: SortKey::default(),
            search: None,
            tags: Vec::new(),
            category: None,
            slug: None,
            published_only: true,
        }
    }
}

impl FindQuery {
    /// 转换为CMS REST查询参数
    pub fn to_params(&self, kind: ContentKind) -> Vec<(String, String)> {
        let mut params = vec![
            ("depth".to_string(), self.depth.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("page".to_string(), self.page.max(1).to_string()),
            ("sort".to_string(), sort_param(kind, self.sort)),
        ];

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("where[or][0][title][like]".to_string(), search.to_string()));
            params.push((format!("where[or][1][{}][like]", excerpt_field(kind)), search.to_string()));
        }
        if !self.tags.is_empty() {
            params.push(("where[tags.tag][in]".to_string(), self.tags.join(",")));
        }
        if let Some(category) = &self.category {
            params.push((format!("where[{}][equals]", category_field(kind)), category.clone()));
        }
        if let Some(slug) = &self.slug {
            params.push(("where[slug][equals]".to_string(), slug.clone()));
        }
        if self.published_only && kind == ContentKind::Post {
            params.push(("where[_status][equals]".to_string(), "published".to_string()));
        }

        params
    }
}

/// 发布日期字段名
pub fn date_field(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Gallery => "publishedDate",
        ContentKind::Post | ContentKind::Project => "publishedAt",
    }
}

fn excerpt_field(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Post => "excerpt",
        ContentKind::Gallery | ContentKind::Project => "description",
    }
}

fn category_field(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Post => "categories.title",
        ContentKind::Gallery | ContentKind::Project => "category",
    }
}

fn sort_param(kind: ContentKind, sort: SortKey) -> String {
    match sort {
        SortKey::DateDesc => format!("-{}", date_field(kind)),
        SortKey::DateAsc => date_field(kind).to_string(),
        SortKey::TitleAsc => "title".to_string(),
        SortKey::TitleDesc => "-title".to_string(),
    }
}

/// CMS分页响应
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FindResponse {
    #[serde(default)]
    pub docs: Vec<Value>,
    #[serde(default)]
    pub total_docs: usize,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// 内容来源 - CMS查询接口
pub trait ContentSource {
    fn find(&self, kind: ContentKind, query: &FindQuery) -> AdapterResult<FindResponse>;
}

/// Payload CMS REST客户端
pub struct PayloadClient {
    http: reqwest::blocking::Client,
    config: IndexerConfig,
}

impl PayloadClient {
    pub fn new(config: IndexerConfig) -> AdapterResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("content-indexer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }
}

impl ContentSource for PayloadClient {
    fn find(&self, kind: ContentKind, query: &FindQuery) -> AdapterResult<FindResponse> {
        let url = self.config.collection_url(kind);
        debug!("请求 {} 第 {} 页，每页 {} 条", url, query.page, query.limit);

        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&query.to_params(kind))
            .send()?;

        if !resp.status().is_success() {
            return Err(AdapterError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}
