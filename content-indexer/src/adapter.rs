use crate::config::IndexerConfig;
use crate::error::AdapterResult;
use crate::shape::{shape_document, shape_documents};
use crate::source::{ContentSource, FindQuery};
use content_filter::ListingQuery;
use log::{error, info};
use serde::Serialize;
use std::collections::HashSet;
use utils_common::models::{ContentItem, ContentKind};

/// 全量抓取结果
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub items: Vec<ContentItem>,
    /// 抓取失败时的错误信息
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 服务端分页抓取结果
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedFetch {
    pub items: Vec<ContentItem>,
    pub total_docs: usize,
    pub total_pages: usize,
    pub page: usize,
    pub error: Option<String>,
}

/// 单条查找结果，`item` 为None且没有错误表示不存在
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SlugLookup {
    pub item: Option<ContentItem>,
    pub error: Option<String>,
}

/// 内容适配器
///
/// 全量抓取 `fetch_all` 供内存筛选引擎和快照使用；服务端分页 `fetch_page`
/// 把查询参数交给CMS，每次只取一页。抓取失败返回空结果和错误信息，不自动重试。
pub struct ContentAdapter<S: ContentSource> {
    source: S,
    depth: u8,
    batch_size: usize,
    published_only: bool,
}

impl<S: ContentSource> ContentAdapter<S> {
    pub fn new(source: S, config: &IndexerConfig) -> Self {
        Self {
            source,
            depth: config.depth,
            batch_size: config.batch_size.max(1),
            published_only: config.published_only,
        }
    }

    /// 全量抓取集合
    pub fn fetch_all(&self, kind: ContentKind) -> FetchOutcome {
        match self.try_fetch_all(kind) {
            Ok(items) => {
                info!("{} 抓取完成，共 {} 条", kind.collection(), items.len());
                FetchOutcome { items, error: None }
            }
            Err(e) => {
                error!("{} 抓取失败: {}", kind.collection(), e);
                FetchOutcome { items: Vec::new(), error: Some(e.to_string()) }
            }
        }
    }

    fn try_fetch_all(&self, kind: ContentKind) -> AdapterResult<Vec<ContentItem>> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;

        loop {
            let query = FindQuery {
                limit: self.batch_size,
                page,
                depth: self.depth,
                published_only: self.published_only,
                ..Default::default()
            };
            let resp = self.source.find(kind, &query)?;

            for item in shape_documents(kind, &resp.docs) {
                // 翻页过程中内容可能变化，跨页也要去重
                if seen.insert(item.id.clone()) {
                    items.push(item);
                }
            }

            if resp.docs.is_empty() || page >= resp.total_pages {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// 服务端分页抓取
    pub fn fetch_page(&self, kind: ContentKind, listing: &ListingQuery, page_size: usize) -> PagedFetch {
        let query = FindQuery {
            limit: page_size.max(1),
            page: listing.page.max(1),
            depth: self.depth,
            sort: listing.sort.unwrap_or_default(),
            search: Some(listing.search.clone()).filter(|s| !s.trim().is_empty()),
            tags: listing.tags.clone(),
            category: listing.category.clone(),
            slug: None,
            published_only: self.published_only,
        };

        match self.source.find(kind, &query) {
            Ok(resp) => PagedFetch {
                items: shape_documents(kind, &resp.docs),
                total_docs: resp.total_docs,
                total_pages: resp.total_pages,
                page: resp.page.unwrap_or(query.page),
                error: None,
            },
            Err(e) => {
                error!("{} 第 {} 页抓取失败: {}", kind.collection(), query.page, e);
                PagedFetch {
                    page: query.page,
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        }
    }

    /// 按路径别名查找单个条目，失败时同样以错误信息返回
    pub fn find_by_slug(&self, kind: ContentKind, slug: &str) -> SlugLookup {
        let query = FindQuery {
            limit: 1,
            depth: self.depth,
            slug: Some(slug.to_string()),
            published_only: self.published_only,
            ..Default::default()
        };

        match self.source.find(kind, &query) {
            Ok(resp) => SlugLookup {
                item: resp.docs.first().and_then(|doc| shape_document(kind, doc)),
                error: None,
            },
            Err(e) => {
                error!("{} 查找 {} 失败: {}", kind.collection(), slug, e);
                SlugLookup { item: None, error: Some(e.to_string()) }
            }
        }
    }
}
