use crate::models::{SortKey, ViewIntent};
use serde::Serialize;
use url::form_urlencoded;

/// 列表页的URL查询参数
///
/// 缺失或格式错误的参数静默回退为默认值：`search=""`、`tag=[]`、`page=1`。
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// 搜索文本
    pub search: String,
    /// 标签列表，已去除空值和重复值
    pub tags: Vec<String>,
    /// 页码，从1开始
    pub page: usize,
    /// 排序方式
    pub sort: Option<SortKey>,
    /// 分类
    pub category: Option<String>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            tags: Vec::new(),
            page: 1,
            sort: None,
            category: None,
        }
    }
}

impl ListingQuery {
    /// 解析查询字符串，允许带前导 `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut result = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "search" => result.search = value.trim().to_string(),
                "tag" => {
                    let tag = value.trim();
                    if !tag.is_empty() && !result.tags.iter().any(|t| t == tag) {
                        result.tags.push(tag.to_string());
                    }
                }
                "page" => result.page = parse_page(&value),
                "sort" => result.sort = SortKey::parse(&value),
                "category" => {
                    let category = value.trim();
                    result.category = (!category.is_empty()).then(|| category.to_string());
                }
                _ => {}
            }
        }

        result
    }

    /// 从视图意图生成查询参数
    pub fn from_intent(intent: &ViewIntent) -> Self {
        Self {
            search: intent.search_query.clone(),
            tags: intent.selected_tags.iter().cloned().collect(),
            page: intent.page.max(1),
            sort: (intent.sort_by != SortKey::default()).then_some(intent.sort_by),
            category: intent.category.clone(),
        }
    }

    /// 将查询参数写入视图意图，保留每页条数
    pub fn apply_to(&self, intent: &mut ViewIntent) {
        intent.search_query = self.search.clone();
        intent.selected_tags = self.tags.iter().cloned().collect();
        intent.category = self.category.clone();
        intent.sort_by = self.sort.unwrap_or_default();
        intent.page = self.page.max(1);
    }

    /// 生成查询字符串，默认值不输出
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        for tag in &self.tags {
            serializer.append_pair("tag", tag);
        }
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        if let Some(sort) = self.sort {
            serializer.append_pair("sort", sort.as_str());
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }
}

// 非数字、0或负数都视为第1页
fn parse_page(value: &str) -> usize {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
