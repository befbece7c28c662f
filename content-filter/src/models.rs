use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utils_common::models::ContentItem;

/// 卡片视图每页条数
pub const CARD_PAGE_SIZE: usize = 6;
/// 博客分页列表每页条数
pub const BLOG_PAGE_SIZE: usize = 9;

/// 排序方式
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// 最新优先
    #[default]
    DateDesc,
    /// 最早优先
    DateAsc,
    /// 标题升序
    TitleAsc,
    /// 标题降序
    TitleDesc,
}

impl SortKey {
    /// 从字符串解析，未知值返回None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "date-desc" => Some(SortKey::DateDesc),
            "date-asc" => Some(SortKey::DateAsc),
            "title-asc" => Some(SortKey::TitleAsc),
            "title-desc" => Some(SortKey::TitleDesc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
        }
    }
}

/// 视图意图 - 用户当前的搜索、筛选、排序与分页选择
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewIntent {
    /// 搜索文本，空字符串表示不做文本筛选
    pub search_query: String,
    /// 选中的分类（最多一个）
    pub category: Option<String>,
    /// 选中的标签集合，命中任意一个即可
    pub selected_tags: BTreeSet<String>,
    /// 排序方式
    pub sort_by: SortKey,
    /// 当前页码，从1开始
    pub page: usize,
    /// 每页条数
    pub items_per_page: usize,
}

impl Default for ViewIntent {
    fn default() -> Self {
        Self::with_page_size(CARD_PAGE_SIZE)
    }
}

impl ViewIntent {
    /// 使用指定每页条数创建默认意图
    pub fn with_page_size(items_per_page: usize) -> Self {
        Self {
            search_query: String::new(),
            category: None,
            selected_tags: BTreeSet::new(),
            sort_by: SortKey::default(),
            page: 1,
            items_per_page: items_per_page.max(1),
        }
    }
}

/// 单个标签的出现次数
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// 筛选侧栏使用的分面数据，始终基于完整列表计算
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// 去重并排序后的全部标签
    pub tags: Vec<String>,
    /// 去重并排序后的全部分类
    pub categories: Vec<String>,
    /// 每个标签的条目数，顺序与 `tags` 一致
    pub tag_counts: Vec<TagCount>,
}

/// 筛选结果 - 返回给展示层的当前页数据
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    /// 当前页的条目
    pub items: Vec<ContentItem>,
    /// 筛选后的总条数
    pub total_count: usize,
    /// 总页数
    pub total_pages: usize,
    /// 当前页码
    pub page: usize,
    /// 每页条数
    pub items_per_page: usize,
    /// 分面数据
    pub facets: Facets,
}

/// 按年月分组的条目
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroup {
    /// 分组键，格式 yyyy-mm
    pub key: String,
    pub year: i32,
    pub month: u32,
    pub items: Vec<ContentItem>,
}
