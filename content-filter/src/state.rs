use crate::engine;
use crate::models::{Facets, FilterResult, MonthGroup, SortKey, ViewIntent};
use crate::query::ListingQuery;
use log::debug;
use std::collections::BTreeSet;
use utils_common::models::ContentItem;

/// 列表页状态 - 持有完整条目列表和当前视图意图
///
/// 任何搜索、分类、标签、排序的变化都会在同一次调用中把页码重置为1；
/// 单独翻页不会触发重置。替换条目列表视为列表身份变化，意图整体恢复默认。
#[derive(Debug, Clone)]
pub struct ListingState {
    items: Vec<ContentItem>,
    intent: ViewIntent,
}

impl ListingState {
    pub fn new(items: Vec<ContentItem>, items_per_page: usize) -> Self {
        Self {
            items,
            intent: ViewIntent::with_page_size(items_per_page),
        }
    }

    /// 从路由查询参数恢复状态
    pub fn from_query(items: Vec<ContentItem>, items_per_page: usize, query: &ListingQuery) -> Self {
        let mut intent = ViewIntent::with_page_size(items_per_page);
        query.apply_to(&mut intent);
        Self { items, intent }
    }

    /// 用查询参数覆盖当前意图，每页条数保持不变
    pub fn apply_query(&mut self, query: &ListingQuery) {
        query.apply_to(&mut self.intent);
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn intent(&self) -> &ViewIntent {
        &self.intent
    }

    /// 替换完整列表并重置所有意图
    pub fn replace_items(&mut self, items: Vec<ContentItem>) {
        debug!("条目列表已替换，共 {} 条，视图意图恢复默认", items.len());
        self.items = items;
        self.intent = ViewIntent::with_page_size(self.intent.items_per_page);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.intent.search_query = query.into();
        self.reset_page();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.intent.category = category.filter(|c| !c.is_empty());
        self.reset_page();
    }

    pub fn set_selected_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.intent.selected_tags = tags
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.is_empty())
            .collect();
        self.reset_page();
    }

    /// 切换单个标签的选中状态
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.intent.selected_tags.remove(tag) {
            self.intent.selected_tags.insert(tag.to_string());
        }
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.intent.search_query.clear();
        self.intent.category = None;
        self.intent.selected_tags = BTreeSet::new();
        self.reset_page();
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.intent.sort_by = sort_by;
        self.reset_page();
    }

    /// 翻页，不做范围修正
    pub fn set_page(&mut self, page: usize) {
        self.intent.page = page.max(1);
    }

    /// 当前页结果
    pub fn view(&self) -> FilterResult {
        engine::run(&self.items, &self.intent)
    }

    /// 当前筛选结果的年月分组（不分页）
    pub fn month_groups(&self) -> Vec<MonthGroup> {
        engine::group_by_month(&engine::filter_and_sort(&self.items, &self.intent))
    }

    pub fn facets(&self) -> Facets {
        engine::derive_facets(&self.items)
    }

    /// 当前状态对应的查询参数，用于生成可分享的链接
    pub fn to_query(&self) -> ListingQuery {
        ListingQuery::from_intent(&self.intent)
    }

    fn reset_page(&mut self) {
        self.intent.page = 1;
    }
}
