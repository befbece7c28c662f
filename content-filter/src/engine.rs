use crate::models::{Facets, FilterResult, MonthGroup, SortKey, TagCount, ViewIntent};
use chrono::{DateTime, Datelike, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use utils_common::models::ContentItem;

/// 执行完整的筛选流程，返回当前页结果
///
/// 处理顺序固定为 文本 → 分类 → 标签 → 排序 → 分页，从不修改源列表。
/// 分面数据独立于筛选，始终基于完整列表计算。
pub fn run(items: &[ContentItem], intent: &ViewIntent) -> FilterResult {
    let filtered = filter_and_sort(items, intent);
    let per_page = intent.items_per_page.max(1);
    let page = intent.page.max(1);

    FilterResult {
        items: page_slice(&filtered, page, per_page)
            .iter()
            .map(|item| (*item).clone())
            .collect(),
        total_count: filtered.len(),
        total_pages: total_pages(filtered.len(), per_page),
        page,
        items_per_page: per_page,
        facets: derive_facets(items),
    }
}

/// 筛选并排序，不分页
pub fn filter_and_sort<'a>(items: &'a [ContentItem], intent: &ViewIntent) -> Vec<&'a ContentItem> {
    let mut filtered = filter_items(items, intent);
    sort_items(&mut filtered, intent.sort_by);
    filtered
}

/// 依次应用文本、分类、标签筛选
pub fn filter_items<'a>(items: &'a [ContentItem], intent: &ViewIntent) -> Vec<&'a ContentItem> {
    let query = intent.search_query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| matches_search(item, &query))
        .filter(|item| matches_category(item, intent.category.as_deref()))
        .filter(|item| matches_tags(item, &intent.selected_tags))
        .collect()
}

/// 文本筛选：标题、摘要、分类、标签任一包含查询即命中
///
/// `query` 需已转为小写。
pub fn matches_search(item: &ContentItem, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(&item.title)
        || item.excerpt.as_deref().map_or(false, contains)
        || item.categories.iter().any(|c| contains(c.as_str()))
        || item.tags.iter().any(|t| contains(t.as_str()))
}

pub fn matches_category(item: &ContentItem, category: Option<&str>) -> bool {
    category.map_or(true, |c| item.has_category(c))
}

/// 标签筛选：选中集合为空时全部通过，否则命中任意一个即可
pub fn matches_tags(item: &ContentItem, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || item.tags.iter().any(|tag| selected.contains(tag))
}

/// 稳定排序
pub fn sort_items(items: &mut [&ContentItem], sort_by: SortKey) {
    match sort_by {
        SortKey::DateDesc => items.sort_by(|a, b| compare_dates(a.published_at, b.published_at, true)),
        SortKey::DateAsc => items.sort_by(|a, b| compare_dates(a.published_at, b.published_at, false)),
        SortKey::TitleAsc => items.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::TitleDesc => items.sort_by(|a, b| compare_titles(&b.title, &a.title)),
    }
}

/// 日期比较，没有日期的条目无论升降序都排在最后
pub fn compare_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 标题比较
///
/// 依次比较：去掉重音并忽略大小写的基本字符、重音、大小写（小写在前），
/// 与浏览器 `localeCompare` 在常见拉丁文本上的结果一致。
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let base = |s: &str| {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect::<Vec<char>>()
    };
    let accented = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<Vec<char>>();

    base(a)
        .cmp(&base(b))
        .then_with(|| accented(a).cmp(&accented(b)))
        .then_with(|| {
            for (ca, cb) in a.nfd().zip(b.nfd()) {
                if ca == cb {
                    continue;
                }
                return match (ca.is_lowercase(), cb.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => ca.cmp(&cb),
                };
            }
            a.len().cmp(&b.len())
        })
}

/// 从完整列表计算分面数据
pub fn derive_facets(items: &[ContentItem]) -> Facets {
    let mut tag_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut categories: BTreeSet<&str> = BTreeSet::new();

    for item in items {
        // 同一条目重复的标签只计一次
        let unique: HashSet<&str> = item.tags.iter().map(String::as_str).collect();
        for tag in unique {
            *tag_counts.entry(tag).or_insert(0) += 1;
        }
        categories.extend(item.categories.iter().map(String::as_str));
    }

    Facets {
        tags: tag_counts.keys().map(|t| t.to_string()).collect(),
        categories: categories.into_iter().map(str::to_string).collect(),
        tag_counts: tag_counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag: tag.to_string(), count })
            .collect(),
    }
}

/// 总页数 = ceil(count / per_page)
pub fn total_pages(count: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    (count + per_page - 1) / per_page
}

/// 取第 `page` 页的切片，页码从1开始，超出范围时返回空切片
pub fn page_slice<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let per_page = per_page.max(1);
    let start = (page.max(1) - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// 按年月分组
///
/// 输入应为已筛选并排序、尚未分页的序列。没有发布时间的条目不进入任何分组；
/// 分组按键降序，组内顺序沿用输入顺序。
pub fn group_by_month(items: &[&ContentItem]) -> Vec<MonthGroup> {
    let mut groups: BTreeMap<String, MonthGroup> = BTreeMap::new();

    for item in items {
        let Some(date) = item.published_at else {
            continue;
        };
        let key = format!("{}-{:02}", date.year(), date.month());
        groups
            .entry(key.clone())
            .or_insert_with(|| MonthGroup {
                key,
                year: date.year(),
                month: date.month(),
                items: Vec::new(),
            })
            .items
            .push((*item).clone());
    }

    groups.into_values().rev().collect()
}

/// 相关条目：与指定条目至少共享一个标签
///
/// 按共享标签数降序，其次按发布时间降序，不包含条目自身。
pub fn related_items(items: &[ContentItem], id: &str, limit: usize) -> Vec<ContentItem> {
    let Some(source) = items.iter().find(|item| item.id == id) else {
        return Vec::new();
    };
    let source_tags: HashSet<&str> = source.tags.iter().map(String::as_str).collect();

    let mut scored: Vec<(usize, &ContentItem)> = items
        .iter()
        .filter(|item| item.id != id)
        .filter_map(|item| {
            let shared: HashSet<&str> = item
                .tags
                .iter()
                .map(String::as_str)
                .filter(|tag| source_tags.contains(tag))
                .collect();
            (!shared.is_empty()).then_some((shared.len(), item))
        })
        .collect();

    scored.sort_by(|(count_a, a), (count_b, b)| {
        count_b
            .cmp(count_a)
            .then_with(|| compare_dates(a.published_at, b.published_at, true))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, item)| item.clone())
        .collect()
}
