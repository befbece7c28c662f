use chrono::{TimeZone, Utc};
use content_filter::engine::{self, derive_facets, filter_and_sort, filter_items, group_by_month};
use content_filter::{ListingState, SortKey, ViewIntent, CARD_PAGE_SIZE};
use std::collections::BTreeSet;
use utils_common::models::ContentItem;

fn post(id: &str, title: &str, tags: &[&str], date: Option<(i32, u32, u32)>) -> ContentItem {
    let mut item = ContentItem::new(id, title);
    item.tags = tags.iter().map(|t| t.to_string()).collect();
    item.published_at = date.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
    item
}

fn ids(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn sample() -> Vec<ContentItem> {
    vec![
        post("a", "Trip Notes", &["photography"], Some((2024, 1, 1))),
        post("b", "Rust Tips", &["rust"], Some((2023, 6, 15))),
        post("c", "Film Stocks", &["photography", "film"], None),
        post("d", "Winter", &["travel"], Some((2025, 3, 10))),
    ]
}

#[test]
fn pipeline_is_idempotent_and_leaves_source_untouched() {
    let items = sample();
    let before = items.clone();
    let intent = ViewIntent {
        search_query: "t".to_string(),
        sort_by: SortKey::TitleDesc,
        ..Default::default()
    };

    let first = engine::run(&items, &intent);
    let second = engine::run(&items, &intent);
    assert_eq!(first, second);
    assert_eq!(items, before);
}

#[test]
fn filtering_never_grows_the_list() {
    let items = sample();
    for query in ["", "photo", "zzz", "T"] {
        for selected in [tags(&[]), tags(&["rust"]), tags(&["film", "travel"])] {
            let intent = ViewIntent {
                search_query: query.to_string(),
                selected_tags: selected,
                ..Default::default()
            };
            assert!(filter_items(&items, &intent).len() <= items.len());
        }
    }
}

#[test]
fn facets_ignore_current_filters() {
    let items = sample();
    let mut state = ListingState::new(items.clone(), CARD_PAGE_SIZE);
    state.set_search_query("rust");
    state.toggle_tag("rust");

    let view = state.view();
    assert_eq!(view.total_count, 1);
    assert_eq!(view.facets.tags, vec!["film", "photography", "rust", "travel"]);
    assert_eq!(view.facets, derive_facets(&items));
}

#[test]
fn tag_filter_is_a_union() {
    let items = vec![
        post("A", "A", &["x"], None),
        post("B", "B", &["y"], None),
        post("C", "C", &["x", "y"], None),
    ];

    let intent = ViewIntent { selected_tags: tags(&["x"]), ..Default::default() };
    let matched: Vec<&str> = filter_items(&items, &intent).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(matched, vec!["A", "C"]);

    let intent = ViewIntent { selected_tags: tags(&["x", "y"]), ..Default::default() };
    assert_eq!(filter_items(&items, &intent).len(), 3);
}

#[test]
fn search_matches_tags_when_title_does_not() {
    let items = sample();
    let intent = ViewIntent { search_query: "photo".to_string(), ..Default::default() };
    let matched: Vec<&str> = filter_items(&items, &intent).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(matched, vec!["a", "c"]);
}

#[test]
fn date_and_title_sorting() {
    let items = vec![
        post("jan", "x", &[], Some((2024, 1, 1))),
        post("jun", "y", &[], Some((2023, 6, 15))),
        post("mar", "z", &[], Some((2025, 3, 10))),
    ];
    let intent = ViewIntent { sort_by: SortKey::DateDesc, ..Default::default() };
    let sorted: Vec<&str> = filter_and_sort(&items, &intent).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(sorted, vec!["mar", "jan", "jun"]);

    let items = vec![post("1", "Banana", &[], None), post("2", "apple", &[], None), post("3", "Cherry", &[], None)];
    let intent = ViewIntent { sort_by: SortKey::TitleAsc, ..Default::default() };
    let titles: Vec<&str> = filter_and_sort(&items, &intent).iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["apple", "Banana", "Cherry"]);
}

#[test]
fn pagination_boundaries() {
    let items: Vec<ContentItem> = (0..13).map(|i| post(&format!("p{i}"), "Post", &["all"], None)).collect();
    let mut state = ListingState::new(items, 6);

    assert_eq!(state.view().total_pages, 3);
    state.set_page(3);
    assert_eq!(state.view().items.len(), 1);

    // 已渲染的页码不会因为自身失效而被改写
    state.set_page(4);
    let view = state.view();
    assert_eq!(view.page, 4);
    assert!(view.items.is_empty());

    state.set_selected_tags(["all"]);
    assert_eq!(state.view().page, 1);
    assert_eq!(ids(&state.view().items).len(), 6);
}

#[test]
fn filter_and_sort_changes_reset_to_first_page() {
    let mut state = ListingState::new(sample(), 1);

    state.set_page(3);
    state.set_search_query("t");
    assert_eq!(state.view().page, 1);

    state.set_page(2);
    state.set_category(Some("any".to_string()));
    assert_eq!(state.view().page, 1);

    state.set_page(2);
    state.set_sort(SortKey::TitleAsc);
    assert_eq!(state.view().page, 1);
}

#[test]
fn undated_items_are_listed_but_never_grouped() {
    let items = sample();
    let intent = ViewIntent { search_query: "film".to_string(), ..Default::default() };

    let flat = engine::run(&items, &intent);
    assert_eq!(ids(&flat.items), vec!["c"]);

    let groups = group_by_month(&filter_and_sort(&items, &intent));
    assert!(groups.is_empty());

    let all = group_by_month(&filter_and_sort(&items, &ViewIntent::default()));
    let keys: Vec<&str> = all.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["2025-03", "2024-01", "2023-06"]);
    assert!(all.iter().all(|g| g.items.iter().all(|i| i.id != "c")));
}
