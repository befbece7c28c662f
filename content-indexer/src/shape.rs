use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde_json::Value;
use std::collections::HashSet;
use utils_common::models::{ContentItem, ContentKind, MediaRef};

/// 批量转换，跳过无效文档和重复ID
pub fn shape_documents(kind: ContentKind, docs: &[Value]) -> Vec<ContentItem> {
    let mut seen = HashSet::new();
    docs.iter()
        .filter_map(|doc| shape_document(kind, doc))
        .filter(|item| {
            let fresh = seen.insert(item.id.clone());
            if !fresh {
                warn!("{} 中出现重复的文档ID {}，已忽略", kind.collection(), item.id);
            }
            fresh
        })
        .collect()
}

/// 转换单个文档，缺少ID或标题时返回None
///
/// 关联字段可能已展开，也可能只是引用ID。只有带 `url` 的媒体对象会成为 `MediaRef`。
pub fn shape_document(kind: ContentKind, doc: &Value) -> Option<ContentItem> {
    let Some(id) = doc.get("id").and_then(reference_id) else {
        warn!("{} 中的文档缺少ID，已跳过", kind.collection());
        return None;
    };
    let Some(title) = text(doc, "title") else {
        warn!("{} 文档 {} 缺少标题，已跳过", kind.collection(), id);
        return None;
    };

    let mut item = ContentItem::new(id, title);
    item.kind = kind;
    item.slug = text(doc, "slug");
    item.tags = labels(doc.get("tags"), &["tag", "name", "title"], true);

    match kind {
        ContentKind::Post => {
            item.excerpt = text(doc, "excerpt");
            item.published_at = doc.get("publishedAt").and_then(parse_date);
            // 分类是关联字段，未展开时只有ID，不能当作名称
            item.categories = labels(doc.get("categories"), &["title", "name", "slug"], false);
            item.cover_image = doc.get("coverImage").and_then(media);
            item.url = item.slug.as_ref().map(|slug| format!("/blog/{}", slug));
        }
        ContentKind::Gallery => {
            item.excerpt = text(doc, "description");
            item.published_at = doc.get("publishedDate").and_then(parse_date);
            item.categories = single_category(doc.get("category"));
            item.cover_image = doc.get("image").and_then(media);
        }
        ContentKind::Project => {
            item.excerpt = text(doc, "description");
            item.published_at = doc.get("publishedAt").and_then(parse_date);
            item.categories = single_category(doc.get("category"));
            item.cover_image = doc
                .get("thumbnail")
                .and_then(media)
                .or_else(|| doc.get("coverImage").and_then(media));
            item.url = item.slug.as_ref().map(|slug| format!("/projects/{}", slug));
        }
    }

    Some(item)
}

/// 引用ID，可能是字符串或数字
fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(doc: &Value, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 媒体关联：只有展开后带url的对象才有效
fn media(value: &Value) -> Option<MediaRef> {
    let url = text(value, "url")?;
    Some(MediaRef {
        url,
        alt: text(value, "alt").unwrap_or_default(),
    })
}

/// 标签或分类列表
///
/// 元素可以是字符串或对象，对象按 `keys` 顺序取第一个非空字段。
/// `accept_strings` 为false时字符串元素视为未展开的引用ID而丢弃。
fn labels(value: Option<&Value>, keys: &[&str], accept_strings: bool) -> Vec<String> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    let mut result: Vec<String> = Vec::new();
    for entry in entries {
        let label = match entry {
            Value::String(s) if accept_strings => Some(s.trim().to_string()),
            Value::Object(_) => keys.iter().find_map(|key| text(entry, key)),
            _ => None,
        };
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            if !result.contains(&label) {
                result.push(label);
            }
        }
    }
    result
}

/// 单值分类（图库、项目使用选择字段）
fn single_category(value: Option<&Value>) -> Vec<String> {
    let label = match value {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(obj) if obj.is_object() => text(obj, "title").or_else(|| text(obj, "name")),
        _ => None,
    };
    label.filter(|l| !l.is_empty()).into_iter().collect()
}

/// 解析ISO-8601日期，也接受只有日期部分的值
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shapes_post_with_resolved_relations() {
        let doc = json!({
            "id": "p1",
            "title": "  Trip Notes ",
            "slug": "trip-notes",
            "excerpt": "Three days in Porto",
            "publishedAt": "2024-05-02T09:30:00.000Z",
            "tags": [{ "tag": "photography" }, { "tag": "travel" }, { "tag": "travel" }, "film"],
            "categories": [{ "id": "c1", "title": "Journal" }, "c2"],
            "coverImage": { "id": "m1", "url": "/media/porto.jpg", "alt": "Porto" }
        });

        let item = shape_document(ContentKind::Post, &doc).unwrap();
        assert_eq!(item.title, "Trip Notes");
        assert_eq!(item.tags, vec!["photography", "travel", "film"]);
        assert_eq!(item.categories, vec!["Journal"]);
        assert_eq!(item.url.as_deref(), Some("/blog/trip-notes"));
        assert_eq!(item.month_key().as_deref(), Some("2024-05"));
        assert_eq!(item.cover_image, Some(MediaRef { url: "/media/porto.jpg".to_string(), alt: "Porto".to_string() }));
    }

    #[test]
    fn unresolved_media_becomes_none() {
        let doc = json!({ "id": 7, "title": "Draft", "coverImage": "m42", "publishedAt": "not a date" });
        let item = shape_document(ContentKind::Post, &doc).unwrap();
        assert_eq!(item.id, "7");
        assert_eq!(item.cover_image, None);
        assert_eq!(item.published_at, None);
    }

    #[test]
    fn shapes_gallery_image() {
        let doc = json!({
            "id": "g1",
            "title": "Harbour",
            "description": "",
            "category": "landscape",
            "publishedDate": "2023-06-15",
            "image": { "url": "/media/harbour.jpg" }
        });
        let item = shape_document(ContentKind::Gallery, &doc).unwrap();
        assert_eq!(item.kind, ContentKind::Gallery);
        assert_eq!(item.excerpt, None);
        assert_eq!(item.categories, vec!["landscape"]);
        assert_eq!(item.cover_image.as_ref().unwrap().alt, "");
        assert_eq!(item.month_key().as_deref(), Some("2023-06"));
        assert_eq!(item.url, None);
    }

    #[test]
    fn shapes_project_with_fallback_cover() {
        let doc = json!({
            "id": "pr1",
            "title": "Dots",
            "slug": "dots",
            "category": { "title": "Web" },
            "coverImage": { "url": "/media/dots.png", "alt": "dots" }
        });
        let item = shape_document(ContentKind::Project, &doc).unwrap();
        assert_eq!(item.categories, vec!["Web"]);
        assert_eq!(item.cover_image.unwrap().url, "/media/dots.png");
        assert_eq!(item.url.as_deref(), Some("/projects/dots"));
    }

    #[test]
    fn skips_invalid_and_duplicate_documents() {
        let docs = vec![
            json!({ "id": "1", "title": "One" }),
            json!({ "title": "No id" }),
            json!({ "id": "2" }),
            json!({ "id": "1", "title": "One again" }),
        ];
        let items = shape_documents(ContentKind::Post, &docs);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "One");
    }
}
