use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// 内容类型 - 区分文章、图库图片与项目
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// 博客文章
    #[default]
    Post,
    /// 图库图片
    Gallery,
    /// 作品项目
    Project,
}

impl ContentKind {
    /// CMS中对应的集合名称
    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Gallery => "gallery",
            ContentKind::Project => "projects",
        }
    }

    /// 从集合名称解析内容类型
    pub fn from_collection(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "posts" | "post" | "blog" => Some(ContentKind::Post),
            "gallery" | "gallery-images" | "images" => Some(ContentKind::Gallery),
            "projects" | "project" => Some(ContentKind::Project),
            _ => None,
        }
    }
}

/// 已解析的媒体引用
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MediaRef {
    /// 媒体文件URL
    pub url: String,
    /// 替代文本
    #[serde(default)]
    pub alt: String,
}

/// 内容条目 - 数据适配器产出、筛选引擎消费的视图模型
///
/// 原始CMS文档不会进入筛选引擎，所有关联字段在这里都已展开为普通值。
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// 列表内唯一的标识符
    pub id: String,
    /// 内容类型
    #[serde(default)]
    pub kind: ContentKind,
    /// 标题
    pub title: String,
    /// 路径别名
    #[serde(default)]
    pub slug: Option<String>,
    /// 页面URL
    #[serde(default)]
    pub url: Option<String>,
    /// 摘要或描述
    #[serde(default, alias = "description")]
    pub excerpt: Option<String>,
    /// 发布时间，缺失时不参与按月分组
    #[serde(default, alias = "publishedDate")]
    pub published_at: Option<DateTime<Utc>>,
    /// 标签列表，保留展示顺序
    #[serde(default)]
    pub tags: Vec<String>,
    /// 分类列表（图库条目只有一个分类）
    #[serde(default)]
    pub categories: Vec<String>,
    /// 封面图
    #[serde(default, alias = "src")]
    pub cover_image: Option<MediaRef>,
}

impl ContentItem {
    /// 创建只有标识符和标题的条目
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ContentKind::default(),
            title: title.into(),
            slug: None,
            url: None,
            excerpt: None,
            published_at: None,
            tags: Vec::new(),
            categories: Vec::new(),
            cover_image: None,
        }
    }

    /// 年月键，格式 yyyy-mm
    pub fn month_key(&self) -> Option<String> {
        self.published_at
            .map(|date| format!("{}-{:02}", date.year(), date.month()))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// 内容快照 - 某个集合在某一时刻的完整条目列表
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    /// 来源集合名称
    pub collection: String,
    /// 快照生成时间
    pub generated_at: DateTime<Utc>,
    /// 条目列表
    pub items: Vec<ContentItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn month_key_is_zero_padded() {
        let mut item = ContentItem::new("1", "Trip Notes");
        assert_eq!(item.month_key(), None);

        item.published_at = Some(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap());
        assert_eq!(item.month_key().as_deref(), Some("2024-03"));
    }

    #[test]
    fn deserializes_cms_style_aliases() {
        let json = r#"{
            "id": "g1",
            "kind": "gallery",
            "title": "Harbour",
            "description": "Evening light",
            "publishedDate": "2023-06-15T00:00:00Z",
            "src": { "url": "/media/harbour.jpg", "alt": "harbour" }
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.kind, ContentKind::Gallery);
        assert_eq!(item.excerpt.as_deref(), Some("Evening light"));
        assert_eq!(item.month_key().as_deref(), Some("2023-06"));
        assert_eq!(item.cover_image.unwrap().url, "/media/harbour.jpg");
        assert!(item.tags.is_empty());
    }

    #[test]
    fn collection_names_round_trip() {
        for kind in [ContentKind::Post, ContentKind::Gallery, ContentKind::Project] {
            assert_eq!(ContentKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(ContentKind::from_collection("users"), None);
    }
}
