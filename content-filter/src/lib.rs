use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use serde::Serialize;
use web_sys::console;
use utils_common::compression as utils;
use utils_common::models::{ContentItem, ContentSnapshot};

// 导出模块
pub mod builder;
pub mod engine;
pub mod lightbox;
pub mod models;
pub mod query;
pub mod state;

pub use builder::SnapshotBuilder;
pub use lightbox::{LightboxRegistry, LightboxWidget};
pub use models::{Facets, FilterResult, MonthGroup, SortKey, ViewIntent, BLOG_PAGE_SIZE, CARD_PAGE_SIZE};
pub use query::ListingQuery;
pub use state::ListingState;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 从压缩快照中读取条目，重复标识符只保留第一个
pub fn load_snapshot(data: &[u8]) -> Result<ContentSnapshot, String> {
    let snapshot = utils::from_compressed::<ContentSnapshot>(data)
        .map_err(|e| format!("解析快照失败: {}", e))?;
    Ok(dedup_snapshot(snapshot))
}

/// 从JSON读取条目，接受快照对象或条目数组
pub fn load_json(json: &str) -> Result<Vec<ContentItem>, String> {
    let items = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<ContentItem>>(json)
            .map_err(|e| format!("解析条目数组失败: {}", e))?
    } else {
        serde_json::from_str::<ContentSnapshot>(json)
            .map_err(|e| format!("解析快照JSON失败: {}", e))?
            .items
    };

    let mut builder = SnapshotBuilder::new("");
    builder.extend(items);
    Ok(builder.build().items)
}

fn dedup_snapshot(snapshot: ContentSnapshot) -> ContentSnapshot {
    let mut builder = SnapshotBuilder::new(snapshot.collection.clone());
    builder.extend(snapshot.items);
    ContentSnapshot {
        items: builder.build().items,
        ..snapshot
    }
}

fn report(message: String) -> JsValue {
    console::log_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn to_js<T: Serialize>(value: &T, what: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| report(format!("序列化{}失败: {}", what, e)))
}

/// 列表页JS接口 - 持有完整条目列表和当前筛选状态
#[wasm_bindgen]
pub struct ContentListingJS {
    state: ListingState,
}

#[wasm_bindgen]
impl ContentListingJS {
    /// 从压缩快照创建
    pub fn from_snapshot(data: &[u8], items_per_page: usize) -> Result<ContentListingJS, JsValue> {
        let snapshot = load_snapshot(data).map_err(report)?;
        Ok(Self {
            state: ListingState::new(snapshot.items, items_per_page),
        })
    }

    /// 从JSON创建
    pub fn from_json(json: &str, items_per_page: usize) -> Result<ContentListingJS, JsValue> {
        let items = load_json(json).map_err(report)?;
        Ok(Self {
            state: ListingState::new(items, items_per_page),
        })
    }

    /// 替换条目列表，视图状态恢复默认
    pub fn replace_items(&mut self, json: &str) -> Result<(), JsValue> {
        let items = load_json(json).map_err(report)?;
        self.state.replace_items(items);
        Ok(())
    }

    /// 用URL查询字符串恢复筛选状态
    pub fn apply_query(&mut self, query: &str) {
        self.state.apply_query(&ListingQuery::parse(query));
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.state.set_search_query(query);
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.state.set_category(category);
    }

    pub fn set_selected_tags(&mut self, tags: Vec<String>) {
        self.state.set_selected_tags(tags);
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.state.toggle_tag(tag);
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
    }

    pub fn set_sort(&mut self, sort: &str) -> Result<(), JsValue> {
        let sort_by = SortKey::parse(sort)
            .ok_or_else(|| report(format!("未知的排序方式: {}", sort)))?;
        self.state.set_sort(sort_by);
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    /// 当前页结果
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.view(), "筛选结果")
    }

    /// 按年月分组的筛选结果
    pub fn month_groups(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.month_groups(), "分组结果")
    }

    pub fn facets(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.facets(), "分面数据")
    }

    /// 与指定条目共享标签的相关条目
    pub fn related(&self, id: &str, limit: usize) -> Result<JsValue, JsValue> {
        to_js(&engine::related_items(self.state.items(), id, limit), "相关条目")
    }

    /// 当前状态对应的查询字符串
    pub fn query_string(&self) -> String {
        self.state.to_query().to_query_string()
    }
}

/// JS灯箱实例，销毁时调用其 `destroy` 方法
pub struct JsLightbox {
    instance: JsValue,
}

impl LightboxWidget for JsLightbox {
    fn destroy(&mut self) {
        let destroy = match js_sys::Reflect::get(&self.instance, &JsValue::from_str("destroy")) {
            Ok(value) if value.is_function() => value.unchecked_into::<js_sys::Function>(),
            _ => return,
        };
        if let Err(e) = destroy.call0(&self.instance) {
            console::log_2(&JsValue::from_str("销毁灯箱实例失败:"), &e);
        }
    }
}

/// 灯箱登记表JS接口
#[wasm_bindgen]
pub struct LightboxRegistryJS {
    registry: LightboxRegistry<JsLightbox>,
}

#[wasm_bindgen]
impl LightboxRegistryJS {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LightboxRegistryJS {
        Self {
            registry: LightboxRegistry::new(),
        }
    }

    /// 在容器上初始化灯箱，`factory(container)` 返回新实例
    pub fn attach(&mut self, container: &str, factory: &js_sys::Function) -> Result<(), JsValue> {
        self.registry
            .attach(container, |c| {
                factory
                    .call1(&JsValue::NULL, &JsValue::from_str(c))
                    .map(|instance| JsLightbox { instance })
            })
            .map(|_| ())
    }

    pub fn detach(&mut self, container: &str) -> bool {
        self.registry.detach(container)
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    pub fn is_attached(&self, container: &str) -> bool {
        self.registry.is_attached(container)
    }
}

impl Default for LightboxRegistryJS {
    fn default() -> Self {
        Self::new()
    }
}
