use thiserror::Error;

/// 数据适配器错误
#[derive(Debug, Error)]
pub enum AdapterError {
    /// 请求CMS失败（连接、超时等）
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    /// CMS返回非成功状态码
    #[error("CMS返回错误状态 {status}: {url}")]
    Status { status: u16, url: String },

    /// 响应体不是预期的JSON
    #[error("解析响应失败: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件缺失或无效
    #[error("配置错误: {0}")]
    Config(String),

    #[error("未知的集合: {0}")]
    UnknownCollection(String),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
