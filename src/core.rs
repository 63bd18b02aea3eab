//! 核心类型：统一错误和运行时配置

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 爬虫错误类型
///
/// 抓取和翻译过程中的瞬时失败在各自模块内部降级处理，
/// 只有持久化等确实需要向上传播的失败才会以该类型出现。
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 网络错误
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// CSV写入错误
    #[error("CSV写入错误: {0}")]
    Csv(#[from] csv::Error),

    /// 序列化错误
    #[error("JSON解析错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 翻译响应结构异常
    #[error("翻译响应异常: {0}")]
    Translate(String),

    /// 持久化错误
    #[error("快照持久化失败: {0}")]
    Persist(String),
}

/// 错误结果类型别名
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Trending 页面地址
pub const TRENDING_URL: &str = "https://github.com/trending";

/// 翻译接口地址
pub const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// 抓取时使用的浏览器 User-Agent
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 运行时配置
///
/// 所有字段都有与原始部署一致的默认值，CLI 参数只覆盖其中一部分。
#[derive(Debug, Clone)]
pub struct ScraperOptions {
    /// Trending 页面请求超时
    pub fetch_timeout: Duration,
    /// 翻译请求超时
    pub translate_timeout: Duration,
    /// 翻译缓存容量（不同文本条数）
    pub cache_capacity: usize,
    /// 条目提取并发上限
    pub workers: usize,
    /// 每个运行周期内的最大尝试次数
    pub max_attempts: u32,
    /// 重试退避基准单位（第 n 次失败后睡 n 个单位）
    pub backoff_unit: Duration,
    /// 每日执行时刻，"HH:MM" 格式
    pub run_at: String,
    /// 调度轮询间隔
    pub tick: Duration,
    /// 快照输出目录
    pub output_dir: PathBuf,
}

impl Default for ScraperOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            translate_timeout: Duration::from_secs(10),
            cache_capacity: 128,
            workers: 5,
            max_attempts: 3,
            backoff_unit: Duration::from_secs(60),
            run_at: "10:00".to_string(),
            tick: Duration::from_secs(60),
            output_dir: PathBuf::from("."),
        }
    }
}
