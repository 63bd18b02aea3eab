//! # GitHub Trending 爬虫库
//!
//! 定时抓取 GitHub Trending 页面，解析排行条目，为项目描述生成中文翻译，
//! 并将结果写入按日期命名的 CSV 快照文件。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型和运行时配置
//! - `number` - 数量字符串解析（"1.5k" 等）
//! - `network` - Trending 页面抓取与条目选择
//! - `extract` - 单个条目的字段提取
//! - `translation` - 翻译客户端与 LRU 缓存
//! - `snapshot` - 数据模型与 CSV 持久化
//! - `pipeline` - 抓取流水线编排
//! - `scheduler` - 重试策略与每日调度

pub mod core;
pub mod extract;
pub mod network;
pub mod number;
pub mod pipeline;
pub mod scheduler;
pub mod snapshot;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::{ScrapeError, ScrapeResult, ScraperOptions};
pub use crate::snapshot::{Snapshot, TrendingRepo};
