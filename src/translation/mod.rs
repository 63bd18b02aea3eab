//! 翻译模块
//!
//! 把英文项目描述翻译成简体中文。由两部分组成：
//!
//! - `cache` - 容量有界的 LRU 翻译缓存，进程生命周期内同一文本至多触发一次外呼
//! - `client` - 调用 Google 翻译接口的客户端，任何失败都降级为原文透传

pub mod cache;
pub mod client;

pub use cache::{CacheStats, TranslationCache};
pub use client::Translator;
