//! 翻译客户端
//!
//! 调用 Google 翻译的非官方 gtx 接口（固定 en → zh-CN），带超时和结果缓存。
//! 翻译失败绝不能拖垮条目记录：任何非 200 状态、超时、JSON 结构异常或网络
//! 错误都降级为返回原文。

use std::time::Duration;

use serde_json::Value;

use crate::core::{ScrapeError, ScrapeResult, ScraperOptions, TRANSLATE_URL};
use crate::translation::cache::{CacheStats, TranslationCache};

/// 翻译客户端
pub struct Translator {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    cache: TranslationCache,
}

impl Translator {
    /// 按运行时配置创建客户端
    pub fn new(options: &ScraperOptions) -> Self {
        Self::with_endpoint(TRANSLATE_URL, options.translate_timeout, options.cache_capacity)
    }

    /// 指定接口地址创建客户端（测试时指向本地桩服务）
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeout: Duration,
        cache_capacity: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout,
            cache: TranslationCache::with_capacity(cache_capacity),
        }
    }

    /// 翻译一段英文文本
    ///
    /// 空输入直接返回空串；缓存命中时不发起外呼；外呼失败时返回原文且不写缓存。
    pub async fn translate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        if let Some(cached) = self.cache.get(text).await {
            return cached;
        }

        match self.request(text).await {
            Ok(translated) => {
                self.cache
                    .insert(text.to_string(), translated.clone())
                    .await;
                translated
            }
            Err(e) => {
                tracing::warn!("翻译失败，保留原文: {}", e);
                text.to_string()
            }
        }
    }

    /// 获取缓存统计信息
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    async fn request(&self, text: &str) -> ScrapeResult<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", "zh-CN"),
                ("dt", "t"),
                ("q", text),
            ])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        decode_segments(&body)
    }
}

/// 解析翻译接口的响应结构
///
/// 响应是嵌套数组 `[[[译文段, 原文段, ...], ...], ...]`，把外层第一个数组中
/// 每个分段的首元素拼接成完整译文。
fn decode_segments(body: &Value) -> ScrapeResult<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ScrapeError::Translate("响应首元素不是分段数组".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0))
        .filter_map(Value::as_str)
        .collect();

    Ok(translated)
}
