//! 翻译缓存
//!
//! 容量有界的 LRU 缓存，按原文本精确匹配。达到容量上限后淘汰最久未使用的
//! 条目。缓存只在进程生命周期内有效，不跨重启持久化。
//!
//! 并发说明：未命中的并发请求可能各自发起一次冗余外呼，随后的写入是
//! 等值覆盖，无需按键加锁；正确性只要求已填充的条目被后续调用复用。

use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::RwLock;

/// 默认缓存容量
pub const DEFAULT_CAPACITY: usize = 128;

/// 缓存统计信息
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub sets: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// 计算命中率
    pub fn hit_rate(&self) -> f32 {
        if self.total_requests > 0 {
            self.cache_hits as f32 / self.total_requests as f32
        } else {
            0.0
        }
    }
}

struct CacheInner {
    entries: LruCache<String, String>,
    stats: CacheStats,
}

/// 翻译缓存
pub struct TranslationCache {
    inner: RwLock<CacheInner>,
}

impl TranslationCache {
    /// 创建默认容量的缓存
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 创建指定容量的缓存，容量为 0 时回退到默认值
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY).expect("默认容量非零"));
        Self {
            inner: RwLock::new(CacheInner {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    /// 查询缓存，命中时刷新条目的使用顺序
    pub async fn get(&self, text: &str) -> Option<String> {
        let mut inner = self.inner.write().await;
        inner.stats.total_requests += 1;
        match inner.entries.get(text).cloned() {
            Some(translated) => {
                inner.stats.cache_hits += 1;
                Some(translated)
            }
            None => {
                inner.stats.cache_misses += 1;
                None
            }
        }
    }

    /// 写入缓存条目，必要时淘汰最久未使用的条目
    pub async fn insert(&self, text: String, translated: String) {
        let mut inner = self.inner.write().await;
        if let Some((evicted_key, _)) = inner.entries.push(text.clone(), translated) {
            if evicted_key != text {
                inner.stats.evictions += 1;
            }
        }
        inner.stats.sets += 1;
    }

    /// 当前条目数
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// 是否为空
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 获取统计信息快照
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats.clone()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}
