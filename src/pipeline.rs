//! 抓取流水线编排
//!
//! 一次运行：抓取页面 → 并发提取条目 → 组装快照。条目提取在固定大小的
//! 工作池内并行，但结果按条目在文档中的位置组装，完成顺序不影响输出顺序。

use std::sync::Arc;

use chrono::Local;
use futures::future::join_all;
use scraper::ElementRef;
use tokio::sync::Semaphore;

use crate::core::ScraperOptions;
use crate::extract::extract_repo;
use crate::network::ListingFetcher;
use crate::snapshot::{Snapshot, TrendingRepo};
use crate::translation::Translator;

/// 抓取流水线
pub struct Pipeline {
    fetcher: ListingFetcher,
    translator: Arc<Translator>,
    workers: usize,
}

impl Pipeline {
    /// 按运行时配置创建流水线
    pub fn new(options: &ScraperOptions) -> Self {
        Self::with_parts(
            ListingFetcher::new(options),
            Arc::new(Translator::new(options)),
            options.workers,
        )
    }

    /// 用现成的组件创建流水线（测试时注入桩组件）
    pub fn with_parts(fetcher: ListingFetcher, translator: Arc<Translator>, workers: usize) -> Self {
        Self {
            fetcher,
            translator,
            workers,
        }
    }

    /// 执行一次完整抓取，返回当日快照
    ///
    /// 抓取失败或页面上没有条目时返回空快照，由调用方按运行失败处理。
    pub async fn run_once(&self) -> Snapshot {
        let date = Local::now().date_naive();

        let Some(page) = self.fetcher.fetch().await else {
            return Snapshot::empty(date);
        };

        let entries = page.entries();
        if entries.is_empty() {
            tracing::warn!("页面中没有找到排行条目");
            return Snapshot::empty(date);
        }

        let repos = extract_all(&entries, &self.translator, self.workers).await;
        let stats = self.translator.cache_stats().await;
        tracing::info!(
            "成功抓取 {} 个热门项目（翻译缓存命中 {} / 未命中 {}）",
            repos.len(),
            stats.cache_hits,
            stats.cache_misses
        );

        Snapshot::new(date, repos)
    }
}

/// 在有界工作池内提取全部条目，输出顺序等于输入顺序
pub async fn extract_all(
    entries: &[ElementRef<'_>],
    translator: &Translator,
    workers: usize,
) -> Vec<TrendingRepo> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));

    let tasks = entries.iter().map(|entry| {
        let entry = *entry;
        let semaphore = Arc::clone(&semaphore);
        async move {
            // 信号量从不关闭，acquire 只会成功
            let _permit = semaphore.acquire().await.ok();
            extract_repo(entry).into_repo(translator).await
        }
    });

    // join_all 按任务下标组装结果，天然保持文档顺序
    join_all(tasks).await
}
