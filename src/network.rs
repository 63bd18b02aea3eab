//! Trending 页面抓取
//!
//! 对固定的 Trending 地址发起一次 GET，带真实浏览器请求头。任何非 2xx
//! 状态或传输错误都视为可恢复失败：记录日志并返回空结果，由编排层通过
//! 重试策略区分"没抓到数据"和"本地致命错误"。

use std::sync::LazyLock;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::core::{ScraperOptions, TRENDING_URL, USER_AGENT};

static ENTRY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.Box-row").expect("内置选择器必然合法"));

/// 解析后的 Trending 页面
///
/// 持有整棵文档树，条目节点的生命周期绑定在页面对象上。
pub struct TrendingPage {
    document: Html,
}

impl TrendingPage {
    /// 解析原始 HTML
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// 按文档顺序返回全部条目节点
    ///
    /// 文档顺序就是页面的排行顺序，整条流水线必须原样保留。
    pub fn entries(&self) -> Vec<ElementRef<'_>> {
        self.document.select(&ENTRY).collect()
    }
}

/// Trending 页面抓取器
pub struct ListingFetcher {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ListingFetcher {
    /// 按运行时配置创建抓取器
    pub fn new(options: &ScraperOptions) -> Self {
        Self::with_url(TRENDING_URL, options.fetch_timeout)
    }

    /// 指定地址创建抓取器（测试时指向本地桩服务）
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout,
        }
    }

    /// 抓取并解析 Trending 页面
    ///
    /// 失败时返回 `None`，调用方将其视同零条目处理。
    pub async fn fetch(&self) -> Option<TrendingPage> {
        tracing::info!("开始抓取 GitHub 热门项目...");
        match self.request().await {
            Ok(body) => Some(TrendingPage::parse(&body)),
            Err(e) => {
                tracing::error!("请求 GitHub 时出错: {}", e);
                None
            }
        }
    }

    async fn request(&self) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_entries_preserve_document_order() {
        let page = TrendingPage::parse(
            r#"<html><body>
                 <article class="Box-row"><h2 class="h3"><a>a/one</a></h2></article>
                 <article class="Box-row"><h2 class="h3"><a>b/two</a></h2></article>
                 <article class="Box-row"><h2 class="h3"><a>c/three</a></h2></article>
               </body></html>"#,
        );
        let names: Vec<String> = page
            .entries()
            .iter()
            .map(|entry| crate::extract::extract_repo(*entry).full_name.value)
            .collect();
        assert_eq!(names, ["a/one", "b/two", "c/three"]);
    }

    #[test]
    fn test_entries_empty_page() {
        let page = TrendingPage::parse("<html><body><p>nothing here</p></body></html>");
        assert!(page.entries().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_status_degrades_to_none() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                    .await;
            }
        });

        let fetcher =
            ListingFetcher::with_url(format!("http://{}/trending", addr), Duration::from_secs(5));
        assert!(fetcher.fetch().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_transport_error_degrades_to_none() {
        // 端口上没有任何服务
        let fetcher =
            ListingFetcher::with_url("http://127.0.0.1:1/trending", Duration::from_secs(1));
        assert!(fetcher.fetch().await.is_none());
    }
}
