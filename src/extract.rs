//! 条目字段提取
//!
//! 把一个 `article.Box-row` 条目节点解析成结构化记录。页面标记会漂移，
//! 因此每个字段的提取相互独立：某个子元素缺失只会让该字段落到文档化的
//! 默认值，绝不会让整条记录或整个批次失败。
//!
//! 每个字段都带有"正常提取 / 应用默认值"的标记，便于测试直接断言
//! 默认值是否被套用，而不必翻日志。

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::number::parse_number;
use crate::snapshot::TrendingRepo;
use crate::translation::Translator;

/// 语言缺失时的占位值
pub const LANGUAGE_UNSPECIFIED: &str = "未指定";

static NAME: LazyLock<Selector> = LazyLock::new(|| parse_selector("h2.h3 a"));
static NAME_SPANS: LazyLock<Selector> = LazyLock::new(|| parse_selector("h2.h3 a span"));
static LANGUAGE: LazyLock<Selector> =
    LazyLock::new(|| parse_selector(r#"span[itemprop="programmingLanguage"]"#));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| parse_selector("p.col-9"));
static STAT_LINKS: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("a.Link--muted.d-inline-block.mr-3"));
// 当日收藏数有两种已知的类组合，按此顺序先匹配者优先
static TODAY_PRIMARY: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("span.d-inline-block.float-sm-right"));
static TODAY_FALLBACK: LazyLock<Selector> = LazyLock::new(|| parse_selector("span.float-right"));

fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).expect("内置选择器必然合法")
}

/// 单个字段的提取结果，记录是否落到了默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Extracted<T> {
    /// 正常提取到的值
    pub fn found(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    /// 来源元素缺失，使用默认值
    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }
}

/// 一个条目的全部字段提取结果
#[derive(Debug, Clone)]
pub struct RepoExtraction {
    pub full_name: Extracted<String>,
    pub language: Extracted<String>,
    pub description: Extracted<String>,
    pub stars: Extracted<u64>,
    pub forks: Extracted<u64>,
    pub today_count: Extracted<u64>,
}

impl RepoExtraction {
    /// 补全翻译并落成最终记录
    ///
    /// 描述为空时跳过翻译；翻译失败由客户端内部降级为原文。
    pub async fn into_repo(self, translator: &Translator) -> TrendingRepo {
        let description = self.description.value;
        let description_translated = if description.is_empty() {
            String::new()
        } else {
            translator.translate(&description).await
        };

        TrendingRepo {
            full_name: self.full_name.value,
            language: self.language.value,
            stars: self.stars.value,
            forks: self.forks.value,
            description,
            description_translated,
            today_count: self.today_count.value,
        }
    }
}

/// 从一个条目节点提取全部字段，绝不失败
pub fn extract_repo(entry: ElementRef<'_>) -> RepoExtraction {
    RepoExtraction {
        full_name: extract_full_name(entry),
        language: extract_language(entry),
        description: extract_description(entry),
        stars: extract_stat(entry, 0),
        forks: extract_stat(entry, 1),
        today_count: extract_today_count(entry),
    }
}

/// 项目名称：优先取完整链接文本，缺失时用子 span 文本以 "/" 拼接
fn extract_full_name(entry: ElementRef<'_>) -> Extracted<String> {
    if let Some(anchor) = entry.select(&NAME).next() {
        let name: String = anchor
            .text()
            .collect::<String>()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !name.is_empty() {
            return Extracted::found(name);
        }
    }

    let parts: Vec<String> = entry
        .select(&NAME_SPANS)
        .map(|span| span.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    if parts.is_empty() {
        Extracted::defaulted(String::new())
    } else {
        Extracted::found(parts.join("/"))
    }
}

fn extract_language(entry: ElementRef<'_>) -> Extracted<String> {
    match entry.select(&LANGUAGE).next() {
        Some(element) => Extracted::found(element.text().collect::<String>().trim().to_string()),
        None => Extracted::defaulted(LANGUAGE_UNSPECIFIED.to_string()),
    }
}

fn extract_description(entry: ElementRef<'_>) -> Extracted<String> {
    match entry.select(&DESCRIPTION).next() {
        Some(element) => Extracted::found(element.text().collect::<String>().trim().to_string()),
        None => Extracted::defaulted(String::new()),
    }
}

/// 统计链接按文档顺序出现：第 0 个是收藏数，第 1 个是分支数
fn extract_stat(entry: ElementRef<'_>, index: usize) -> Extracted<u64> {
    match entry.select(&STAT_LINKS).nth(index) {
        Some(element) => {
            let text = element.text().collect::<String>();
            Extracted::found(parse_number(Some(text.trim())))
        }
        None => Extracted::defaulted(0),
    }
}

/// 当日收藏数：两种类组合按文档化顺序取先匹配者，过滤出数字字符
fn extract_today_count(entry: ElementRef<'_>) -> Extracted<u64> {
    let element = entry
        .select(&TODAY_PRIMARY)
        .next()
        .or_else(|| entry.select(&TODAY_FALLBACK).next());
    match element {
        Some(element) => {
            let digits: String = element
                .text()
                .collect::<String>()
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            Extracted::found(digits.parse().unwrap_or(0))
        }
        None => Extracted::defaulted(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const FULL_ENTRY: &str = r#"
        <article class="Box-row">
          <h2 class="h3"><a href="/rust-lang/rust"> rust-lang /
              rust </a></h2>
          <p class="col-9">Empowering everyone to build reliable software.</p>
          <span itemprop="programmingLanguage">Rust</span>
          <a class="Link--muted d-inline-block mr-3" href="/stargazers">95.1k</a>
          <a class="Link--muted d-inline-block mr-3" href="/forks">12,345</a>
          <span class="d-inline-block float-sm-right">1,024 stars today</span>
        </article>"#;

    fn extract(html: &str) -> RepoExtraction {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("article.Box-row").unwrap();
        let entry = document.select(&selector).next().expect("存在条目节点");
        extract_repo(entry)
    }

    #[test]
    fn test_extract_full_entry() {
        let extraction = extract(FULL_ENTRY);

        assert_eq!(extraction.full_name.value, "rust-lang/rust");
        assert!(!extraction.full_name.defaulted);
        assert_eq!(extraction.language.value, "Rust");
        assert_eq!(
            extraction.description.value,
            "Empowering everyone to build reliable software."
        );
        assert_eq!(extraction.stars.value, 95100);
        assert_eq!(extraction.forks.value, 12345);
        assert_eq!(extraction.today_count.value, 1024);
    }

    #[test]
    fn test_name_falls_back_to_joined_spans() {
        let extraction = extract(
            r#"<article class="Box-row">
                 <h2 class="h3"><a><span> owner </span><span> project </span></a></h2>
               </article>"#,
        );
        assert_eq!(extraction.full_name.value, "owner/project");
        assert!(!extraction.full_name.defaulted);
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let extraction = extract(
            r#"<article class="Box-row">
                 <h2 class="h3"><a>o/p</a></h2>
               </article>"#,
        );
        assert_eq!(extraction.stars.value, 0);
        assert!(extraction.stars.defaulted);
        assert_eq!(extraction.forks.value, 0);
        assert!(extraction.forks.defaulted);
    }

    #[test]
    fn test_single_stat_link_only_fills_stars() {
        let extraction = extract(
            r#"<article class="Box-row">
                 <a class="Link--muted d-inline-block mr-3">2.5k</a>
               </article>"#,
        );
        assert_eq!(extraction.stars.value, 2500);
        assert!(!extraction.stars.defaulted);
        assert!(extraction.forks.defaulted);
    }

    #[test]
    fn test_missing_language_uses_sentinel() {
        let extraction = extract(r#"<article class="Box-row"></article>"#);
        assert_eq!(extraction.language.value, LANGUAGE_UNSPECIFIED);
        assert!(extraction.language.defaulted);
    }

    #[test]
    fn test_today_count_fallback_class() {
        let extraction = extract(
            r#"<article class="Box-row">
                 <span class="float-right">37 stars today</span>
               </article>"#,
        );
        assert_eq!(extraction.today_count.value, 37);
        assert!(!extraction.today_count.defaulted);
    }

    #[test]
    fn test_today_count_primary_class_wins_when_both_present() {
        let extraction = extract(
            r#"<article class="Box-row">
                 <span class="float-right">99 stars today</span>
                 <span class="d-inline-block float-sm-right">11 stars today</span>
               </article>"#,
        );
        assert_eq!(extraction.today_count.value, 11);
    }

    #[test]
    fn test_empty_entry_still_produces_record() {
        let extraction = extract(r#"<article class="Box-row"></article>"#);
        assert_eq!(extraction.full_name.value, "");
        assert!(extraction.full_name.defaulted);
        assert_eq!(extraction.description.value, "");
        assert_eq!(extraction.today_count.value, 0);
        assert!(extraction.today_count.defaulted);
    }
}
