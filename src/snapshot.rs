//! 数据模型与 CSV 持久化
//!
//! 一次流水线运行产出一个 [`Snapshot`]：按页面排行顺序排列的条目序列加上
//! 运行日期。快照组装完成后不可变，交给持久化层写盘一次，之后不再保留。

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::core::ScrapeResult;

/// CSV 列头，顺序固定，与原始快照格式保持一致
const CSV_HEADERS: [&str; 7] = [
    "项目名称",
    "使用语言",
    "收藏数",
    "分支数",
    "描述",
    "中文描述",
    "当日收藏",
];

/// 一条归一化后的排行条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingRepo {
    /// 规范标识，"owner/project" 形式；所有提取路径都失败时为空串
    pub full_name: String,
    /// 主要语言，缺失时为 "未指定"
    pub language: String,
    /// 累计收藏数
    pub stars: u64,
    /// 累计分支数
    pub forks: u64,
    /// 原文描述，可能为空
    pub description: String,
    /// 中文描述；翻译被跳过或失败时等于原文
    pub description_translated: String,
    /// 当日新增收藏数
    pub today_count: u64,
}

/// 一次运行的完整结果集
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// 运行日期（本地时间）
    pub date: NaiveDate,
    /// 按页面排行顺序排列的条目
    pub repos: Vec<TrendingRepo>,
}

impl Snapshot {
    /// 创建快照
    pub fn new(date: NaiveDate, repos: Vec<TrendingRepo>) -> Self {
        Self { date, repos }
    }

    /// 创建空快照，调用方据此判定本次运行失败
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }

    /// 是否没有抓到任何条目
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    /// 按运行日期生成文件名
    pub fn filename(&self) -> String {
        format!("github-trending-{}.csv", self.date.format("%Y-%m-%d"))
    }

    /// 把快照写成 CSV 文件，返回写入路径
    ///
    /// 文件以 UTF-8 BOM 开头以兼容电子表格软件；同日期的已有文件会被覆盖。
    pub fn write_csv(&self, dir: &Path) -> ScrapeResult<PathBuf> {
        let path = dir.join(self.filename());
        let mut file = File::create(&path)?;
        file.write_all(b"\xEF\xBB\xBF")?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADERS)?;
        for repo in &self.repos {
            let record: [String; 7] = [
                repo.full_name.clone(),
                repo.language.clone(),
                repo.stars.to_string(),
                repo.forks.to_string(),
                repo.description.clone(),
                repo.description_translated.clone(),
                repo.today_count.to_string(),
            ];
            writer.write_record(&record)?;
        }
        writer.flush()?;

        Ok(path)
    }
}
