//! 重试策略与每日调度
//!
//! 一个运行周期内按 ATTEMPT → {SUCCESS, RETRY, EXHAUSTED} 状态机推进：
//! 拿到非空快照就持久化并结束；拿到空快照且还有剩余次数就按线性退避
//! （60 秒 × 尝试序号）睡眠后重试；连续失败达到上限后放弃本轮，不落盘
//! 任何部分数据。
//!
//! 周期之外由定时触发器驱动：进程启动时立即执行一轮，此后每天在配置的
//! 时刻执行一轮，用固定间隔的定时器 tick 检查是否到点。

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::core::{ScrapeResult, ScraperOptions};
use crate::snapshot::Snapshot;

/// 一个运行周期的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 抓到数据且快照已落盘
    Success,
    /// 抓到数据但落盘失败，本轮不再重试
    PersistFailed,
    /// 连续尝试均未抓到数据，本轮放弃
    Exhausted,
}

/// 重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 退避基准单位，第 n 次失败后睡 n 个单位
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// 从运行时配置构造
    pub fn from_options(options: &ScraperOptions) -> Self {
        Self {
            max_attempts: options.max_attempts,
            backoff_unit: options.backoff_unit,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(60),
        }
    }
}

/// 执行一个带重试的运行周期
///
/// `run` 产出一次快照，`persist` 负责落盘。两者都以闭包注入，
/// 测试时可以用桩闭包统计调用次数。
pub async fn run_cycle<R, Fut, P>(policy: &RetryPolicy, mut run: R, mut persist: P) -> CycleOutcome
where
    R: FnMut() -> Fut,
    Fut: Future<Output = Snapshot>,
    P: FnMut(&Snapshot) -> ScrapeResult<PathBuf>,
{
    for attempt in 1..=policy.max_attempts.max(1) {
        let snapshot = run().await;

        if !snapshot.is_empty() {
            return match persist(&snapshot) {
                Ok(path) => {
                    tracing::info!("数据已成功保存到 {}", path.display());
                    CycleOutcome::Success
                }
                Err(e) => {
                    tracing::error!("保存快照文件时出错: {}", e);
                    CycleOutcome::PersistFailed
                }
            };
        }

        if attempt < policy.max_attempts {
            let delay = policy.backoff_unit * attempt;
            tracing::warn!(
                "第 {} 次尝试未获取到数据，将在 {} 秒后重试...",
                attempt,
                delay.as_secs()
            );
            sleep(delay).await;
        }
    }

    tracing::error!(
        "已尝试 {} 次，仍未获取到数据，任务失败",
        policy.max_attempts
    );
    CycleOutcome::Exhausted
}

/// 每日调度配置
#[derive(Debug, Clone)]
pub struct Schedule {
    /// 每日执行时刻
    pub run_at: NaiveTime,
    /// 轮询 tick 间隔
    pub tick: Duration,
}

impl Schedule {
    /// 从运行时配置构造，时刻格式非法时回退到 10:00
    pub fn from_options(options: &ScraperOptions) -> Self {
        let run_at = NaiveTime::parse_from_str(&options.run_at, "%H:%M").unwrap_or_else(|_| {
            tracing::warn!("执行时刻 '{}' 无法解析，回退到 10:00", options.run_at);
            NaiveTime::from_hms_opt(10, 0, 0).expect("常量时刻合法")
        });
        Self {
            run_at,
            tick: options.tick,
        }
    }
}

/// 启动后立即执行的那一轮之后，下一次应当执行的日期
///
/// 当天执行时刻还没到就仍排在今天，否则排到明天。
fn next_run_date(now: NaiveDateTime, run_at: NaiveTime) -> NaiveDate {
    if now.time() < run_at {
        now.date()
    } else {
        now.date() + chrono::Days::new(1)
    }
}

/// 按计划反复执行运行周期，永不返回
///
/// 进程启动时立即执行一轮，此后每个 tick 检查配置时刻是否已越过、
/// 目标日期是否尚未执行。调用方负责用中断信号竞争这个循环。
pub async fn run_daily<C, Fut>(schedule: &Schedule, mut cycle: C)
where
    C: FnMut() -> Fut,
    Fut: Future<Output = CycleOutcome>,
{
    tracing::info!("启动时立即执行一次任务...");
    cycle().await;

    let mut due = next_run_date(Local::now().naive_local(), schedule.run_at);
    tracing::info!(
        "已设置定时任务，每天 {} 执行，下一次在 {}",
        schedule.run_at.format("%H:%M"),
        due
    );

    let mut ticker = interval(schedule.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let now = Local::now().naive_local();
        if now.date() >= due && now.time() >= schedule.run_at {
            cycle().await;
            due = Local::now().naive_local().date() + chrono::Days::new(1);
            tracing::info!("本轮任务结束，下一次在 {}", due);
        }
    }
}
