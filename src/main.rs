//! GitHub Trending 每日爬虫入口

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use github_trending::core::ScraperOptions;
use github_trending::pipeline::Pipeline;
use github_trending::scheduler::{run_cycle, run_daily, CycleOutcome, RetryPolicy, Schedule};

#[derive(Parser, Debug)]
#[command(version, about = "定时抓取 GitHub Trending 并生成带中文翻译的每日 CSV 快照")]
struct Args {
    /// 快照输出目录
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// 每日执行时刻 (HH:MM)
    #[arg(long, default_value = "10:00")]
    run_at: String,

    /// 页面请求超时（秒）
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// 条目提取并发上限
    #[arg(long, default_value_t = 5)]
    workers: usize,

    /// 只执行一轮抓取后退出，不进入每日调度
    #[arg(long)]
    once: bool,

    /// 日志文件目录；不指定则只输出到 stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// 初始化日志：stderr 始终输出，指定目录时同时写入日志文件
fn init_logging(log_dir: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "github-trending.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_dir.as_ref());

    let options = ScraperOptions {
        fetch_timeout: Duration::from_secs(args.timeout),
        workers: args.workers,
        run_at: args.run_at.clone(),
        output_dir: args.output_dir.clone(),
        ..Default::default()
    };

    tracing::info!("GitHub 每日热门项目爬虫启动");

    let pipeline = Pipeline::new(&options);
    let policy = RetryPolicy::from_options(&options);
    let schedule = Schedule::from_options(&options);
    let output_dir = options.output_dir.clone();

    let cycle = || {
        let pipeline = &pipeline;
        let policy = &policy;
        let output_dir = &output_dir;
        async move {
            run_cycle(
                policy,
                || pipeline.run_once(),
                |snapshot| snapshot.write_csv(output_dir),
            )
            .await
        }
    };

    if args.once {
        return match cycle().await {
            CycleOutcome::Success => ExitCode::SUCCESS,
            CycleOutcome::PersistFailed | CycleOutcome::Exhausted => ExitCode::FAILURE,
        };
    }

    tokio::select! {
        _ = run_daily(&schedule, cycle) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("爬虫程序已手动停止");
        }
    }

    ExitCode::SUCCESS
}
