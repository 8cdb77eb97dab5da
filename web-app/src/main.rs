//! # Web 应用入口
//!
//! 以 CGI 方式运行：从环境变量和标准输入读取请求，
//! 响应写到标准输出，日志写到标准错误。

mod routing;

use anyhow::Context;
use clap::Parser;
use configuration::AppSettings;
use infrastructure_composition::{initialize_logging, Bootstrapper, LoggingConfig};
use routing::EchoRoutingProvider;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{error, info};
use web_http::RawRequest;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "web-app")]
#[command(about = "Lorn Web CGI 应用")]
struct Args {
    /// 启动配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 源码根目录
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// 应用 `.env` 文件路径
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    initialize_logging(&LoggingConfig::from_settings(&settings.logging))
        .context("初始化日志失败")?;
    info!("启动 Lorn Web 应用");

    let mut body = Vec::new();
    std::io::stdin()
        .read_to_end(&mut body)
        .context("读取请求体失败")?;
    let raw = RawRequest::from_cgi(std::env::vars(), body);

    let bootstrapper = Bootstrapper::new(settings)
        .with_type::<EchoRoutingProvider>()
        .with_raw_request(raw);

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    if let Err(e) = bootstrapper.initialize() {
        error!("进程环境初始化失败: {}", e);
        return write_fallback(&mut output, &e.to_string());
    }

    if let Err(failure) = bootstrapper.run(&mut output) {
        if let Err(e) = bootstrapper.render_failure(&failure, &mut output) {
            error!("错误响应输出失败: {}", e);
            return write_fallback(&mut output, &failure.to_string());
        }
    }

    info!("请求处理完成");
    Ok(())
}

/// 叠加命令行参数到启动配置
fn load_settings(args: &Args) -> anyhow::Result<AppSettings> {
    let mut settings = AppSettings::load(args.config.as_deref()).context("加载启动配置失败")?;
    if let Some(root) = &args.source_root {
        settings = settings.with_source_root(root);
    }
    if let Some(env_file) = &args.env_file {
        settings = settings.with_env_file(env_file);
    }
    if let Some(level) = &args.log_level {
        settings.logging.level = level.clone();
    }
    if args.json_logs {
        settings.logging.json = true;
    }
    Ok(settings)
}

/// 无法构建异常容器时输出纯文本 500 响应
fn write_fallback<W: Write>(writer: &mut W, message: &str) -> anyhow::Result<()> {
    write!(
        writer,
        "HTTP/1.1 500 Internal Server Error\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{message}"
    )?;
    writer.flush()?;
    Ok(())
}
