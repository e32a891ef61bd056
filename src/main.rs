use clap::Parser;
use modprint::adapters::{log_lines, read_all};
use modprint::config::LogFormat;
use modprint::utils::error::{ErrorSeverity, PrintError};
use modprint::utils::{logger, validation::Validate};
use modprint::CliConfig;
use std::fmt::Display;

async fn run(config: &CliConfig) -> modprint::Result<()> {
    let toml = config.load_config()?;
    toml.validate()?;

    let logger = toml.build_logger(toml.console_output())?;
    let options = config.log_options()?;

    if config.docstring {
        let text = if config.values.is_empty() {
            read_all(tokio::io::stdin()).await?
        } else {
            config.values.join("\n")
        };
        return logger.docstring(&text, config.tabs, &options);
    }

    if !config.values.is_empty() {
        let values: Vec<&dyn Display> = config.values.iter().map(|v| v as &dyn Display).collect();
        return logger.log(&values, &options);
    }

    // 沒有參數時逐行讀取標準輸入
    log_lines(&logger, tokio::io::stdin(), &options).await?;
    Ok(())
}

fn exit_code(e: &PrintError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,      // 例如 broken pipe
        ErrorSeverity::Medium => 2,   // 訊息格式錯誤
        ErrorSeverity::High => 1,     // 配置錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

fn report(e: &PrintError) {
    tracing::error!(
        "modprint failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report(&e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        if e.severity() > ErrorSeverity::Low {
            report(&e);
        }
        let code = exit_code(&e);
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}
