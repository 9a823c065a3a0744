use anyhow::Context;
use cartographie::domain::ports::ConfigProvider;
use cartographie::utils::error::{AppError, ErrorSeverity};
use cartographie::utils::{logger, validation::Validate};
use cartographie::{CliConfig, MapboxDirections, RoutePipeline, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::info!("Starting cartographie");

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let file_config = match &config.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(c) => {
                tracing::debug!("Loaded directions settings from {}", path);
                Some(c)
            }
            Err(e) => exit_with(&e),
        },
        None => None,
    };

    // 命令列參數優先於設定檔
    let settings = config.overlay(file_config.as_ref());
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }
    let profile = settings.profile();

    let pipeline = match build_pipeline(&settings) {
        Ok(p) => p,
        Err(e) => exit_with(&e),
    };

    match pipeline.plan(&config.start, &config.end, profile).await {
        Ok(path) => {
            let json = serde_json::to_string_pretty(&path)?;
            match &config.output {
                Some(output) => {
                    std::fs::write(output, json)
                        .with_context(|| format!("writing route to {}", output))?;
                    tracing::info!("📁 Route saved to: {}", output);
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Err(e) => {
            // 失敗時不畫路線，只顯示訊息
            let e = AppError::from(e);
            tracing::error!(
                "❌ No route shown: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e)
        }
    }
}

fn build_pipeline<C: ConfigProvider>(config: &C) -> cartographie::Result<RoutePipeline<MapboxDirections>> {
    let client = MapboxDirections::from_config(config)?;
    Ok(RoutePipeline::with_retry(client, config.retry_policy()))
}

fn exit_with(e: &AppError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
