use clap::Parser;
use grocy_frame::config::addon::AddonEnvironment;
use grocy_frame::utils::error::ErrorSeverity;
use grocy_frame::utils::{logger, validation::Validate};
use grocy_frame::{AppConfig, AppError, CliArgs};

fn load_config(args: &CliArgs) -> Result<AppConfig, AppError> {
    // 預設值 < TOML 檔案 < add-on 環境變數 < 命令列參數
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    AddonEnvironment::from_env().apply(&mut config);
    args.apply(&mut config);
    Ok(config)
}

fn exit_code(e: &AppError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: AppError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            // 日誌尚未初始化，直接輸出到 stderr
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose, config.logging.format);

    tracing::info!("🚀 Starting grocy-frame");
    if args.verbose {
        let mut redacted = config.clone();
        redacted.grocy.api_key = "<redacted>".to_string();
        if let Some(auth) = redacted.auth.as_mut() {
            auth.password = "<redacted>".to_string();
        }
        tracing::debug!("Effective config: {:?}", redacted);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(e);
    }
    tracing::info!("✅ Configuration loaded and validated successfully");

    if args.check_config {
        println!("✅ Configuration is valid");
        return Ok(());
    }

    if let Err(e) = grocy_frame::web::serve(config).await {
        fail(e);
    }

    Ok(())
}
