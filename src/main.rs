use clap::Parser;
use rotation_etl::config::toml_config::TomlConfig;
use rotation_etl::utils::error::ErrorSeverity;
use rotation_etl::utils::{logger, validation::Validate};
use rotation_etl::{CliConfig, EtlEngine, LocalStorage, RotationPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting rotation-etl");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, cli.dry_run);

    let storage = LocalStorage::new(config.output.path.clone());
    let pipeline = RotationPipeline::new(storage, config);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        match pipeline.select_source() {
            Ok(export) => println!("  Would read: {}", export.path.display()),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Rotation build completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Rotation build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.source.root);
    println!("  File pattern: {}", config.source.file_pattern);
    println!(
        "  List: {} = {}",
        config.rotation.list_field, config.rotation.list_id
    );
    println!(
        "  Name from: {} (type tag {})",
        config.rotation.reference_field, config.rotation.type_tag
    );
    println!(
        "  Rollover: {} {}",
        config.document.rollover_time, config.document.timezone
    );
    println!("  Output: {}", config.output_file());

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
