use clap::Parser;
use odi_map::config::toml_config::TomlConfig;
use odi_map::core::{export, ConfigProvider};
use odi_map::utils::error::ErrorSeverity;
use odi_map::utils::{logger, validation::Validate};
use odi_map::{EtlEngine, LocalStorage, SurveyPipeline};

#[derive(Parser)]
#[command(name = "odi-toml")]
#[command(about = "Opportunity scores driven by a TOML analysis file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "odi-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Score and print the outcomes without writing any file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let pipeline = SurveyPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return perform_dry_run(&engine).await;
    }

    match engine.run().await {
        Ok(report) => {
            print!("{}", export::to_table(&report.result.outcomes));
            println!();
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let columns = config.survey_columns();
    let overrides = config.filter_overrides();

    println!("📋 Configuration Summary:");
    println!("  Analysis: {}", config.analysis.name);
    if let Some(description) = &config.analysis.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.input().unwrap_or("(demo survey)"));
    println!("  Columns: volume={:?} channel={:?}", columns.volume, columns.channel);
    if let Some(volume) = &overrides.volume {
        println!("  Volume filter: {}", volume);
    }
    if let Some(channel) = &overrides.channel {
        println!("  Channel filter: {}", channel);
    }
    if let Some(search) = &overrides.search {
        println!("  Search: {:?}", search);
    }
    println!("  Sort: {:?} {:?}", config.sort.key, config.sort.direction);
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    if config.zip_output() {
        println!("  ZIP bundle: enabled");
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

async fn perform_dry_run(
    engine: &EtlEngine<SurveyPipeline<LocalStorage, TomlConfig>>,
) -> anyhow::Result<()> {
    let result = engine.analyze().await?;

    println!("🔍 Dry Run Analysis:");
    println!("  Filtered responses: {}", result.filtered_count);
    println!(
        "  Filters: volume={} channel={}",
        result.filter_state.volume_filter, result.filter_state.channel_filter
    );
    for warning in &result.warnings {
        println!("  ⚠️ {}", warning);
    }
    println!();
    print!("{}", export::to_table(&result.outcomes));
    println!();
    println!("✅ Dry run complete. Run without --dry-run to write the export.");

    Ok(())
}
