use clap::Parser;
use violations_etl::core::fetcher::DEFAULT_BASE_URL;
use violations_etl::utils::error::ErrorSeverity;
use violations_etl::utils::{logger, validation::Validate};
use violations_etl::{
    CliConfig, ElasticsearchSink, EnvConfig, IndexState, PaginationDriver, SocrataSource,
    INDEX_NAME,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting violations-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let env = match EnvConfig::from_env().and_then(|env| {
        env.validate()?;
        Ok(env)
    }) {
        Ok(env) => env,
        Err(e) => {
            tracing::error!("❌ Environment configuration invalid: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = SocrataSource::new(DEFAULT_BASE_URL, &env.dataset_id, &env.app_token)?;
    let sink = ElasticsearchSink::new(&env.es_host, INDEX_NAME, &env.es_username, &env.es_password);

    match sink.ensure_index().await {
        Ok(IndexState::Created) => tracing::info!("✅ Created index '{}'", INDEX_NAME),
        Ok(IndexState::AlreadyExists) => tracing::info!("Index '{}' already exists", INDEX_NAME),
        Err(e) => {
            tracing::error!("❌ Index bootstrap failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    }

    let driver = PaginationDriver::new_with_monitoring(source, sink, config.monitor);

    let outcome = match driver
        .resolve_plan(config.page_size, config.num_pages, config.init_offset)
        .await
    {
        Ok(plan) => driver.run(&plan).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ Process complete");
            println!(
                "📊 Pages: {} processed, {} failed loads",
                report.pages_processed, report.pages_failed
            );
            println!(
                "📊 Records: {} fetched, {} indexed, {} dropped",
                report.records_fetched, report.records_indexed, report.records_dropped
            );
            println!("⏱️ Total Time: {:?}", report.elapsed);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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
