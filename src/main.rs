use clap::Parser;
use relief_alloc::utils::error::ErrorSeverity;
use relief_alloc::utils::{logger, validation::Validate};
use relief_alloc::{
    AllocError, CliConfig, Dispatcher, EngineConfig, JsonFileStore, Plan, RationaleGenerator,
    SnapshotStore,
};

async fn run(config: &CliConfig) -> Result<Plan, AllocError> {
    // 載入引擎配置
    let engine_config = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading engine configuration from: {}", path);
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };
    engine_config.validate()?;

    let mut engine = engine_config.build_engine()?;
    if config.no_rationale {
        engine = engine.with_rationale(RationaleGenerator::disabled());
    }

    let store = JsonFileStore::new(&config.snapshot);
    let resources = store.list_available_resources().await?;
    let zones = store.list_active_zones().await?;
    tracing::info!(
        "📥 Loaded {} available resources and {} active zones from {}",
        resources.len(),
        zones.len(),
        config.snapshot
    );

    let plan = if config.no_rationale {
        engine.allocate(&resources, &zones)
    } else {
        engine.allocate_with_rationale(&resources, &zones).await
    };

    let json = serde_json::to_string_pretty(&plan)?;
    match &config.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            tracing::info!("📁 Plan saved to: {}", path);
        }
        None => println!("{}", json),
    }

    if config.dispatch {
        let report = Dispatcher::new(&store).dispatch(&plan).await?;
        eprintln!("📡 {}", report.message());
    }

    Ok(plan)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting relief-alloc");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(plan) => {
            tracing::info!(
                "✅ Allocation completed: {} allocations, {} unserved zones, score {}",
                plan.allocations.len(),
                plan.unserved_zones.len(),
                plan.total_score
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Allocation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

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
