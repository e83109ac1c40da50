use clap::Parser;
use move_estimator::config::cli::{Command, OrderArgs, QuoteArgs};
use move_estimator::utils::error::ErrorSeverity;
use move_estimator::utils::{logger, validation::Validate};
use move_estimator::{
    CliConfig, EstimateError, EstimateService, HttpPostalCodeResolver, JsonOrderStore,
    LocalStorage, OrderRegistration, PriceBreakdown, RateConfig, RateTable,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting move-estimator");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(&config).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Estimate failed: {} (Category: {:?}, Severity: {:?})",
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
            ErrorSeverity::Medium => 2, // 可重試
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), EstimateError> {
    tracing::info!("📁 Loading rate table from: {}", config.rates);
    let rates = RateConfig::from_file(&config.rates)?;
    rates.validate()?;
    tracing::info!("✅ Rate table loaded and validated");

    let table = RateTable::from_config(&rates)?;

    match &config.command {
        Command::Regions => {
            list_regions(&table, config.json)?;
        }
        Command::Quote(args) => {
            let resolver = HttpPostalCodeResolver::new(
                rates.postal_endpoint(),
                Duration::from_secs(rates.postal_timeout_seconds()),
            )?;
            let service = EstimateService::new(table, resolver);
            quote(&service, args, config.json).await?;
        }
        Command::Order(args) => {
            let resolver = HttpPostalCodeResolver::new(
                rates.postal_endpoint(),
                Duration::from_secs(rates.postal_timeout_seconds()),
            )?;
            let service = EstimateService::new(table, resolver);
            order(&service, args, config.json).await?;
        }
    }

    Ok(())
}

fn list_regions(table: &RateTable, json: bool) -> Result<(), EstimateError> {
    if json {
        println!("{}", serde_json::to_string_pretty(table.prefectures())?);
        return Ok(());
    }
    for prefecture in table.prefectures() {
        println!("{:>3}  {}", prefecture.id, prefecture.name);
    }
    Ok(())
}

async fn quote(
    service: &EstimateService<RateTable, HttpPostalCodeResolver>,
    args: &QuoteArgs,
    json: bool,
) -> Result<(), EstimateError> {
    let request = args.to_move_request()?;
    let breakdown = service.estimate(&request).await?;
    print_breakdown(&breakdown, json)
}

async fn order(
    service: &EstimateService<RateTable, HttpPostalCodeResolver>,
    args: &OrderArgs,
    json: bool,
) -> Result<(), EstimateError> {
    let form = args.to_user_form();
    form.validate()?;
    let request = form.to_move_request()?;
    let breakdown = service.estimate(&request).await?;

    let storage = LocalStorage::new(args.output_path.clone());
    let registration = OrderRegistration::new(JsonOrderStore::new(storage));
    let record = registration.register(&form, breakdown).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_breakdown(&breakdown, false)?;
        println!(
            "📝 Order {} saved under {}",
            record.customer.customer_id, args.output_path
        );
    }
    Ok(())
}

fn print_breakdown(breakdown: &PriceBreakdown, json: bool) -> Result<(), EstimateError> {
    if json {
        println!("{}", serde_json::to_string_pretty(breakdown)?);
        return Ok(());
    }
    println!("💴 Total:    {:>10}", breakdown.total);
    println!("   Distance: {:>10}", breakdown.distance_component);
    println!("   Cargo:    {:>10}", breakdown.cargo_component);
    println!("   Option:   {:>10}", breakdown.option_component);
    Ok(())
}
