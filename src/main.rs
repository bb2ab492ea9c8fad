use anyhow::Context;
use clap::{Parser, Subcommand};
use findash::analysis::{
    calculate_yoy, equity_ratio, find_previous_year, format_percent, free_cash_flow,
    latest_for_company, operating_margin, ChangeClass,
};
use findash::config::LoaderConfig;
use findash::models::{
    CompanyCode, FinancialRecord, MetricDef, StatementType, YoYComparison,
};
use findash::services::{LoadOptions, StatementLoader};
use findash::utils::init_logger;

#[derive(Parser)]
#[command(name = "findash")]
#[command(about = "Financial statement data engine for TEPCO and Chubu Electric dashboards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every statement for both companies and print a summary
    Dashboard {
        /// Company to summarize (TEPCO or CHUBU)
        #[arg(short, long, default_value = "TEPCO")]
        company: String,
    },
    /// Load one statement file and print its records
    Load {
        /// Company code (TEPCO or CHUBU)
        #[arg(short, long)]
        company: String,
        /// Statement type: pl, bs or cf
        #[arg(short, long)]
        statement: String,
        /// Bypass the memoization cache
        #[arg(long)]
        no_cache: bool,
        /// Skip schema validation
        #[arg(long)]
        no_validate: bool,
        /// Emit records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Year-over-year comparison for every metric of one statement
    Yoy {
        /// Company code (TEPCO or CHUBU)
        #[arg(short, long)]
        company: String,
        /// Statement type: pl, bs or cf
        #[arg(short, long)]
        statement: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();
    let config = LoaderConfig::from_env();
    let loader = StatementLoader::new(&config)?;

    match cli.command {
        Commands::Dashboard { company } => {
            let company = parse_company(&company)?;
            run_dashboard(&loader, company).await
        }
        Commands::Load {
            company,
            statement,
            no_cache,
            no_validate,
            json,
        } => {
            let company = parse_company(&company)?;
            let statement = parse_statement(&statement)?;
            let options = LoadOptions {
                cache: !no_cache,
                validate_schema: !no_validate,
            };
            run_load(&loader, company, statement, &options, json).await
        }
        Commands::Yoy { company, statement } => {
            let company = parse_company(&company)?;
            let statement = parse_statement(&statement)?;
            run_yoy(&loader, company, statement).await
        }
    }
}

fn parse_company(value: &str) -> anyhow::Result<CompanyCode> {
    value.parse().map_err(anyhow::Error::msg)
}

fn parse_statement(value: &str) -> anyhow::Result<StatementType> {
    value.parse().map_err(anyhow::Error::msg)
}

/// YoY for one metric of the latest quarter, the way a dashboard badge
/// wants it: absent values default to zero on both sides.
fn metric_yoy(
    records: &[FinancialRecord],
    company: CompanyCode,
    metric: &MetricDef,
) -> Option<YoYComparison> {
    let latest = latest_for_company(records, company)?;
    let previous = find_previous_year(records, &latest.period, company);
    Some(calculate_yoy(
        (metric.get)(latest).unwrap_or(0.0),
        previous.and_then(|record| (metric.get)(record)).unwrap_or(0.0),
        metric.label,
    ))
}

fn badge(change_percent: f64) -> String {
    let arrow = match ChangeClass::from_percent(change_percent) {
        ChangeClass::Positive => "^",
        ChangeClass::Negative => "v",
        ChangeClass::Neutral => "-",
    };
    format!("{:>8} {}", format_percent(change_percent), arrow)
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(number) => format!("{:.2}", number),
        None => "--".to_string(),
    }
}

/// The all-statements fan-out the dashboard view needs. One failure
/// anywhere suppresses the whole view; there is no partial rendering.
async fn run_dashboard(loader: &StatementLoader, company: CompanyCode) -> anyhow::Result<()> {
    let options = LoadOptions::default();

    let (tepco, chubu) = tokio::try_join!(
        loader.load_all(CompanyCode::Tepco, &options),
        loader.load_all(CompanyCode::Chubu, &options),
    )
    .context("dashboard data load failed")?;

    // load_all yields statements in StatementType::ALL order: pl, bs, cf
    let merge = |index: usize| -> Vec<FinancialRecord> {
        tepco[index].iter().chain(chubu[index].iter()).cloned().collect()
    };
    let pl = merge(0);
    let bs = merge(1);
    let cf = merge(2);

    println!();
    println!("{} ({})", company.display_name(), company.as_str());
    if let Some(latest) = latest_for_company(&pl, company) {
        let ended = latest
            .period_end_date()
            .map(|date| date.format("%b %d, %Y").to_string())
            .unwrap_or_else(|| latest.period_end.clone());
        println!("Latest period: {} (ended {})", latest.period, ended);
    }
    println!();

    println!("Key metrics (100M JPY, YoY vs same quarter last year)");
    let key_metrics: [(&[FinancialRecord], StatementType, &str); 4] = [
        (&pl, StatementType::ProfitLoss, "revenue"),
        (&pl, StatementType::ProfitLoss, "net_income"),
        (&bs, StatementType::BalanceSheet, "total_assets"),
        (&cf, StatementType::CashFlow, "operating_cf"),
    ];
    for (records, statement, name) in key_metrics {
        if let Some(metric) = statement.metrics().iter().find(|m| m.name == name) {
            if let Some(yoy) = metric_yoy(records, company, metric) {
                println!(
                    "  {:<18} {:>12.2}  {}",
                    metric.label,
                    yoy.current,
                    badge(yoy.change_percent)
                );
            }
        }
    }
    println!();

    println!("Derived ratios");
    if let Some(latest_bs) = latest_for_company(&bs, company) {
        match equity_ratio(latest_bs) {
            Some(ratio) => println!("  {:<18} {:>11.1}%", "Equity ratio", ratio),
            None => println!("  {:<18} {:>12}", "Equity ratio", "--"),
        }
    }
    if let Some(latest_pl) = latest_for_company(&pl, company) {
        match operating_margin(latest_pl) {
            Some(margin) => println!("  {:<18} {:>11.1}%", "Operating margin", margin),
            None => println!("  {:<18} {:>12}", "Operating margin", "--"),
        }
    }
    if let Some(latest_cf) = latest_for_company(&cf, company) {
        println!("  {:<18} {:>12.2}", "Free cash flow", free_cash_flow(latest_cf));
    }
    println!();

    let status = loader.cache_status();
    println!("Cache: {} entries [{}]", status.size, status.keys.join(", "));

    Ok(())
}

async fn run_load(
    loader: &StatementLoader,
    company: CompanyCode,
    statement: StatementType,
    options: &LoadOptions,
    json: bool,
) -> anyhow::Result<()> {
    let records = loader.load(company, statement, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*records)?);
        return Ok(());
    }

    let metrics = statement.metrics();

    print!("{:<8} {:<8} {:<12}", "company", "period", "period_end");
    for metric in metrics {
        print!(" {:>18}", metric.name);
    }
    println!();

    for record in records.iter() {
        print!("{:<8} {:<8} {:<12}", record.company, record.period, record.period_end);
        for metric in metrics {
            print!(" {:>18}", format_value((metric.get)(record)));
        }
        println!();
    }

    println!();
    println!("{} record(s), {}", records.len(), statement.display_name());
    Ok(())
}

async fn run_yoy(
    loader: &StatementLoader,
    company: CompanyCode,
    statement: StatementType,
) -> anyhow::Result<()> {
    let records = loader.load(company, statement, &LoadOptions::default()).await?;

    let latest = match latest_for_company(&records, company) {
        Some(record) => record,
        None => {
            println!("No records for {}", company.as_str());
            return Ok(());
        }
    };
    println!(
        "{} - {} {} vs prior year",
        company.as_str(),
        statement.display_name(),
        latest.period
    );

    for metric in statement.metrics() {
        if let Some(yoy) = metric_yoy(&records, company, metric) {
            println!(
                "  {:<18} {:>12.2} -> {:>12.2}  {}",
                yoy.label,
                yoy.previous,
                yoy.current,
                badge(yoy.change_percent)
            );
        }
    }
    Ok(())
}
