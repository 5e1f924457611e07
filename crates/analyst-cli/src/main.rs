//! Command-line interface for the equity analysis pipeline

use analyst_core::FactStore;
use analyst_stock::{AnalystConfig, Orchestrator, Report, YahooProvider};
use clap::Parser;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "analyst-cli")]
#[command(about = "Multi-stage equity analysis", long_about = None)]
struct Args {
    /// Stock ticker symbol (e.g., AAPL)
    ticker: String,

    /// Print the full report as JSON instead of the table view
    #[arg(long)]
    json: bool,

    /// Run the analysis stages concurrently
    #[arg(long)]
    parallel: bool,

    /// Calendar days of daily price history to analyze
    #[arg(long, default_value_t = 365)]
    history_days: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let ticker = args.ticker.to_uppercase();

    let config = Arc::new(
        AnalystConfig::builder()
            .daily_history_days(args.history_days)
            .parallel_stages(args.parallel)
            .with_env_api_key()
            .build()?,
    );

    info!("Starting analysis for {ticker}");

    let provider = Arc::new(YahooProvider::new(Arc::clone(&config)));
    let orchestrator = Orchestrator::new(Arc::new(FactStore::new()), provider, config);

    match orchestrator.run_analysis(&ticker).await {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber with default configuration
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_report(report: &Report) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Stage"),
        Cell::new("Score"),
        Cell::new("Highlights"),
    ]);

    table.add_row(vec![
        Cell::new("Technical"),
        Cell::new(format!("{:.1}", report.technical_analysis.score)),
        Cell::new(report.technical_analysis.signals.join("; ")),
    ]);
    table.add_row(vec![
        Cell::new("Fundamental"),
        Cell::new(format!("{:.1}", report.fundamental_analysis.score)),
        Cell::new(report.fundamental_analysis.findings.join("; ")),
    ]);
    table.add_row(vec![
        Cell::new("Sentiment"),
        Cell::new(format!("{:.1}", report.sentiment_analysis.sentiment_score)),
        Cell::new(format!(
            "{} articles, confidence {:.2}",
            report.sentiment_analysis.article_count, report.sentiment_analysis.confidence
        )),
    ]);
    table.add_row(vec![
        Cell::new("Risk"),
        Cell::new(report.risk_assessment.risk_level.to_string()),
        Cell::new(format!(
            "volatility {:.2}%, max drawdown {:.2}%",
            report.risk_assessment.annualized_volatility * 100.0,
            report.risk_assessment.max_drawdown * 100.0
        )),
    ]);

    println!("{table}");
    println!();
    println!(
        "{}: {} (Score: {:.2}/100)",
        report.ticker, report.overall_rating, report.overall_score
    );
    println!();
    println!("{}", report.summary);
}
