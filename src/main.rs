use std::path::Path;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use firefly_report::config::Config;
use firefly_report::date_utils::DateRange;
use firefly_report::error::ReportResult;
use firefly_report::services::aggregate::{self, RawReportData};
use firefly_report::services::firefly::FireflyClient;
use firefly_report::{delivery, render};

const CONFIG_FILE: &str = "config.yaml";

#[derive(Parser)]
#[command(
    name = "firefly-report",
    version,
    about = "Generate and deliver a Firefly III monthly email report"
)]
struct Cli {
    /// Write preview.html instead of sending email
    #[arg(long)]
    preview: bool,
}

// The pipeline is strictly sequential; a single-threaded runtime is all
// it needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firefly_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.preview).await {
        tracing::error!(stage = e.stage(), "{e}");
        eprintln!("ERROR ({}): {}", e.stage(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(preview: bool) -> ReportResult<()> {
    let config = Config::load(Path::new(CONFIG_FILE))?;

    let today = chrono::Local::now().date_naive();
    let period = DateRange::previous_month(today);
    tracing::info!(period = %period.display_label(), "Generating report");

    let client = FireflyClient::new(config.api_base(), &config.access_token)?;
    client.verify_connection().await?;

    // Transactions cover the whole year to date so the yearly figures
    // come from the same stream as the monthly ones.
    let raw = RawReportData {
        categories: client.categories().await?,
        transactions: client.transactions(&period.year_to_date()).await?,
        budgets: client.budgets(&period).await?,
        balances: client.account_balances().await?,
    };

    let context = aggregate::build_report(period, &config.currency, &config.currency_symbol, raw)?;

    let html = render::render_report(&context)?;

    if preview {
        let path = delivery::write_preview(&html)?;
        tracing::info!(path = %path.display(), "Preview generated");
        return Ok(());
    }

    let text = render::render_text(&context);
    delivery::send_email(&config, html, text).await?;
    tracing::info!("Email sent");

    if let Some(url) = &config.healthcheck_url {
        delivery::ping_healthcheck(url).await;
    }
    Ok(())
}
