use anyhow::Context;
use salesreport::config::{Config, LogFormat};
use salesreport::{ReportService, SqliteReportRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!("Starting sales report");
    tracing::info!("Database: {}", config.database.path.display());
    tracing::info!("Period: {}", config.report.range);

    let conn = config
        .database
        .open()
        .await
        .context("Failed to open sales database")?;

    let mut service = ReportService::new(SqliteReportRepository::new(conn));
    let result = run(&mut service, &config).await;

    // Release the connection even when a query failed
    let closed = service.close().await;
    settle(result, closed)
}

/// The run error wins over a close error, which is only logged then
fn settle(result: anyhow::Result<()>, closed: salesreport::Result<()>) -> anyhow::Result<()> {
    match (result, closed) {
        (Err(err), Err(close_err)) => {
            tracing::warn!("Failed to close database: {}", close_err);
            Err(err)
        }
        (Ok(()), Err(close_err)) => Err(close_err).context("Failed to close database"),
        (result, Ok(())) => result,
    }
}

async fn run(
    service: &mut ReportService<SqliteReportRepository>,
    config: &Config,
) -> anyhow::Result<()> {
    let range = &config.report.range;

    service
        .generate_report(range)
        .await
        .context("Failed to generate report")?;

    if let Some(dir) = &config.report.chart_dir {
        service
            .export_charts(range, dir, config.report.top_products)
            .await
            .with_context(|| format!("Failed to export charts to {}", dir.display()))?;
    }

    if let Some(path) = &config.report.json_path {
        service
            .export_json(range, path)
            .await
            .with_context(|| format!("Failed to export report to {}", path.display()))?;
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("salesreport={}", config.app.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
