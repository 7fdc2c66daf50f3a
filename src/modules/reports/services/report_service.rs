use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::{AppError, DateRange, Result};
use crate::modules::reports::models::{
    apply_revenue_shares, DailySalesRow, HourlySalesRow, PaymentBreakdownRow,
    ProductPerformanceRow, SalesReport, SalesSummary, StorePerformanceRow, TopProductRow,
};
use crate::modules::reports::presenters::charts::{self, Chart, CHART_SIZE};
use crate::modules::reports::presenters::{json, text_report};
use crate::modules::reports::repositories::ReportRepository;

/// Row cap used when the caller does not pass one
pub const DEFAULT_TOP_PRODUCTS: u32 = 10;

/// Row cap of the products section in the console report
pub const REPORT_TOP_PRODUCTS: u32 = 5;

/// Service for sales queries and report assembly
///
/// Owns the repository (and through it the single connection). Methods take
/// `&mut self`, so one caller drives one query at a time.
pub struct ReportService<R: ReportRepository> {
    report_repo: R,
}

impl<R: ReportRepository> ReportService<R> {
    /// Create a new report service
    pub fn new(report_repo: R) -> Self {
        Self { report_repo }
    }

    pub fn repository(&self) -> &R {
        &self.report_repo
    }

    pub async fn sales_summary(&mut self, range: &DateRange) -> Result<SalesSummary> {
        let summary = self.report_repo.sales_summary(range).await?;
        if summary.is_empty() {
            warn!("No orders found for period {}", range);
        }
        Ok(summary)
    }

    pub async fn payment_breakdown(&mut self, range: &DateRange) -> Result<Vec<PaymentBreakdownRow>> {
        self.report_repo.payment_breakdown(range).await
    }

    pub async fn daily_sales(&mut self, range: &DateRange) -> Result<Vec<DailySalesRow>> {
        self.report_repo.daily_sales(range).await
    }

    pub async fn hourly_sales(&mut self, range: &DateRange) -> Result<Vec<HourlySalesRow>> {
        self.report_repo.hourly_sales(range).await
    }

    /// Top products by revenue; `None` means `DEFAULT_TOP_PRODUCTS`
    pub async fn top_products(
        &mut self,
        range: &DateRange,
        limit: Option<u32>,
    ) -> Result<Vec<TopProductRow>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS);
        if limit == 0 {
            return Err(AppError::validation("top products limit must be greater than 0"));
        }
        self.report_repo.top_products(range, limit).await
    }

    pub async fn product_performance(
        &mut self,
        range: &DateRange,
        product: &str,
    ) -> Result<Vec<ProductPerformanceRow>> {
        let product = product.trim();
        if product.is_empty() {
            return Err(AppError::validation("product name must not be empty"));
        }

        let rows = self.report_repo.product_performance(range, product).await?;
        if rows.is_empty() {
            warn!("No sales of '{}' in period {}", product, range);
        }
        Ok(rows)
    }

    /// Per-store figures with each store's share of total revenue
    pub async fn store_performance(&mut self, range: &DateRange) -> Result<Vec<StorePerformanceRow>> {
        let mut rows = self.report_repo.store_performance(range).await?;
        apply_revenue_shares(&mut rows);
        Ok(rows)
    }

    /// Run the report queries in order and gather their results
    ///
    /// Summary, payment breakdown, top 5 products and store performance are
    /// fetched one after the other. The first failure aborts the whole report.
    pub async fn build_report(&mut self, range: &DateRange) -> Result<SalesReport> {
        info!("Generating sales report for {}", range);

        let summary = self.sales_summary(range).await?;
        let payments = self.payment_breakdown(range).await?;
        let top_products = self.top_products(range, Some(REPORT_TOP_PRODUCTS)).await?;
        let stores = self.store_performance(range).await?;

        let report = SalesReport::new(*range, summary, payments, top_products, stores);

        info!(
            "Sales report ready: {} orders, {} payment categories, {} stores",
            report.summary.total_orders,
            report.payments.len(),
            report.stores.len()
        );

        Ok(report)
    }

    /// Render the full text report into `out`
    ///
    /// Nothing is written unless every query succeeded.
    pub async fn write_report<W: Write>(&mut self, range: &DateRange, out: &mut W) -> Result<()> {
        let report = self.build_report(range).await?;
        out.write_all(text_report::render(&report).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Print the full text report to standard output
    pub async fn generate_report(&mut self, range: &DateRange) -> Result<()> {
        let report = self.build_report(range).await?;
        let text = text_report::render(&report);

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Save the assembled report as pretty JSON, creating parent directories
    pub async fn export_json(&mut self, range: &DateRange, path: &Path) -> Result<SalesReport> {
        let report = self.build_report(range).await?;
        let body = json::render(&report)?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(path, body).await?;

        info!("Report saved to {}", path.display());
        Ok(report)
    }

    /// Draw the payment, daily, store and top products charts as SVG files
    /// in `dir`, creating it if needed
    ///
    /// All queries run before any file is written. Returns the written paths.
    pub async fn export_charts(
        &mut self,
        range: &DateRange,
        dir: &Path,
        top_products: u32,
    ) -> Result<Vec<PathBuf>> {
        let products = self.top_products(range, Some(top_products)).await?;
        let payments = self.payment_breakdown(range).await?;
        let daily = self.daily_sales(range).await?;
        let stores = self.store_performance(range).await?;

        let rendered: Vec<(&str, Chart)> = vec![
            ("metodos_pago.svg", charts::payment_breakdown_chart(&payments)),
            ("ventas_diarias.svg", charts::daily_sales_chart(&daily)),
            ("tiendas.svg", charts::store_performance_chart(&stores)),
            ("top_productos.svg", charts::top_products_chart(&products)),
        ];

        tokio::fs::create_dir_all(dir).await?;

        let mut written = Vec::with_capacity(rendered.len());
        for (file, chart) in rendered {
            let path = dir.join(file);
            tokio::fs::write(&path, chart.to_svg(CHART_SIZE)?).await?;
            info!("Chart '{}' saved to {}", chart.title(), path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Close the underlying connection; later queries fail with `ClosedConnection`
    pub async fn close(&mut self) -> Result<()> {
        self.report_repo.close().await
    }
}
