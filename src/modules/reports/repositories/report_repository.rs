use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use tracing::debug;

use crate::core::{money, AppError, DateRange, Result, SalesConnection};
use crate::modules::reports::models::{
    DailySalesRow, HourlySalesRow, PaymentBreakdownRow, PaymentCategory, ProductPerformanceRow,
    SalesSummary, StorePerformanceRow, TopProductRow,
};

/// Repository for sales aggregation queries
///
/// Every method is read-only and filters orders by
/// `DATE(order_date) BETWEEN from AND to`. Rows come back in the order the
/// SQL defines. Store revenue shares are not computed here.
#[async_trait]
pub trait ReportRepository: Send {
    /// Orders, stores, revenue, average ticket and active days
    async fn sales_summary(&mut self, range: &DateRange) -> Result<SalesSummary>;

    /// Order count and revenue per payment category, revenue descending
    async fn payment_breakdown(&mut self, range: &DateRange) -> Result<Vec<PaymentBreakdownRow>>;

    /// One row per day with sales, date ascending
    async fn daily_sales(&mut self, range: &DateRange) -> Result<Vec<DailySalesRow>>;

    /// One row per hour of day with sales, hour ascending
    async fn hourly_sales(&mut self, range: &DateRange) -> Result<Vec<HourlySalesRow>>;

    /// Best selling products per store, revenue descending, at most `limit` rows
    async fn top_products(&mut self, range: &DateRange, limit: u32) -> Result<Vec<TopProductRow>>;

    /// Per-store figures for one product name (matched on name or fixed_name)
    async fn product_performance(
        &mut self,
        range: &DateRange,
        product: &str,
    ) -> Result<Vec<ProductPerformanceRow>>;

    /// Per-store order count and revenue, revenue descending, `percentage` left at zero
    async fn store_performance(&mut self, range: &DateRange) -> Result<Vec<StorePerformanceRow>>;

    /// Release the underlying connection
    async fn close(&mut self) -> Result<()>;
}

// Every `sale_orders` row is one order. `linisco_id` is only unique per
// store, so order counts are row counts and category, day and store counts
// always add up to the summary total.
const ORDER_REVENUE: &str = "(so.total - so.discount)";

/// Fold per-method totals into category rows, revenue descending
///
/// Ties keep the category declaration order so the output is stable.
fn group_by_category(records: Vec<PaymentMethodRecord>) -> Vec<PaymentBreakdownRow> {
    let mut rows: Vec<PaymentBreakdownRow> = Vec::new();

    for record in records {
        let category = PaymentCategory::from_method(record.payment_method.as_deref().unwrap_or(""));
        let amount = money::from_real(Some(record.total_amount));

        match rows.iter_mut().find(|r| r.payment_category == category) {
            Some(row) => {
                row.order_count += record.order_count;
                row.total_amount += amount;
            }
            None => rows.push(PaymentBreakdownRow {
                payment_category: category,
                order_count: record.order_count,
                total_amount: amount,
            }),
        }
    }

    rows.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.payment_category.cmp(&b.payment_category))
    });
    rows
}

#[derive(Debug, FromRow)]
struct SummaryRecord {
    total_orders: i64,
    total_stores: i64,
    total_revenue: f64,
    avg_order_value: Option<f64>,
    days_with_sales: i64,
}

#[derive(Debug, FromRow)]
struct PaymentMethodRecord {
    payment_method: Option<String>,
    order_count: i64,
    total_amount: f64,
}

#[derive(Debug, FromRow)]
struct SeriesRecord {
    bucket: Option<String>,
    orders: i64,
    revenue: f64,
}

#[derive(Debug, FromRow)]
struct TopProductRecord {
    name: String,
    fixed_name: Option<String>,
    store_name: String,
    store_id: String,
    times_sold: i64,
    total_quantity: f64,
    total_revenue: f64,
    avg_price: Option<f64>,
}

#[derive(Debug, FromRow)]
struct ProductPerformanceRecord {
    name: String,
    store_id: String,
    store_name: String,
    times_sold: i64,
    total_quantity: f64,
    total_revenue: f64,
    avg_price: Option<f64>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

#[derive(Debug, FromRow)]
struct StoreRecord {
    store_id: String,
    store_name: String,
    order_count: i64,
    revenue: f64,
    avg_order_value: Option<f64>,
}

/// SQLite implementation over a single `SalesConnection`
pub struct SqliteReportRepository {
    conn: SalesConnection,
}

impl SqliteReportRepository {
    pub fn new(conn: SalesConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &SalesConnection {
        &self.conn
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn sales_summary(&mut self, range: &DateRange) -> Result<SalesSummary> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total_orders,
                COUNT(DISTINCT s.store_id) AS total_stores,
                TOTAL{rev} AS total_revenue,
                AVG{rev} AS avg_order_value,
                COUNT(DISTINCT DATE(so.order_date)) AS days_with_sales
            FROM sale_orders so
            JOIN stores s ON so.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
            "#,
            rev = ORDER_REVENUE
        );

        let record = sqlx::query_as::<_, SummaryRecord>(&sql)
            .bind(range.from())
            .bind(range.to())
            .fetch_one(self.conn.handle()?)
            .await?;

        debug!("sales_summary {}: {} orders", range, record.total_orders);

        Ok(SalesSummary {
            total_orders: record.total_orders,
            total_stores: record.total_stores,
            total_revenue: money::from_real(Some(record.total_revenue)),
            avg_order_value: money::from_real(record.avg_order_value),
            days_with_sales: record.days_with_sales,
        })
    }

    async fn payment_breakdown(&mut self, range: &DateRange) -> Result<Vec<PaymentBreakdownRow>> {
        let sql = format!(
            r#"
            SELECT
                so.payment_method AS payment_method,
                COUNT(*) AS order_count,
                TOTAL{rev} AS total_amount
            FROM sale_orders so
            JOIN stores s ON so.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
            GROUP BY so.payment_method
            "#,
            rev = ORDER_REVENUE
        );

        let records = sqlx::query_as::<_, PaymentMethodRecord>(&sql)
            .bind(range.from())
            .bind(range.to())
            .fetch_all(self.conn.handle()?)
            .await?;

        let rows = group_by_category(records);
        debug!("payment_breakdown {}: {} categories", range, rows.len());

        Ok(rows)
    }

    async fn daily_sales(&mut self, range: &DateRange) -> Result<Vec<DailySalesRow>> {
        let sql = format!(
            r#"
            SELECT
                DATE(so.order_date) AS bucket,
                COUNT(*) AS orders,
                TOTAL{rev} AS revenue
            FROM sale_orders so
            JOIN stores s ON so.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
            GROUP BY DATE(so.order_date)
            ORDER BY bucket
            "#,
            rev = ORDER_REVENUE
        );

        let records = sqlx::query_as::<_, SeriesRecord>(&sql)
            .bind(range.from())
            .bind(range.to())
            .fetch_all(self.conn.handle()?)
            .await?;

        debug!("daily_sales {}: {} days", range, records.len());

        records
            .into_iter()
            .map(|r| {
                let raw = r.bucket.unwrap_or_default();
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|e| AppError::decode("date", format!("'{}': {}", raw, e)))?;
                Ok(DailySalesRow {
                    date,
                    orders: r.orders,
                    revenue: money::from_real(Some(r.revenue)),
                })
            })
            .collect()
    }

    async fn hourly_sales(&mut self, range: &DateRange) -> Result<Vec<HourlySalesRow>> {
        let sql = format!(
            r#"
            SELECT
                strftime('%H', so.order_date) AS bucket,
                COUNT(*) AS orders,
                TOTAL{rev} AS revenue
            FROM sale_orders so
            JOIN stores s ON so.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
            GROUP BY strftime('%H', so.order_date)
            ORDER BY bucket
            "#,
            rev = ORDER_REVENUE
        );

        let records = sqlx::query_as::<_, SeriesRecord>(&sql)
            .bind(range.from())
            .bind(range.to())
            .fetch_all(self.conn.handle()?)
            .await?;

        debug!("hourly_sales {}: {} hours", range, records.len());

        records
            .into_iter()
            .map(|r| {
                let raw = r.bucket.unwrap_or_default();
                let hour = raw
                    .parse::<u32>()
                    .map_err(|e| AppError::decode("hour", format!("'{}': {}", raw, e)))?;
                Ok(HourlySalesRow {
                    hour,
                    orders: r.orders,
                    revenue: money::from_real(Some(r.revenue)),
                })
            })
            .collect()
    }

    async fn top_products(&mut self, range: &DateRange, limit: u32) -> Result<Vec<TopProductRow>> {
        let records = sqlx::query_as::<_, TopProductRecord>(
            r#"
            SELECT
                COALESCE(sp.name, '') AS name,
                sp.fixed_name AS fixed_name,
                COALESCE(s.store_name, CAST(s.store_id AS TEXT)) AS store_name,
                CAST(s.store_id AS TEXT) AS store_id,
                COUNT(*) AS times_sold,
                TOTAL(sp.quantity) AS total_quantity,
                TOTAL(sp.sale_price * sp.quantity) AS total_revenue,
                AVG(sp.sale_price) AS avg_price
            FROM sale_products sp
            JOIN sale_orders so ON sp.id_sale_order = so.linisco_id
            JOIN stores s ON sp.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
            GROUP BY sp.name, sp.fixed_name, s.store_id, s.store_name
            ORDER BY total_revenue DESC
            LIMIT ?
            "#,
        )
        .bind(range.from())
        .bind(range.to())
        .bind(i64::from(limit))
        .fetch_all(self.conn.handle()?)
        .await?;

        debug!("top_products {} (limit {}): {} rows", range, limit, records.len());

        Ok(records
            .into_iter()
            .map(|r| TopProductRow {
                name: r.name,
                fixed_name: r.fixed_name,
                store_name: r.store_name,
                store_id: r.store_id,
                times_sold: r.times_sold,
                total_quantity: money::from_real(Some(r.total_quantity)),
                total_revenue: money::from_real(Some(r.total_revenue)),
                avg_price: money::from_real(r.avg_price),
            })
            .collect())
    }

    async fn product_performance(
        &mut self,
        range: &DateRange,
        product: &str,
    ) -> Result<Vec<ProductPerformanceRow>> {
        let records = sqlx::query_as::<_, ProductPerformanceRecord>(
            r#"
            SELECT
                COALESCE(sp.name, '') AS name,
                CAST(s.store_id AS TEXT) AS store_id,
                COALESCE(s.store_name, CAST(s.store_id AS TEXT)) AS store_name,
                COUNT(*) AS times_sold,
                TOTAL(sp.quantity) AS total_quantity,
                TOTAL(sp.sale_price * sp.quantity) AS total_revenue,
                AVG(sp.sale_price) AS avg_price,
                CAST(MIN(sp.sale_price) AS REAL) AS min_price,
                CAST(MAX(sp.sale_price) AS REAL) AS max_price
            FROM sale_products sp
            JOIN sale_orders so ON sp.id_sale_order = so.linisco_id
            JOIN stores s ON sp.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
              AND (LOWER(sp.name) = LOWER(?) OR LOWER(sp.fixed_name) = LOWER(?))
            GROUP BY sp.name, s.store_id, s.store_name
            ORDER BY total_revenue DESC
            "#,
        )
        .bind(range.from())
        .bind(range.to())
        .bind(product)
        .bind(product)
        .fetch_all(self.conn.handle()?)
        .await?;

        debug!("product_performance '{}' {}: {} rows", product, range, records.len());

        Ok(records
            .into_iter()
            .map(|r| ProductPerformanceRow {
                name: r.name,
                store_id: r.store_id,
                store_name: r.store_name,
                times_sold: r.times_sold,
                total_quantity: money::from_real(Some(r.total_quantity)),
                total_revenue: money::from_real(Some(r.total_revenue)),
                avg_price: money::from_real(r.avg_price),
                min_price: money::from_real(r.min_price),
                max_price: money::from_real(r.max_price),
            })
            .collect())
    }

    async fn store_performance(&mut self, range: &DateRange) -> Result<Vec<StorePerformanceRow>> {
        let sql = format!(
            r#"
            SELECT
                CAST(s.store_id AS TEXT) AS store_id,
                COALESCE(s.store_name, CAST(s.store_id AS TEXT)) AS store_name,
                COUNT(*) AS order_count,
                TOTAL{rev} AS revenue,
                AVG{rev} AS avg_order_value
            FROM sale_orders so
            JOIN stores s ON so.store_id = s.store_id
            WHERE DATE(so.order_date) BETWEEN ? AND ?
            GROUP BY s.store_id, s.store_name
            ORDER BY revenue DESC
            "#,
            rev = ORDER_REVENUE
        );

        let records = sqlx::query_as::<_, StoreRecord>(&sql)
            .bind(range.from())
            .bind(range.to())
            .fetch_all(self.conn.handle()?)
            .await?;

        debug!("store_performance {}: {} stores", range, records.len());

        Ok(records
            .into_iter()
            .map(|r| StorePerformanceRow {
                store_id: r.store_id,
                store_name: r.store_name,
                order_count: r.order_count,
                revenue: money::from_real(Some(r.revenue)),
                avg_order_value: money::from_real(r.avg_order_value),
                percentage: Decimal::ZERO,
            })
            .collect())
    }

    async fn close(&mut self) -> Result<()> {
        self.conn.close().await
    }
}
