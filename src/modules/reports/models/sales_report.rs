use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::money;
use crate::core::DateRange;

/// Payment method groups used by every breakdown
///
/// Ordering follows declaration order and breaks revenue ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentCategory {
    /// Cash and cash-on-delivery app orders
    Efectivo,
    /// Online-paid delivery app orders
    Apps,
    /// Everything else (cards, transfers, unknown methods)
    Otros,
}

/// Closed method → category table. Methods not listed fall into `Otros`.
pub const PAYMENT_METHOD_CATEGORIES: &[(&str, PaymentCategory)] = &[
    ("cash", PaymentCategory::Efectivo),
    ("cc_pedidosyaft", PaymentCategory::Efectivo),
    ("cc_rappiol", PaymentCategory::Apps),
    ("cc_pedidosyaol", PaymentCategory::Apps),
];

impl PaymentCategory {
    /// Classify a raw `payment_method` value; the only place methods are mapped
    pub fn from_method(method: &str) -> Self {
        PAYMENT_METHOD_CATEGORIES
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, category)| *category)
            .unwrap_or(PaymentCategory::Otros)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentCategory::Efectivo => "Efectivo",
            PaymentCategory::Apps => "Apps",
            PaymentCategory::Otros => "Otros",
        }
    }
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-row aggregate over all orders in a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_stores: i64,
    /// Σ (total - discount)
    pub total_revenue: Decimal,
    /// Mean of (total - discount); zero when there are no orders
    pub avg_order_value: Decimal,
    pub days_with_sales: i64,
}

impl SalesSummary {
    pub fn is_empty(&self) -> bool {
        self.total_orders == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdownRow {
    pub payment_category: PaymentCategory,
    pub order_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySalesRow {
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySalesRow {
    /// Hour of day, 0-23
    pub hour: u32,
    pub orders: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProductRow {
    pub name: String,
    pub fixed_name: Option<String>,
    pub store_name: String,
    pub store_id: String,
    /// Number of line items
    pub times_sold: i64,
    pub total_quantity: Decimal,
    /// Σ (sale_price × quantity)
    pub total_revenue: Decimal,
    /// Unweighted mean of sale_price across line items
    pub avg_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformanceRow {
    pub name: String,
    pub store_id: String,
    pub store_name: String,
    pub times_sold: i64,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
    pub avg_price: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePerformanceRow {
    pub store_id: String,
    pub store_name: String,
    pub order_count: i64,
    pub revenue: Decimal,
    pub avg_order_value: Decimal,
    /// Share of the range's total revenue, 0-100
    pub percentage: Decimal,
}

/// Fill in each row's share of the summed revenue
///
/// A zero grand total yields 0 for every row.
pub fn apply_revenue_shares(rows: &mut [StorePerformanceRow]) {
    let total: Decimal = rows.iter().map(|r| r.revenue).sum();
    for row in rows.iter_mut() {
        row.percentage = money::percentage(row.revenue, total);
    }
}

/// Everything the console report prints, gathered before rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub range: DateRange,
    pub generated_at: DateTime<Utc>,
    pub summary: SalesSummary,
    pub payments: Vec<PaymentBreakdownRow>,
    pub top_products: Vec<TopProductRow>,
    pub stores: Vec<StorePerformanceRow>,
}

impl SalesReport {
    pub fn new(
        range: DateRange,
        summary: SalesSummary,
        payments: Vec<PaymentBreakdownRow>,
        top_products: Vec<TopProductRow>,
        stores: Vec<StorePerformanceRow>,
    ) -> Self {
        Self {
            range,
            generated_at: Utc::now(),
            summary,
            payments,
            top_products,
            stores,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    /// Orders counted across payment categories
    pub fn payment_order_count(&self) -> i64 {
        self.payments.iter().map(|p| p.order_count).sum()
    }
}
