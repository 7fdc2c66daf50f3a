pub mod sales_report;

pub use sales_report::{
    apply_revenue_shares, DailySalesRow, HourlySalesRow, PaymentBreakdownRow, PaymentCategory,
    ProductPerformanceRow, SalesReport, SalesSummary, StorePerformanceRow, TopProductRow,
    PAYMENT_METHOD_CATEGORIES,
};
