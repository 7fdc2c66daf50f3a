//! Integration tests for the aggregation queries against a real SQLite file

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::NaiveDate;
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salesreport::reports::models::PaymentCategory;
use salesreport::{AppError, DateRange};

fn range(from: &str, to: &str) -> DateRange {
    DateRange::parse(from, to).unwrap()
}

fn january() -> DateRange {
    range("2025-01-01", "2025-01-31")
}

/// Two stores with orders on several days plus a few line items
async fn seed_two_stores(db: &mut TestDatabase) {
    db.insert_store("100", "Centro").await;
    db.insert_store("200", "Norte").await;

    db.insert_order(1, "100", "2025-01-03 09:15:00", "cash", 40.0, 0.0).await;
    db.insert_order(2, "100", "2025-01-03 13:40:00", "cc_pedidosyaol", 60.0, 0.0).await;
    db.insert_order(3, "200", "2025-01-02 13:05:00", "debit", 200.0, 0.0).await;
    db.insert_order(4, "200", "2025-01-15 20:00:00", "cc_pedidosyaft", 110.0, 10.0).await;

    db.insert_line_item(1, "100", "Sub Pollo", Some("SUB POLLO 15"), 1, 10.0).await;
    db.insert_line_item(1, "100", "Sub Pollo", Some("SUB POLLO 15"), 3, 20.0).await;
    db.insert_line_item(2, "100", "Gaseosa", None, 2, 5.0).await;
    db.insert_line_item(3, "200", "Sub Pollo", Some("SUB POLLO 15"), 5, 30.0).await;
    db.insert_line_item(3, "200", "Galleta", None, 10, 2.0).await;
    db.insert_line_item(4, "200", "Ensalada", None, 1, 100.0).await;
}

#[tokio::test]
async fn test_payment_breakdown_scenario() {
    let mut db = TestDatabase::new().await;
    seed_january_payments(&mut db).await;
    let mut service = db.service().await;

    let rows = service.payment_breakdown(&january()).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].payment_category, PaymentCategory::Efectivo);
    assert_eq!(rows[0].order_count, 2);
    assert_eq!(rows[0].total_amount, dec!(30));
    assert_eq!(rows[1].payment_category, PaymentCategory::Apps);
    assert_eq!(rows[1].order_count, 1);
    assert_eq!(rows[1].total_amount, dec!(25));

    let summary = service.sales_summary(&january()).await.unwrap();
    assert_eq!(summary.total_revenue, dec!(55));
    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.total_stores, 1);
    assert_eq!(summary.days_with_sales, 3);
}

#[tokio::test]
async fn test_empty_range_summary() {
    let mut db = TestDatabase::new().await;
    seed_january_payments(&mut db).await;
    let mut service = db.service().await;

    let summary = service
        .sales_summary(&range("2024-06-01", "2024-06-30"))
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 0);
    assert_eq!(summary.days_with_sales, 0);
    assert_eq!(summary.total_revenue, Decimal::ZERO);
    assert_eq!(summary.avg_order_value, Decimal::ZERO);
    assert!(summary.is_empty());

    let payments = service
        .payment_breakdown(&range("2024-06-01", "2024-06-30"))
        .await
        .unwrap();
    assert!(payments.is_empty());
}

#[tokio::test]
async fn test_payment_counts_match_summary() {
    let mut db = TestDatabase::new().await;
    seed_two_stores(&mut db).await;
    let mut service = db.service().await;

    let summary = service.sales_summary(&january()).await.unwrap();
    let payments = service.payment_breakdown(&january()).await.unwrap();

    let counted: i64 = payments.iter().map(|p| p.order_count).sum();
    assert_eq!(counted, summary.total_orders);

    // debit is not in the mapping table
    let otros = payments
        .iter()
        .find(|p| p.payment_category == PaymentCategory::Otros)
        .expect("Otros category present");
    assert_eq!(otros.order_count, 1);
    assert_eq!(otros.total_amount, dec!(200));

    assert!(payments
        .windows(2)
        .all(|w| w[0].total_amount >= w[1].total_amount));
}

#[tokio::test]
async fn test_counts_agree_when_order_ids_repeat() {
    let mut db = TestDatabase::with_schema(SCHEMA_WITHOUT_ORDER_KEY).await;
    db.insert_store("100", "Centro").await;
    db.insert_store("200", "Norte").await;
    // Order ids are per store, so the same id shows up in both stores
    db.insert_order(1, "100", "2025-01-05 12:00:00", "cash", 10.0, 0.0).await;
    db.insert_order(1, "200", "2025-01-05 12:30:00", "cash", 20.0, 0.0).await;
    db.insert_order(2, "200", "2025-01-06 09:00:00", "cc_rappiol", 30.0, 0.0).await;
    db.insert_order(2, "200", "2025-01-06 09:10:00", "debit", 40.0, 0.0).await;
    let mut service = db.service().await;

    let summary = service.sales_summary(&january()).await.unwrap();
    let payments = service.payment_breakdown(&january()).await.unwrap();
    let stores = service.store_performance(&january()).await.unwrap();
    let daily = service.daily_sales(&january()).await.unwrap();
    let hourly = service.hourly_sales(&january()).await.unwrap();

    assert_eq!(summary.total_orders, 4);
    assert_eq!(summary.total_revenue, dec!(100));
    assert_eq!(summary.avg_order_value, dec!(25));
    assert_eq!(payments.iter().map(|p| p.order_count).sum::<i64>(), 4);
    assert_eq!(stores.iter().map(|s| s.order_count).sum::<i64>(), 4);
    assert_eq!(daily.iter().map(|d| d.orders).sum::<i64>(), 4);
    assert_eq!(hourly.iter().map(|h| h.orders).sum::<i64>(), 4);

    let norte = stores.iter().find(|s| s.store_id == "200").unwrap();
    assert_eq!(norte.order_count, 3);
    assert_eq!(norte.avg_order_value, dec!(30));
}

#[tokio::test]
async fn test_range_bounds_are_inclusive_days() {
    let mut db = TestDatabase::new().await;
    db.insert_store("100", "Centro").await;
    db.insert_order(1, "100", "2024-12-31 23:59:59", "cash", 1.0, 0.0).await;
    db.insert_order(2, "100", "2025-01-01 00:00:00", "cash", 2.0, 0.0).await;
    db.insert_order(3, "100", "2025-01-31 23:59:59", "cash", 4.0, 0.0).await;
    db.insert_order(4, "100", "2025-02-01 00:00:00", "cash", 8.0, 0.0).await;
    let mut service = db.service().await;

    let summary = service.sales_summary(&january()).await.unwrap();

    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_revenue, dec!(6));
}

#[tokio::test]
async fn test_daily_sales_ordered_by_date() {
    let mut db = TestDatabase::new().await;
    seed_two_stores(&mut db).await;
    let mut service = db.service().await;

    let rows = service.daily_sales(&january()).await.unwrap();

    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        ]
    );
    assert!(dates.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(rows[1].orders, 2);
    assert_eq!(rows[1].revenue, dec!(100));
    assert_eq!(rows[2].revenue, dec!(100));
}

#[tokio::test]
async fn test_hourly_sales() {
    let mut db = TestDatabase::new().await;
    seed_two_stores(&mut db).await;
    let mut service = db.service().await;

    let rows = service.hourly_sales(&january()).await.unwrap();

    let hours: Vec<u32> = rows.iter().map(|r| r.hour).collect();
    assert_eq!(hours, vec![9, 13, 20]);
    assert_eq!(rows[1].orders, 2);
    assert_eq!(rows[1].revenue, dec!(260));
}

#[tokio::test]
async fn test_top_products_limit_and_order() {
    let mut db = TestDatabase::new().await;
    seed_two_stores(&mut db).await;
    let mut service = db.service().await;

    let rows = service.top_products(&january(), Some(3)).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows
        .windows(2)
        .all(|w| w[0].total_revenue >= w[1].total_revenue));

    // Same product in two stores stays two rows
    assert_eq!(rows[0].name, "Sub Pollo");
    assert_eq!(rows[0].store_id, "200");
    assert_eq!(rows[0].total_revenue, dec!(150));
    assert_eq!(rows[1].name, "Ensalada");
    assert_eq!(rows[2].name, "Sub Pollo");
    assert_eq!(rows[2].store_name, "Centro");

    let all = service.top_products(&january(), None).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_top_products_average_is_unweighted() {
    let mut db = TestDatabase::new().await;
    seed_two_stores(&mut db).await;
    let mut service = db.service().await;

    let rows = service.top_products(&january(), None).await.unwrap();
    let centro_sub = rows
        .iter()
        .find(|r| r.name == "Sub Pollo" && r.store_id == "100")
        .unwrap();

    // Line items (10 × 1) and (20 × 3): simple mean 15, not 17.5
    assert_eq!(centro_sub.times_sold, 2);
    assert_eq!(centro_sub.total_quantity, dec!(4));
    assert_eq!(centro_sub.total_revenue, dec!(70));
    assert_eq!(centro_sub.avg_price, dec!(15));
    assert_eq!(centro_sub.fixed_name.as_deref(), Some("SUB POLLO 15"));
}

#[tokio::test]
async fn test_top_products_zero_limit_rejected() {
    let db = TestDatabase::new().await;
    let mut service = db.service().await;

    let err = service.top_products(&january(), Some(0)).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_product_performance() {
    let mut db = TestDatabase::new().await;
    seed_two_stores(&mut db).await;
    let mut service = db.service().await;

    let rows = service
        .product_performance(&january(), "sub pollo 15")
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].store_id, "200");
    assert_eq!(rows[1].store_id, "100");
    assert_eq!(rows[1].min_price, dec!(10));
    assert_eq!(rows[1].max_price, dec!(20));
    assert_eq!(rows[1].avg_price, dec!(15));

    let none = service.product_performance(&january(), "Pizza").await.unwrap();
    assert!(none.is_empty());

    let err = service.product_performance(&january(), "  ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_store_performance_shares() {
    let mut db = TestDatabase::new().await;
    db.insert_store("1", "Chica").await;
    db.insert_store("2", "Grande").await;
    db.insert_order(1, "1", "2025-01-10 10:00:00", "cash", 100.0, 0.0).await;
    db.insert_order(2, "2", "2025-01-10 11:00:00", "cash", 200.0, 0.0).await;
    db.insert_order(3, "2", "2025-01-11 11:00:00", "cash", 100.0, 0.0).await;
    let mut service = db.service().await;

    let rows = service.store_performance(&january()).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].store_name, "Grande");
    assert_eq!(rows[0].revenue, dec!(300));
    assert_eq!(rows[0].order_count, 2);
    assert_eq!(rows[0].avg_order_value, dec!(150));
    assert_eq!(rows[0].percentage, dec!(75));
    assert_eq!(rows[1].store_name, "Chica");
    assert_eq!(rows[1].percentage, dec!(25));

    let total: Decimal = rows.iter().map(|r| r.percentage).sum();
    assert_eq!(total, dec!(100));
}

#[tokio::test]
async fn test_store_performance_zero_revenue() {
    let mut db = TestDatabase::new().await;
    db.insert_store("1", "Promo").await;
    db.insert_order(1, "1", "2025-01-10 10:00:00", "cash", 10.0, 10.0).await;
    let mut service = db.service().await;

    let rows = service.store_performance(&january()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].revenue, Decimal::ZERO);
    assert_eq!(rows[0].percentage, Decimal::ZERO);
}

#[tokio::test]
async fn test_orders_without_store_are_excluded() {
    let mut db = TestDatabase::new().await;
    seed_january_payments(&mut db).await;
    db.insert_order(9, "999", "2025-01-12 10:00:00", "cash", 500.0, 0.0).await;
    let mut service = db.service().await;

    let summary = service.sales_summary(&january()).await.unwrap();

    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.total_revenue, dec!(55));
}

#[test]
fn test_unparseable_dates_rejected() {
    assert!(matches!(
        DateRange::parse("2025-02-30", "2025-03-01"),
        Err(AppError::InvalidRange(_))
    ));
    assert!(matches!(
        DateRange::parse("01/01/2025", "2025-03-01"),
        Err(AppError::InvalidRange(_))
    ));
    assert!(matches!(
        DateRange::parse("2025-03-01", "2025-01-01"),
        Err(AppError::InvalidRange(_))
    ));
}
