//! Console rendering of a `SalesReport`

use rust_decimal::Decimal;
use std::fmt;

use crate::core::money::{format_amount, format_count, format_percent};
use crate::modules::reports::models::SalesReport;

const RULE_WIDTH: usize = 60;

/// Render header, summary, payment breakdown, top products, store
/// performance and footer, in that order
pub fn render(report: &SalesReport) -> String {
    TextReport(report).to_string()
}

/// Console layout of a `SalesReport`
pub struct TextReport<'a>(pub &'a SalesReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "📊 REPORTE DE ANÁLISIS DE VENTAS SUBWAY")?;
        writeln!(f, "{}", rule)?;

        let summary = &report.summary;
        writeln!(f)?;
        writeln!(f, "📈 RESUMEN GENERAL ({})", report.range)?;
        writeln!(f, "• Total de órdenes: {}", format_count(summary.total_orders))?;
        writeln!(f, "• Total de tiendas: {}", summary.total_stores)?;
        writeln!(f, "• Ingresos totales: {}", format_amount(summary.total_revenue))?;
        writeln!(f, "• Promedio por orden: {}", format_amount(summary.avg_order_value))?;
        writeln!(f, "• Días con ventas: {}", summary.days_with_sales)?;

        writeln!(f)?;
        writeln!(f, "💳 DESGLOSE POR MÉTODOS DE PAGO")?;
        for row in &report.payments {
            writeln!(
                f,
                "• {}: {} órdenes, {}",
                row.payment_category,
                format_count(row.order_count),
                format_amount(row.total_amount)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "🏆 TOP 5 PRODUCTOS MÁS VENDIDOS")?;
        for (i, row) in report.top_products.iter().enumerate() {
            writeln!(
                f,
                "{}. {}: {} unidades, {}",
                i + 1,
                row.name,
                format_quantity(row.total_quantity),
                format_amount(row.total_revenue)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "🏪 RENDIMIENTO POR TIENDA")?;
        for row in &report.stores {
            writeln!(
                f,
                "• {}: {} órdenes, {} ({})",
                row.store_name,
                format_count(row.order_count),
                format_amount(row.revenue),
                format_percent(row.percentage)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "✅ Reporte generado exitosamente")?;
        writeln!(f, "{}", rule)
    }
}

/// Whole quantities print without decimals, fractional ones as-is
fn format_quantity(quantity: Decimal) -> String {
    let normalized = quantity.normalize();
    if normalized.fract().is_zero() {
        normalized
            .to_string()
            .parse::<i64>()
            .map(format_count)
            .unwrap_or_else(|_| normalized.to_string())
    } else {
        normalized.to_string()
    }
}
