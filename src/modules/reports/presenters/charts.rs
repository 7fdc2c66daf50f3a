//! SVG charts for payment, daily, store and product series
//!
//! Charts are drawn with plotters on any `DrawingBackend`; `to_svg` covers
//! the SVG backend the report exports use.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::ops::Range;

use crate::core::money::{format_amount, format_count, format_percent, percentage};
use crate::core::{AppError, Result};
use crate::modules::reports::models::{
    DailySalesRow, PaymentBreakdownRow, StorePerformanceRow, TopProductRow,
};

/// Default canvas size in pixels
pub const CHART_SIZE: (u32, u32) = (900, 450);

const SERIES_COLOR: RGBColor = RGBColor(102, 126, 234);
const LABEL_COLOR: RGBColor = RGBColor(60, 60, 60);
const MAX_X_LABELS: usize = 12;
const EMPTY_LABEL: &str = "(sin datos)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
    /// Text drawn above the bar; line charts ignore it
    pub annotation: String,
}

/// One categorical series with a title, drawn as bars or as a line
#[derive(Debug, Clone)]
pub struct Chart {
    title: String,
    kind: ChartKind,
    points: Vec<ChartPoint>,
}

impl Chart {
    pub fn new(title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            kind,
            points: Vec::new(),
        }
    }

    pub fn point(
        mut self,
        label: impl Into<String>,
        value: Decimal,
        annotation: impl Into<String>,
    ) -> Self {
        self.points.push(ChartPoint {
            label: label.into(),
            value,
            annotation: annotation.into(),
        });
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// Y axis range: always includes zero, with 10% headroom past the
    /// extremes. Empty or all-zero series get `0..1`.
    pub fn value_range(&self) -> Range<f64> {
        let (lo, hi) = self
            .points
            .iter()
            .map(|p| to_f64(p.value))
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let span = hi - lo;
        if span <= f64::EPSILON {
            return 0.0..1.0;
        }

        let padding = span * 0.1;
        let start = if lo < 0.0 { lo - padding } else { 0.0 };
        start..hi + padding
    }

    /// Draw the chart onto `root`; the caller presents the area
    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(chart_error)?;

        let segments = self.points.len().max(1) as u32;
        let range = self.value_range();

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d((0u32..segments).into_segmented(), range.clone())
            .map_err(chart_error)?;

        let labels: Vec<&str> = self.points.iter().map(|p| p.label.as_str()).collect();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(self.points.len().clamp(1, MAX_X_LABELS))
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => labels
                    .get(*i as usize)
                    .map(|l| l.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("Ingresos ($)")
            .y_label_formatter(&|v| format!("${:.0}", v))
            .label_style(("sans-serif", 12, &LABEL_COLOR))
            .draw()
            .map_err(chart_error)?;

        if self.points.is_empty() {
            let middle = (range.start + range.end) / 2.0;
            chart
                .draw_series(std::iter::once(Text::new(
                    EMPTY_LABEL,
                    (SegmentValue::CenterOf(0), middle),
                    centered_text(16),
                )))
                .map_err(chart_error)?;
            return Ok(());
        }

        match self.kind {
            ChartKind::Bar => {
                chart
                    .draw_series(
                        Histogram::vertical(&chart)
                            .style(SERIES_COLOR.filled())
                            .margin(12)
                            .data(
                                self.points
                                    .iter()
                                    .enumerate()
                                    .map(|(i, p)| (i as u32, to_f64(p.value))),
                            ),
                    )
                    .map_err(chart_error)?;

                chart
                    .draw_series(self.points.iter().enumerate().map(|(i, p)| {
                        Text::new(
                            p.annotation.clone(),
                            (SegmentValue::CenterOf(i as u32), to_f64(p.value)),
                            centered_text(12),
                        )
                    }))
                    .map_err(chart_error)?;
            }
            ChartKind::Line => {
                let series: Vec<(SegmentValue<u32>, f64)> = self
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (SegmentValue::CenterOf(i as u32), to_f64(p.value)))
                    .collect();

                chart
                    .draw_series(LineSeries::new(
                        series.iter().cloned(),
                        SERIES_COLOR.stroke_width(3),
                    ))
                    .map_err(chart_error)?;

                chart
                    .draw_series(
                        series
                            .iter()
                            .map(|(x, y)| Circle::new((x.clone(), *y), 4, SERIES_COLOR.filled())),
                    )
                    .map_err(chart_error)?;
            }
        }

        Ok(())
    }

    /// Render to an SVG document in memory
    pub fn to_svg(&self, size: (u32, u32)) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(chart_error)?;
        }
        Ok(svg)
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn centered_text(size: u32) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size).into_font())
        .color(&LABEL_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Bottom))
}

fn chart_error(err: impl std::fmt::Display) -> AppError {
    AppError::Chart(err.to_string())
}

/// Revenue per payment category with its share of the total
pub fn payment_breakdown_chart(rows: &[PaymentBreakdownRow]) -> Chart {
    let total: Decimal = rows.iter().map(|r| r.total_amount).sum();
    rows.iter().fold(
        Chart::new("Ingresos por Método de Pago", ChartKind::Bar),
        |chart, row| {
            let annotation = format!(
                "{} ({})",
                format_amount(row.total_amount),
                format_percent(percentage(row.total_amount, total))
            );
            chart.point(row.payment_category.as_str(), row.total_amount, annotation)
        },
    )
}

/// Revenue per day as a line, annotated with the day's order count
pub fn daily_sales_chart(rows: &[DailySalesRow]) -> Chart {
    rows.iter()
        .fold(Chart::new("Ingresos Diarios", ChartKind::Line), |chart, row| {
            let annotation = format!(
                "{} · {} órdenes",
                format_amount(row.revenue),
                format_count(row.orders)
            );
            chart.point(row.date.format("%Y-%m-%d").to_string(), row.revenue, annotation)
        })
}

/// Revenue per store with its precomputed share
pub fn store_performance_chart(rows: &[StorePerformanceRow]) -> Chart {
    rows.iter()
        .fold(Chart::new("Ingresos por Tienda", ChartKind::Bar), |chart, row| {
            let annotation = format!(
                "{} ({})",
                format_amount(row.revenue),
                format_percent(row.percentage)
            );
            chart.point(row.store_name.clone(), row.revenue, annotation)
        })
}

/// Revenue of the best selling products, one bar per product and store
pub fn top_products_chart(rows: &[TopProductRow]) -> Chart {
    let title = format!("Top {} Productos por Ingresos", rows.len());
    rows.iter()
        .fold(Chart::new(title, ChartKind::Bar), |chart, row| {
            chart.point(
                format!("{} ({})", row.name, row.store_name),
                row.total_revenue,
                format_amount(row.total_revenue),
            )
        })
}
