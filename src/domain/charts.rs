//! Chart data builders for the sales dashboard.
//!
//! Aggregates closed sales into daily and hourly buckets and renders
//! them as Chart.js option objects. Amounts are aggregated in cents and
//! converted to major units only when a chart dataset is produced.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Bar colour for sales series.
pub const SALES_COLOR: &str = "#2196F3";
/// Bar colour for profit series.
pub const PROFIT_COLOR: &str = "#4CAF50";

/// A closed sale as delivered by the POS API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Local close time of the receipt.
    #[serde(with = "pos_datetime")]
    pub closed_at: NaiveDateTime,
    /// Receipt total in cents.
    pub sum_cents: i64,
    /// Gross profit in cents.
    #[serde(default)]
    pub profit_cents: i64,
}

/// Sales grouped by calendar day, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyBreakdown {
    /// `YYYY-MM-DD` labels.
    pub labels: Vec<String>,
    /// Sales per day (cents).
    pub sales: Vec<i64>,
    /// Profit per day (cents).
    pub profit: Vec<i64>,
    /// Receipts per day.
    pub count: Vec<u64>,
}

impl DailyBreakdown {
    /// Group sales by the date they closed on.
    pub fn from_sales(sales: &[SaleRecord]) -> Self {
        let mut days: BTreeMap<NaiveDate, (i64, i64, u64)> = BTreeMap::new();
        for sale in sales {
            let entry = days.entry(sale.closed_at.date()).or_default();
            entry.0 = entry.0.saturating_add(sale.sum_cents);
            entry.1 = entry.1.saturating_add(sale.profit_cents);
            entry.2 = entry.2.saturating_add(1);
        }

        let mut out = Self::default();
        for (day, (sum, profit, count)) in days {
            out.labels.push(day.format("%Y-%m-%d").to_string());
            out.sales.push(sum);
            out.profit.push(profit);
            out.count.push(count);
        }
        out
    }

    /// Total sales over all days (cents), saturating at the `i64` bounds.
    pub fn total_sales(&self) -> i64 {
        self.sales.iter().fold(0, |acc, sum| acc.saturating_add(*sum))
    }
}

/// Sales bucketed by hour of day, always 24 entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyBreakdown {
    /// `HH:00` labels.
    pub labels: Vec<String>,
    /// Sales per hour (cents).
    pub sales: Vec<i64>,
    /// Profit per hour (cents).
    pub profit: Vec<i64>,
    /// Receipts per hour.
    pub count: Vec<u64>,
}

impl HourlyBreakdown {
    /// Group sales by the hour they closed in.
    pub fn from_sales(sales: &[SaleRecord]) -> Self {
        let mut out = Self {
            labels: (0..24).map(|h| format!("{h:02}:00")).collect(),
            sales: vec![0; 24],
            profit: vec![0; 24],
            count: vec![0; 24],
        };
        for sale in sales {
            let hour = sale.closed_at.hour() as usize;
            out.sales[hour] = out.sales[hour].saturating_add(sale.sum_cents);
            out.profit[hour] = out.profit[hour].saturating_add(sale.profit_cents);
            out.count[hour] = out.count[hour].saturating_add(1);
        }
        out
    }

    /// Hour with the highest sales, if any sale exists.
    pub fn peak_hour(&self) -> Option<usize> {
        self.count.iter().any(|c| *c > 0).then(|| {
            self.sales
                .iter()
                .enumerate()
                .max_by_key(|(hour, sum)| (**sum, std::cmp::Reverse(*hour)))
                .map_or(0, |(hour, _)| hour)
        })
    }
}

/// Chart.js chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Vertical bars.
    Bar,
    /// Line series.
    Line,
}

/// One Chart.js dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Legend label.
    pub label: String,
    /// One value per chart label, in major units.
    pub data: Vec<f64>,
    /// Fill colour (`#RRGGBB`).
    pub background_color: String,
    /// Outline colour (`#RRGGBB`).
    pub border_color: String,
}

/// `data` block of a Chart.js config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// X-axis labels.
    pub labels: Vec<String>,
    /// Series drawn against `labels`.
    pub datasets: Vec<Dataset>,
}

/// Chart title plugin settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleOptions {
    /// Whether the title is drawn.
    pub display: bool,
    /// Title text.
    pub text: String,
}

/// `options.plugins` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginOptions {
    /// Title plugin.
    pub title: TitleOptions,
}

/// `options` block of a Chart.js config.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Resize with the container.
    pub responsive: bool,
    /// Keep the default aspect ratio when resizing.
    pub maintain_aspect_ratio: bool,
    /// Plugin settings.
    pub plugins: PluginOptions,
}

/// A complete Chart.js option object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    /// Chart type, serialised as `type`.
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Labels and datasets.
    pub data: ChartData,
    /// Display options.
    pub options: ChartOptions,
}

impl ChartConfig {
    /// Empty chart of the given kind with a title.
    pub fn new(kind: ChartKind, title: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            kind,
            data: ChartData {
                labels,
                datasets: Vec::new(),
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                plugins: PluginOptions {
                    title: TitleOptions {
                        display: true,
                        text: title.into(),
                    },
                },
            },
        }
    }

    /// Append a dataset of cent amounts, converted to major units.
    #[must_use]
    pub fn with_cents_dataset(mut self, label: &str, cents: &[i64], color: &str) -> Self {
        self.data.datasets.push(Dataset {
            label: label.to_string(),
            data: cents.iter().map(|c| cents_to_major(*c)).collect(),
            background_color: color.to_string(),
            border_color: color.to_string(),
        });
        self
    }

    /// Daily sales and profit bar chart.
    pub fn daily_sales(daily: &DailyBreakdown, title: &str) -> Self {
        Self::new(ChartKind::Bar, title, daily.labels.clone())
            .with_cents_dataset("Sales", &daily.sales, SALES_COLOR)
            .with_cents_dataset("Profit", &daily.profit, PROFIT_COLOR)
    }

    /// Hourly sales line chart.
    pub fn hourly_sales(hourly: &HourlyBreakdown, title: &str) -> Self {
        Self::new(ChartKind::Line, title, hourly.labels.clone())
            .with_cents_dataset("Sales", &hourly.sales, SALES_COLOR)
    }

    /// Serialise to a JSON value ready for the page.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn cents_to_major(cents: i64) -> f64 {
    Decimal::new(cents, 2).to_f64().unwrap_or(0.0)
}

/// Accepts both `2024-01-05 13:45:00` (POS API) and ISO `T` separators.
mod pos_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(FORMATS[0]).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid close time: {raw}")))
    }
}
