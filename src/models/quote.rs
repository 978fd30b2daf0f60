use serde::Serialize;

use crate::services::yahoo::{ChartData, CompanyProfile};
use crate::utils::round2;

/// Detailed quote for a single symbol, recomputed on every request.
#[derive(Debug, Serialize)]
pub struct QuoteRecord {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub open: f64,
    #[serde(rename = "52_week_high")]
    pub fifty_two_week_high: f64,
    #[serde(rename = "52_week_low")]
    pub fifty_two_week_low: f64,
    pub pe_ratio: f64,
}

impl QuoteRecord {
    /// Build a quote from the latest trading-day chart plus an optional
    /// company profile. Returns `None` when the series has no bars.
    pub fn from_chart(
        symbol: &str,
        chart: &ChartData,
        profile: Option<&CompanyProfile>,
    ) -> Option<Self> {
        let last = chart.bars.last()?;

        let current_price = last.close;
        let previous_close = chart
            .meta
            .previous_close
            .or(chart.meta.chart_previous_close)
            .unwrap_or(current_price);

        let change = current_price - previous_close;
        let change_percent = if previous_close != 0.0 {
            (change / previous_close) * 100.0
        } else {
            0.0
        };

        let name = profile
            .and_then(|p| p.long_name.clone())
            .or_else(|| chart.meta.long_name.clone())
            .unwrap_or_else(|| symbol.to_string());

        Some(QuoteRecord {
            symbol: symbol.to_string(),
            name,
            current_price: round2(current_price),
            previous_close: round2(previous_close),
            change: round2(change),
            change_percent: round2(change_percent),
            volume: chart.meta.regular_market_volume.unwrap_or(last.volume),
            market_cap: profile.and_then(|p| p.market_cap).unwrap_or(0.0),
            day_high: round2(last.high),
            day_low: round2(last.low),
            open: round2(last.open),
            fifty_two_week_high: chart.meta.fifty_two_week_high.unwrap_or(0.0),
            fifty_two_week_low: chart.meta.fifty_two_week_low.unwrap_or(0.0),
            pe_ratio: profile.and_then(|p| p.trailing_pe).unwrap_or(0.0),
        })
    }
}

/// Entry in the trending list.
#[derive(Debug, Serialize)]
pub struct TrendingStock {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
}

/// Snapshot of a market index.
#[derive(Debug, Serialize)]
pub struct IndexQuote {
    pub name: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// One bar of the history endpoint's response.
#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Aggregate analytics over a history response.
#[derive(Debug, Serialize)]
pub struct HistoryAnalytics {
    pub high: f64,
    pub low: f64,
    pub avg: f64,
    pub total_volume: u64,
    pub data_points: usize,
}

impl HistoryAnalytics {
    pub fn from_points(points: &[HistoryPoint]) -> Self {
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        let total_volume = points.iter().map(|p| p.volume).sum();

        let high = closes.iter().cloned().fold(f64::MIN, f64::max);
        let low = closes.iter().cloned().fold(f64::MAX, f64::min);
        let avg = if closes.is_empty() {
            0.0
        } else {
            closes.iter().sum::<f64>() / closes.len() as f64
        };

        HistoryAnalytics {
            high: if closes.is_empty() { 0.0 } else { round2(high) },
            low: if closes.is_empty() { 0.0 } else { round2(low) },
            avg: round2(avg),
            total_volume,
            data_points: points.len(),
        }
    }
}

/// Full history endpoint response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub name: String,
    pub period: String,
    pub interval: String,
    pub history: Vec<HistoryPoint>,
    pub analytics: HistoryAnalytics,
}

/// Chart endpoint datasets, shaped for direct consumption by charting
/// libraries.
#[derive(Debug, Serialize)]
pub struct ChartDatasets {
    pub price: Vec<f64>,
    pub volume: Vec<u64>,
    pub ma20: Vec<f64>,
    pub ma50: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub symbol: String,
    pub labels: Vec<String>,
    pub datasets: ChartDatasets,
    pub current_price: f64,
    pub period: String,
}

/// One hit of the search endpoint. Price fields are present only when the
/// live fetch succeeded.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub sector: String,
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

/// Mutual-fund proxy quote (ETF-backed).
#[derive(Debug, Serialize)]
pub struct FundQuote {
    pub name: String,
    #[serde(rename = "type")]
    pub fund_type: String,
    pub current_nav: f64,
    pub one_year_return: f64,
    pub three_year_return: f64,
}
