//! Upstream market-data provider client (Yahoo Finance HTTP API).
//!
//! The provider is treated as a black box that may return empty data or fail
//! outright; every call is fallible and nothing is retried. Callers decide
//! whether a failure surfaces as an error response or a skipped item.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Default API host. Override with the UPSTREAM_BASE_URL environment
/// variable (used by tests to point at a stub server).
const BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug)]
pub enum YahooError {
    Http(reqwest::Error),
    Serialization(serde_json::Error),
    InvalidResponse(String),
    NoData,
}

impl From<reqwest::Error> for YahooError {
    fn from(error: reqwest::Error) -> Self {
        YahooError::Http(error)
    }
}

impl From<serde_json::Error> for YahooError {
    fn from(error: serde_json::Error) -> Self {
        YahooError::Serialization(error)
    }
}

impl std::fmt::Display for YahooError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YahooError::Http(e) => write!(f, "HTTP error: {}", e),
            YahooError::Serialization(e) => write!(f, "Serialization error: {}", e),
            YahooError::InvalidResponse(s) => write!(f, "Invalid response: {}", s),
            YahooError::NoData => write!(f, "No data available"),
        }
    }
}

impl std::error::Error for YahooError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            YahooError::Http(e) => Some(e),
            YahooError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

/// One OHLCV bar of a chart series.
#[derive(Debug, Clone)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Metadata blob returned alongside every chart series. Every field is
/// optional; the provider omits them freely depending on instrument type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[allow(dead_code)]
    pub symbol: Option<String>,
    #[allow(dead_code)]
    pub currency: Option<String>,
    pub long_name: Option<String>,
    #[allow(dead_code)]
    pub short_name: Option<String>,
    #[allow(dead_code)]
    pub regular_market_price: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_volume: Option<u64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// A chart series: metadata plus zero or more OHLCV bars.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub meta: ChartMeta,
    pub bars: Vec<Bar>,
}

/// Company profile assembled from the quoteSummary endpoint.
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    #[allow(dead_code)]
    pub symbol: String,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResultNode>>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResultNode {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: IndicatorsNode,
}

#[derive(Debug, Deserialize)]
struct IndicatorsNode {
    quote: Vec<QuoteArraysNode>,
}

/// Parallel arrays of the chart payload; individual entries may be null.
#[derive(Debug, Default, Deserialize)]
struct QuoteArraysNode {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Result<Self, YahooError> {
        let base_url =
            std::env::var("UPSTREAM_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, YahooError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(YahooClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch an OHLCV series for the given ticker. `range` and `interval`
    /// are forwarded verbatim; the provider decides what values it accepts.
    pub async fn get_chart(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartData, YahooError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url, ticker, range, interval
        );

        tracing::debug!(ticker, range, interval, "Fetching chart series");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(YahooError::NoData);
        }
        if !status.is_success() {
            return Err(YahooError::InvalidResponse(format!(
                "chart request for {} returned {}",
                ticker, status
            )));
        }

        let body = response.text().await?;
        parse_chart(&body)
    }

    /// Fetch company profile data (sector, industry, market cap, P/E).
    pub async fn get_profile(&self, ticker: &str) -> Result<CompanyProfile, YahooError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile%2CsummaryDetail%2Cprice",
            self.base_url, ticker
        );

        tracing::debug!(ticker, "Fetching company profile");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(YahooError::NoData);
        }
        if !status.is_success() {
            return Err(YahooError::InvalidResponse(format!(
                "profile request for {} returned {}",
                ticker, status
            )));
        }

        let body = response.text().await?;
        parse_profile(ticker, &body)
    }
}

/// Parse a chart response body into metadata plus bars. Rows with any null
/// OHLC entry are skipped; a null volume becomes 0.
fn parse_chart(body: &str) -> Result<ChartData, YahooError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.chart.error.filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown provider error");
        return Err(YahooError::InvalidResponse(description.to_string()));
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or(YahooError::NoData)?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let (Some(&Some(open)), Some(&Some(high)), Some(&Some(low)), Some(&Some(close))) = (
            opens.get(i),
            highs.get(i),
            lows.get(i),
            closes.get(i),
        ) else {
            continue;
        };

        let Some(time) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };

        bars.push(Bar {
            time,
            open,
            high,
            low,
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        });
    }

    Ok(ChartData {
        meta: result.meta,
        bars,
    })
}

/// Extract profile fields from a quoteSummary response body. Every field is
/// best-effort; missing modules simply leave the field empty.
fn parse_profile(ticker: &str, body: &str) -> Result<CompanyProfile, YahooError> {
    let data: Value = serde_json::from_str(body)?;

    let result = data
        .get("quoteSummary")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.get(0))
        .ok_or_else(|| {
            YahooError::InvalidResponse(format!("missing quoteSummary result for {}", ticker))
        })?;

    let asset_profile = result.get("assetProfile");
    let summary_detail = result.get("summaryDetail");
    let price = result.get("price");

    Ok(CompanyProfile {
        symbol: ticker.to_string(),
        long_name: price
            .and_then(|p| p.get("longName"))
            .and_then(Value::as_str)
            .map(String::from),
        sector: asset_profile
            .and_then(|p| p.get("sector"))
            .and_then(Value::as_str)
            .map(String::from),
        industry: asset_profile
            .and_then(|p| p.get("industry"))
            .and_then(Value::as_str)
            .map(String::from),
        market_cap: price
            .and_then(|p| p.get("marketCap"))
            .and_then(|m| m.get("raw"))
            .and_then(Value::as_f64),
        trailing_pe: summary_detail
            .and_then(|d| d.get("trailingPE"))
            .and_then(|m| m.get("raw"))
            .and_then(Value::as_f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "TCS.NS",
                    "currency": "INR",
                    "longName": "Tata Consultancy Services Limited",
                    "chartPreviousClose": 3400.0,
                    "previousClose": 3400.0,
                    "regularMarketVolume": 1200000,
                    "fiftyTwoWeekHigh": 4200.0,
                    "fiftyTwoWeekLow": 3100.0
                },
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": {
                    "quote": [{
                        "open": [3450.0, null, 3490.0],
                        "high": [3520.0, 3530.0, 3540.0],
                        "low": [3420.0, 3430.0, 3440.0],
                        "close": [3500.0, 3510.0, 3520.0],
                        "volume": [900000, 800000, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart() {
        let chart = parse_chart(CHART_BODY).unwrap();

        assert_eq!(chart.meta.symbol.as_deref(), Some("TCS.NS"));
        assert_eq!(chart.meta.previous_close, Some(3400.0));

        // Second row has a null open and is skipped entirely.
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].close, 3500.0);
        assert_eq!(chart.bars[1].close, 3520.0);
        // Null volume becomes 0.
        assert_eq!(chart.bars[1].volume, 0);
    }

    #[test]
    fn test_parse_chart_empty_result() {
        let body = r#"{"chart": {"result": [], "error": null}}"#;
        assert!(matches!(parse_chart(body), Err(YahooError::NoData)));

        let body = r#"{"chart": {"result": null, "error": null}}"#;
        assert!(matches!(parse_chart(body), Err(YahooError::NoData)));
    }

    #[test]
    fn test_parse_chart_no_timestamps() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "TCS.NS"},
                    "indicators": {"quote": [{}]}
                }],
                "error": null
            }
        }"#;
        let chart = parse_chart(body).unwrap();
        assert!(chart.bars.is_empty());
    }

    #[test]
    fn test_parse_chart_provider_error() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        match parse_chart(body) {
            Err(YahooError::InvalidResponse(msg)) => {
                assert!(msg.contains("delisted"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_profile() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "assetProfile": {"sector": "Technology", "industry": "IT Services"},
                    "summaryDetail": {"trailingPE": {"raw": 29.4}},
                    "price": {"longName": "Tata Consultancy Services Limited", "marketCap": {"raw": 12500000000000.0}}
                }],
                "error": null
            }
        }"#;

        let profile = parse_profile("TCS.NS", body).unwrap();
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.industry.as_deref(), Some("IT Services"));
        assert_eq!(profile.market_cap, Some(12_500_000_000_000.0));
        assert_eq!(profile.trailing_pe, Some(29.4));
        assert_eq!(
            profile.long_name.as_deref(),
            Some("Tata Consultancy Services Limited")
        );
    }

    #[test]
    fn test_parse_profile_missing_modules() {
        let body = r#"{"quoteSummary": {"result": [{}], "error": null}}"#;
        let profile = parse_profile("TCS.NS", body).unwrap();
        assert!(profile.sector.is_none());
        assert!(profile.market_cap.is_none());
    }
}
