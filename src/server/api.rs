use std::collections::HashMap;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::constants::{
    DEFAULT_INTERVAL, DEFAULT_LIST_LIMIT, DEFAULT_PERIOD, FUND_ETFS, MARKET_INDICES,
    MA_LONG_WINDOW, MA_SHORT_WINDOW, TRENDING_COUNT,
};
use crate::models::indicators::simple_moving_average;
use crate::models::{
    ChartDatasets, ChartResponse, FundQuote, HistoryAnalytics, HistoryPoint, HistoryResponse,
    Holding, IndexQuote, PortfolioSummary, QuoteRecord, SearchResult, TrendingStock,
};
use crate::server::AppState;
use crate::services::search::rank_symbols;
use crate::services::yahoo::YahooError;
use crate::utils::{format_date, format_timestamp, round2};

/// GET /api/stock/{symbol} - Latest trading-day quote for one symbol.
#[instrument(skip(state))]
pub async fn get_stock_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Response {
    let ticker = state.symbols.resolve(&symbol);
    debug!(symbol, ticker, "Fetching quote");

    let chart = match state.client.get_chart(&ticker, "1d", "1d").await {
        Ok(chart) => chart,
        Err(YahooError::NoData) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "No data available"})),
            )
                .into_response();
        }
        Err(e) => {
            warn!(symbol, error = %e, "Upstream quote fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    if chart.bars.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No data available"})),
        )
            .into_response();
    }

    // Profile enrichment is best-effort; a quote without market cap or P/E
    // is still a quote.
    let profile = match state.client.get_profile(&ticker).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            debug!(symbol, error = %e, "Profile fetch failed");
            None
        }
    };

    match QuoteRecord::from_chart(&symbol.to_uppercase(), &chart, profile.as_ref()) {
        Some(quote) => {
            info!(symbol, price = quote.current_price, "Returning quote");
            (StatusCode::OK, Json(quote)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No data available"})),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub stocks: Vec<TrendingStock>,
}

/// GET /api/stocks/trending - Snapshot of the first symbols in the table.
///
/// Sequential fetches; a failing symbol is skipped and logged, never
/// aborting the batch.
#[instrument(skip(state))]
pub async fn get_trending_handler(State(state): State<AppState>) -> Response {
    let mut stocks = Vec::new();

    for (code, ticker) in state.symbols.iter().take(TRENDING_COUNT) {
        let chart = match state.client.get_chart(ticker, "1d", "1d").await {
            Ok(chart) => chart,
            Err(e) => {
                warn!(symbol = code, error = %e, "Skipping trending symbol");
                continue;
            }
        };

        let Some(last) = chart.bars.last() else {
            warn!(symbol = code, "Skipping trending symbol: empty series");
            continue;
        };

        let current = last.close;
        let previous = chart
            .meta
            .previous_close
            .or(chart.meta.chart_previous_close)
            .unwrap_or(current);
        let change_percent = if previous != 0.0 {
            (current - previous) / previous * 100.0
        } else {
            0.0
        };

        stocks.push(TrendingStock {
            symbol: code.to_string(),
            name: chart
                .meta
                .long_name
                .clone()
                .unwrap_or_else(|| code.to_string()),
            price: round2(current),
            change: round2(current - previous),
            change_percent: round2(change_percent),
            volume: chart.meta.regular_market_volume.unwrap_or(last.volume),
        });
    }

    info!(count = stocks.len(), "Returning trending stocks");
    (StatusCode::OK, Json(TrendingResponse { stocks })).into_response()
}

#[derive(Debug, Serialize)]
pub struct IndicesResponse {
    pub indices: Vec<IndexQuote>,
}

/// GET /api/indices - Market index snapshots (two-day window for the change).
#[instrument(skip(state))]
pub async fn get_indices_handler(State(state): State<AppState>) -> Response {
    let mut indices = Vec::new();

    for &(name, ticker) in MARKET_INDICES {
        let chart = match state.client.get_chart(ticker, "2d", "1d").await {
            Ok(chart) => chart,
            Err(e) => {
                warn!(index = name, error = %e, "Skipping index");
                continue;
            }
        };

        let Some(last) = chart.bars.last() else {
            warn!(index = name, "Skipping index: empty series");
            continue;
        };

        let value = last.close;
        let previous = if chart.bars.len() > 1 {
            chart.bars[chart.bars.len() - 2].close
        } else {
            value
        };
        let change = value - previous;
        let change_percent = if previous != 0.0 {
            change / previous * 100.0
        } else {
            0.0
        };

        indices.push(IndexQuote {
            name: name.to_string(),
            value: round2(value),
            change: round2(change),
            change_percent: round2(change_percent),
        });
    }

    info!(count = indices.len(), "Returning indices");
    (StatusCode::OK, Json(IndicesResponse { indices })).into_response()
}

/// Query parameters for the history endpoint. Both values are free-form and
/// forwarded to the upstream provider as-is.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
}

/// GET /api/stock/history/{symbol}?period=1mo&interval=1d
#[instrument(skip(state))]
pub async fn get_history_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Response {
    let period = params.period.as_deref().unwrap_or(DEFAULT_PERIOD);
    let interval = params.interval.as_deref().unwrap_or(DEFAULT_INTERVAL);
    let ticker = state.symbols.resolve(&symbol);

    let chart = match state.client.get_chart(&ticker, period, interval).await {
        Ok(chart) if !chart.bars.is_empty() => chart,
        Ok(_) | Err(YahooError::NoData) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "No historical data available"})),
            )
                .into_response();
        }
        Err(e) => {
            warn!(symbol, error = %e, "Upstream history fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let history: Vec<HistoryPoint> = chart
        .bars
        .iter()
        .map(|bar| HistoryPoint {
            timestamp: bar.time.timestamp_millis(),
            date: format_timestamp(&bar.time),
            open: round2(bar.open),
            high: round2(bar.high),
            low: round2(bar.low),
            close: round2(bar.close),
            volume: bar.volume,
        })
        .collect();

    let analytics = HistoryAnalytics::from_points(&history);

    info!(
        symbol,
        period,
        interval,
        data_points = analytics.data_points,
        "Returning history"
    );

    let response = HistoryResponse {
        symbol: symbol.to_uppercase(),
        name: chart
            .meta
            .long_name
            .clone()
            .unwrap_or_else(|| symbol.to_uppercase()),
        period: period.to_string(),
        interval: interval.to_string(),
        history,
        analytics,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub period: Option<String>,
}

/// GET /api/stock/chart/{symbol}?period=1mo - Chart-ready series with
/// trailing 20- and 50-period moving averages.
#[instrument(skip(state))]
pub async fn get_chart_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ChartQuery>,
) -> Response {
    let period = params.period.as_deref().unwrap_or(DEFAULT_PERIOD);
    let ticker = state.symbols.resolve(&symbol);

    let chart = match state.client.get_chart(&ticker, period, "1d").await {
        Ok(chart) if !chart.bars.is_empty() => chart,
        Ok(_) | Err(YahooError::NoData) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "No data available"})),
            )
                .into_response();
        }
        Err(e) => {
            warn!(symbol, error = %e, "Upstream chart fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let closes: Vec<f64> = chart.bars.iter().map(|b| b.close).collect();
    let ma20: Vec<f64> = simple_moving_average(&closes, MA_SHORT_WINDOW)
        .into_iter()
        .map(round2)
        .collect();
    let ma50: Vec<f64> = simple_moving_average(&closes, MA_LONG_WINDOW)
        .into_iter()
        .map(round2)
        .collect();

    let labels: Vec<String> = chart.bars.iter().map(|b| format_date(&b.time)).collect();
    let prices: Vec<f64> = closes.iter().map(|c| round2(*c)).collect();
    let volumes: Vec<u64> = chart.bars.iter().map(|b| b.volume).collect();
    let current_price = prices.last().copied().unwrap_or(0.0);

    info!(symbol, period, points = prices.len(), "Returning chart data");

    let response = ChartResponse {
        symbol: symbol.to_uppercase(),
        labels,
        datasets: ChartDatasets {
            price: prices,
            volume: volumes,
            ma20,
            ma50,
        },
        current_price,
        period: period.to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioRequest {
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

/// POST /api/portfolio/calculate - Value a set of holdings at current prices.
///
/// Prices are fetched sequentially per symbol; holdings whose price cannot
/// be fetched are skipped and logged.
#[instrument(skip(state, request))]
pub async fn calculate_portfolio_handler(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Response {
    let mut prices: HashMap<String, f64> = HashMap::new();

    for holding in &request.holdings {
        if prices.contains_key(&holding.symbol) {
            continue;
        }

        let ticker = state.symbols.resolve(&holding.symbol);
        match state.client.get_chart(&ticker, "1d", "1d").await {
            Ok(chart) => match chart.bars.last() {
                Some(last) => {
                    prices.insert(holding.symbol.clone(), last.close);
                }
                None => {
                    warn!(symbol = %holding.symbol, "Skipping holding: empty series");
                }
            },
            Err(e) => {
                warn!(symbol = %holding.symbol, error = %e, "Skipping holding");
            }
        }
    }

    let summary =
        PortfolioSummary::from_holdings(&request.holdings, |symbol| prices.get(symbol).copied());

    info!(
        holdings = summary.holdings.len(),
        total_invested = summary.total_invested,
        total_pnl = summary.total_pnl,
        "Returning portfolio valuation"
    );

    (StatusCode::OK, Json(summary)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

/// GET /api/search?q=TCS - Ranked symbol search over the static table,
/// enriched with live prices where the fetch succeeds.
#[instrument(skip(state))]
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.unwrap_or_default();
    let matches = rank_symbols(&state.symbols, &query);

    let mut results = Vec::with_capacity(matches.len());
    for (code, ticker) in matches {
        let mut result = SearchResult {
            symbol: code.to_string(),
            name: code.to_string(),
            exchange: "NSE".to_string(),
            sector: "N/A".to_string(),
            industry: "N/A".to_string(),
            price: None,
            change_percent: None,
        };

        match state.client.get_chart(ticker, "1d", "1d").await {
            Ok(chart) => {
                if let Some(name) = chart.meta.long_name.clone() {
                    result.name = name;
                }
                if let Some(last) = chart.bars.last() {
                    let current = last.close;
                    let previous = chart
                        .meta
                        .previous_close
                        .or(chart.meta.chart_previous_close)
                        .unwrap_or(current);
                    result.price = Some(round2(current));
                    result.change_percent = Some(if previous != 0.0 {
                        round2((current - previous) / previous * 100.0)
                    } else {
                        0.0
                    });
                }
            }
            Err(e) => {
                warn!(symbol = code, error = %e, "Search enrichment fetch failed");
            }
        }

        match state.client.get_profile(ticker).await {
            Ok(profile) => {
                if let Some(name) = profile.long_name {
                    result.name = name;
                }
                if let Some(sector) = profile.sector {
                    result.sector = sector;
                }
                if let Some(industry) = profile.industry {
                    result.industry = industry;
                }
            }
            Err(e) => {
                debug!(symbol = code, error = %e, "Search profile fetch failed");
            }
        }

        results.push(result);
    }

    info!(query, count = results.len(), "Returning search results");

    let total = results.len();
    (StatusCode::OK, Json(SearchResponse { results, total })).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub stocks: Vec<String>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// GET /api/stocks/all?limit=20&offset=0 - Paginated symbol listing.
/// Pure table enumeration, no upstream fetch.
#[instrument(skip(state))]
pub async fn get_all_stocks_handler(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let stocks: Vec<String> = state
        .symbols
        .codes()
        .skip(offset)
        .take(limit)
        .map(String::from)
        .collect();

    let response = ListingResponse {
        stocks,
        total: state.symbols.len(),
        limit,
        offset,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Debug, Serialize)]
pub struct FundsResponse {
    pub funds: Vec<FundQuote>,
}

/// GET /api/mutual-funds - ETF-backed mutual-fund proxies with one-year
/// returns computed from a year of daily closes.
#[instrument(skip(state))]
pub async fn get_mutual_funds_handler(State(state): State<AppState>) -> Response {
    let mut funds = Vec::new();

    for &(name, ticker) in FUND_ETFS {
        let chart = match state.client.get_chart(ticker, "1y", "1d").await {
            Ok(chart) => chart,
            Err(e) => {
                warn!(fund = name, error = %e, "Skipping fund");
                continue;
            }
        };

        let (Some(first), Some(last)) = (chart.bars.first(), chart.bars.last()) else {
            warn!(fund = name, "Skipping fund: empty series");
            continue;
        };

        let nav = last.close;
        let year_ago = first.close;
        let one_year_return = if year_ago != 0.0 {
            (nav - year_ago) / year_ago * 100.0
        } else {
            0.0
        };
        // The provider has no three-year series at this range; extrapolate
        // from the one-year figure.
        let three_year_return = one_year_return * 1.2;

        funds.push(FundQuote {
            name: name.to_string(),
            fund_type: "Equity ETF".to_string(),
            current_nav: round2(nav),
            one_year_return: round2(one_year_return),
            three_year_return: round2(three_year_return),
        });
    }

    info!(count = funds.len(), "Returning mutual funds");
    (StatusCode::OK, Json(FundsResponse { funds })).into_response()
}

/// GET /api/health - Liveness probe, no upstream involved.
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "message": "Stock Market API is running"
        })),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::server::build_router;
    use crate::services::{SymbolTable, YahooClient};

    fn app(base_url: &str) -> axum::Router {
        build_router(AppState {
            symbols: Arc::new(SymbolTable::new()),
            client: YahooClient::with_base_url(base_url).unwrap(),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Minimal upstream stub: serves the same canned body for every request
    /// on a local port.
    async fn spawn_stub(body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health() {
        let response = app("http://127.0.0.1:1")
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_listing_pagination() {
        let response = app("http://127.0.0.1:1")
            .oneshot(
                Request::get("/api/stocks/all?limit=5&offset=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["limit"], 5);
        assert_eq!(body["offset"], 2);
        assert_eq!(body["total"], SymbolTable::new().len());

        let stocks: Vec<&str> = body["stocks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(stocks, vec!["WIPRO", "HCLTECH", "TECHM", "LTIM", "COFORGE"]);
    }

    #[tokio::test]
    async fn test_listing_offset_past_end() {
        let response = app("http://127.0.0.1:1")
            .oneshot(
                Request::get("/api/stocks/all?offset=1000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["stocks"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quote_not_found_when_series_empty() {
        // Upstream answers with a well-formed chart that has no bars.
        let base = spawn_stub(
            r#"{"chart":{"result":[{"meta":{"symbol":"TCS.NS"},"indicators":{"quote":[{}]}}],"error":null}}"#,
        )
        .await;

        let response = app(&base)
            .oneshot(Request::get("/api/stock/TCS").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No data available");
    }

    #[tokio::test]
    async fn test_quote_upstream_failure_is_500() {
        // Nothing is listening on this port; the fetch fails outright.
        let response = app("http://127.0.0.1:1")
            .oneshot(Request::get("/api/stock/TCS").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_search_skips_short_query_without_fetching() {
        // Base URL points nowhere; with an empty match set no fetch happens
        // and the handler still answers 200.
        let response = app("http://127.0.0.1:1")
            .oneshot(Request::get("/api/search?q=T").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["results"].as_array().unwrap().is_empty());
        assert_eq!(body["total"], 0);
    }
}
