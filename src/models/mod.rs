pub mod indicators;
mod portfolio;
mod quote;

pub use portfolio::{Holding, PortfolioSummary};
pub use quote::{
    ChartDatasets, ChartResponse, FundQuote, HistoryAnalytics, HistoryPoint, HistoryResponse,
    IndexQuote, QuoteRecord, SearchResult, TrendingStock,
};
