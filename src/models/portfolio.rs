use serde::{Deserialize, Serialize};

use crate::utils::round2;

/// A single position posted to the portfolio endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Holding {
    pub symbol: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub avg_price: f64,
}

/// Valuation of one holding at the current market price.
#[derive(Debug, Serialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
    pub invested: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

/// Aggregate portfolio valuation.
#[derive(Debug, Serialize)]
pub struct PortfolioSummary {
    pub total_invested: f64,
    pub current_value: f64,
    pub total_pnl: f64,
    pub total_pnl_percent: f64,
    pub holdings: Vec<HoldingValuation>,
}

impl PortfolioSummary {
    /// Value the given holdings against a price lookup. Holdings with no
    /// available price are skipped; they contribute nothing to the totals.
    pub fn from_holdings<F>(holdings: &[Holding], price_for: F) -> Self
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut total_invested = 0.0;
        let mut current_value = 0.0;
        let mut valuations = Vec::new();

        for holding in holdings {
            let Some(current_price) = price_for(&holding.symbol) else {
                continue;
            };

            let invested = holding.quantity * holding.avg_price;
            let value = holding.quantity * current_price;
            let pnl = value - invested;
            let pnl_percent = if invested != 0.0 {
                (pnl / invested) * 100.0
            } else {
                0.0
            };

            total_invested += invested;
            current_value += value;

            valuations.push(HoldingValuation {
                symbol: holding.symbol.clone(),
                quantity: holding.quantity,
                avg_price: round2(holding.avg_price),
                current_price: round2(current_price),
                invested: round2(invested),
                current_value: round2(value),
                pnl: round2(pnl),
                pnl_percent: round2(pnl_percent),
            });
        }

        let total_pnl = current_value - total_invested;
        let total_pnl_percent = if total_invested != 0.0 {
            (total_pnl / total_invested) * 100.0
        } else {
            0.0
        };

        PortfolioSummary {
            total_invested: round2(total_invested),
            current_value: round2(current_value),
            total_pnl: round2(total_pnl),
            total_pnl_percent: round2(total_pnl_percent),
            holdings: valuations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(symbol: &str, quantity: f64, avg_price: f64) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            quantity,
            avg_price,
        }
    }

    #[test]
    fn test_portfolio_valuation() {
        let holdings = vec![holding("TCS", 10.0, 3000.0)];
        let summary = PortfolioSummary::from_holdings(&holdings, |_| Some(3500.0));

        assert_eq!(summary.total_invested, 30000.0);
        assert_eq!(summary.current_value, 35000.0);
        assert_eq!(summary.total_pnl, 5000.0);
        assert_eq!(summary.total_pnl_percent, 16.67);

        let v = &summary.holdings[0];
        assert_eq!(v.invested, 30000.0);
        assert_eq!(v.current_value, 35000.0);
        assert_eq!(v.pnl, 5000.0);
        assert_eq!(v.pnl_percent, 16.67);
    }

    #[test]
    fn test_unpriced_holdings_are_skipped() {
        let holdings = vec![holding("TCS", 10.0, 3000.0), holding("XXXX", 5.0, 100.0)];
        let summary = PortfolioSummary::from_holdings(&holdings, |symbol| {
            (symbol == "TCS").then_some(3500.0)
        });

        assert_eq!(summary.holdings.len(), 1);
        assert_eq!(summary.total_invested, 30000.0);
    }

    #[test]
    fn test_zero_invested_guard() {
        let holdings = vec![holding("TCS", 0.0, 0.0)];
        let summary = PortfolioSummary::from_holdings(&holdings, |_| Some(3500.0));

        assert_eq!(summary.total_invested, 0.0);
        assert_eq!(summary.total_pnl_percent, 0.0);
        assert_eq!(summary.holdings[0].pnl_percent, 0.0);
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = PortfolioSummary::from_holdings(&[], |_| Some(1.0));
        assert_eq!(summary.total_invested, 0.0);
        assert_eq!(summary.current_value, 0.0);
        assert!(summary.holdings.is_empty());
    }
}
