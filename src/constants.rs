//! Static symbol tables and facade-wide constants.
//!
//! The symbol tables map short NSE codes to the upstream provider's ticker
//! identifiers. They are fixed at compile time and never mutated at runtime;
//! the server wraps the equity table in a `SymbolTable` once at startup.

/// NSE equity symbols mapped to upstream tickers, grouped by sector.
/// Declaration order matters: the trending endpoint takes the first
/// [`TRENDING_COUNT`] entries and the listing endpoint paginates in this order.
pub const NSE_STOCKS: &[(&str, &str)] = &[
    // Technology
    ("TCS", "TCS.NS"),
    ("INFY", "INFY.NS"),
    ("WIPRO", "WIPRO.NS"),
    ("HCLTECH", "HCLTECH.NS"),
    ("TECHM", "TECHM.NS"),
    ("LTIM", "LTIM.NS"),
    ("COFORGE", "COFORGE.NS"),
    ("PERSISTENT", "PERSISTENT.NS"),
    ("MPHASIS", "MPHASIS.NS"),
    // Banking & Finance
    ("HDFCBANK", "HDFCBANK.NS"),
    ("ICICIBANK", "ICICIBANK.NS"),
    ("SBIN", "SBIN.NS"),
    ("KOTAKBANK", "KOTAKBANK.NS"),
    ("AXISBANK", "AXISBANK.NS"),
    ("INDUSINDBK", "INDUSINDBK.NS"),
    ("BAJFINANCE", "BAJFINANCE.NS"),
    ("BAJAJFINSV", "BAJAJFINSV.NS"),
    ("PNB", "PNB.NS"),
    ("BANKBARODA", "BANKBARODA.NS"),
    // Energy & Oil/Gas
    ("RELIANCE", "RELIANCE.NS"),
    ("ONGC", "ONGC.NS"),
    ("BPCL", "BPCL.NS"),
    ("IOC", "IOC.NS"),
    ("NTPC", "NTPC.NS"),
    ("POWERGRID", "POWERGRID.NS"),
    ("ADANIGREEN", "ADANIGREEN.NS"),
    ("TATAPOWER", "TATAPOWER.NS"),
    // FMCG & Consumer
    ("HINDUNILVR", "HINDUNILVR.NS"),
    ("ITC", "ITC.NS"),
    ("NESTLEIND", "NESTLEIND.NS"),
    ("BRITANNIA", "BRITANNIA.NS"),
    ("DABUR", "DABUR.NS"),
    ("MARICO", "MARICO.NS"),
    ("GODREJCP", "GODREJCP.NS"),
    ("TATACONSUM", "TATACONSUM.NS"),
    // Automobile
    ("MARUTI", "MARUTI.NS"),
    ("TATAMOTORS", "TATAMOTORS.NS"),
    ("M&M", "M&M.NS"),
    ("BAJAJ-AUTO", "BAJAJ-AUTO.NS"),
    ("EICHERMOT", "EICHERMOT.NS"),
    ("HEROMOTOCO", "HEROMOTOCO.NS"),
    ("TVSMOTOR", "TVSMOTOR.NS"),
    // Telecom
    ("BHARTIARTL", "BHARTIARTL.NS"),
    ("IDEA", "IDEA.NS"),
    // Pharma
    ("SUNPHARMA", "SUNPHARMA.NS"),
    ("DRREDDY", "DRREDDY.NS"),
    ("CIPLA", "CIPLA.NS"),
    ("DIVISLAB", "DIVISLAB.NS"),
    ("BIOCON", "BIOCON.NS"),
    ("AUROPHARMA", "AUROPHARMA.NS"),
    ("LUPIN", "LUPIN.NS"),
    // Metals & Mining
    ("TATASTEEL", "TATASTEEL.NS"),
    ("HINDALCO", "HINDALCO.NS"),
    ("JSWSTEEL", "JSWSTEEL.NS"),
    ("VEDL", "VEDL.NS"),
    ("COALINDIA", "COALINDIA.NS"),
    ("SAIL", "SAIL.NS"),
    // Infrastructure & Construction
    ("LT", "LT.NS"),
    ("ADANIPORTS", "ADANIPORTS.NS"),
    ("ULTRACEMCO", "ULTRACEMCO.NS"),
    ("GRASIM", "GRASIM.NS"),
    ("AMBUJACEM", "AMBUJACEM.NS"),
    // Paints & Chemicals
    ("ASIANPAINT", "ASIANPAINT.NS"),
    ("PIDILITIND", "PIDILITIND.NS"),
    ("BERGER", "BERGER.NS"),
    // E-commerce & Tech
    ("ZOMATO", "ZOMATO.NS"),
    ("PAYTM", "PAYTM.NS"),
    ("NYKAA", "NYKAA.NS"),
];

/// Market indices tracked by the indices endpoint.
pub const MARKET_INDICES: &[(&str, &str)] = &[
    ("NIFTY50", "^NSEI"),
    ("SENSEX", "^BSESN"),
    ("NIFTYBANK", "^NSEBANK"),
    ("NIFTYIT", "^CNXIT"),
];

/// ETFs served as mutual-fund proxies.
pub const FUND_ETFS: &[(&str, &str)] = &[
    ("NIFTYBEES", "NIFTYBEES.NS"),
    ("JUNIORBEES", "JUNIORBEES.NS"),
    ("BANKBEES", "BANKBEES.NS"),
    ("GOLDBEES", "GOLDBEES.NS"),
];

/// Suffix appended when a symbol is absent from the static table.
pub const DEFAULT_TICKER_SUFFIX: &str = ".NS";

/// Number of symbols returned by the trending endpoint.
pub const TRENDING_COUNT: usize = 10;

/// Maximum number of search results returned.
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Queries shorter than this return an empty result set.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Moving-average windows computed for the chart endpoint.
pub const MA_SHORT_WINDOW: usize = 20;
pub const MA_LONG_WINDOW: usize = 50;

/// Defaults for the history endpoint's free-form period/interval parameters.
pub const DEFAULT_PERIOD: &str = "1mo";
pub const DEFAULT_INTERVAL: &str = "1d";

/// Defaults for the paginated symbol listing.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 5000;
