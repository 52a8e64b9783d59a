//! Maps per-kind results into display-ready tables and detail lists

use super::query::QueryKind;
use super::records::{Balance, Holder, OhlcBar, Records, TokenInfo, Transfer};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_RESULTS: &str = "No results found for this query.";

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    /// Fetch completed with zero rows
    Empty,
    Table(TableView),
    Details(DetailView),
}

impl Presentation {
    /// Flatten to header + rows, the shape CSV export wants
    pub fn to_grid(&self) -> Option<(Vec<&'static str>, Vec<Vec<String>>)> {
        match self {
            Presentation::Empty => None,
            Presentation::Table(table) => Some((table.columns.clone(), table.rows.clone())),
            Presentation::Details(details) => Some((
                vec!["field", "value"],
                details
                    .fields
                    .iter()
                    .map(|(k, v)| vec![k.to_string(), v.clone()])
                    .collect(),
            )),
        }
    }
}

pub fn columns(kind: QueryKind) -> Vec<&'static str> {
    match kind {
        QueryKind::Balances => vec![
            "Symbol",
            "Name",
            "Amount",
            "Price (USD)",
            "Value (USD)",
            "Contract",
        ],
        QueryKind::Transfers => vec!["Date/Time", "From", "To", "Amount", "Value (USD)", "Tx ID"],
        QueryKind::Holders => vec!["Rank", "Holder Address", "Amount"],
        QueryKind::OhlcHistory => vec![
            "Date/Time",
            "Ticker",
            "Open",
            "High",
            "Low",
            "Close",
            "Volume",
        ],
        QueryKind::TokenInfo => vec!["Field", "Value"],
    }
}

pub fn present(records: &Records) -> Presentation {
    if records.is_empty() {
        return Presentation::Empty;
    }
    let kind = records.kind();
    match records {
        Records::TokenInfo(rows) => match rows.first() {
            Some(info) => Presentation::Details(token_details(info)),
            None => Presentation::Empty,
        },
        Records::Balances(rows) => table(kind, "Token Balances", rows.iter().map(balance_row)),
        Records::Transfers(rows) => table(kind, "Token Transfers", rows.iter().map(transfer_row)),
        Records::Holders(rows) => table(
            kind,
            "Token Holders",
            rows.iter().enumerate().map(|(i, h)| holder_row(i + 1, h)),
        ),
        Records::OhlcHistory(rows) => table(kind, "Price History (OHLC)", rows.iter().map(ohlc_row)),
    }
}

fn table(kind: QueryKind, title: &str, rows: impl Iterator<Item = Vec<String>>) -> Presentation {
    Presentation::Table(TableView {
        title: title.to_string(),
        columns: columns(kind),
        rows: rows.collect(),
    })
}

fn balance_row(b: &Balance) -> Vec<String> {
    vec![
        or_na(b.symbol.as_deref()),
        or_na(b.name.as_deref()),
        amount(b.amount_formatted.as_deref(), b.amount.as_deref()),
        usd(b.price_usd, 4),
        usd(b.value_usd, 2),
        b.contract.clone().unwrap_or_default(),
    ]
}

fn transfer_row(t: &Transfer) -> Vec<String> {
    vec![
        or_na(t.datetime.as_deref()),
        t.from.clone().unwrap_or_default(),
        t.to.clone().unwrap_or_default(),
        amount(t.amount_formatted.as_deref(), t.amount.as_deref()),
        usd(t.value_usd, 2),
        t.transaction_id
            .as_deref()
            .map(short_id)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    ]
}

fn holder_row(rank: usize, h: &Holder) -> Vec<String> {
    vec![
        rank.to_string(),
        h.address.clone().unwrap_or_default(),
        amount(h.amount_formatted.as_deref(), h.amount.as_deref()),
    ]
}

fn ohlc_row(bar: &OhlcBar) -> Vec<String> {
    let price = |v: Option<f64>| v.map(|v| format!("{v:.4}")).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    vec![
        or_na(bar.datetime.as_deref()),
        or_na(bar.ticker.as_deref()),
        price(bar.open),
        price(bar.high),
        price(bar.low),
        price(bar.close),
        bar.volume
            .map(|v| group_thousands(v, 3))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    ]
}

fn token_details(info: &TokenInfo) -> DetailView {
    let title = format!(
        "Token Info: {} ({})",
        info.name.as_deref().unwrap_or(NOT_AVAILABLE),
        info.symbol.as_deref().unwrap_or(NOT_AVAILABLE)
    );
    DetailView {
        title,
        fields: vec![
            ("Name", or_na(info.name.as_deref())),
            ("Symbol", or_na(info.symbol.as_deref())),
            (
                "Decimals",
                info.decimals.map(|d| d.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            ("Contract Address", or_na(info.address.as_deref())),
            ("Network", or_na(info.network_id.as_deref())),
            (
                "Holders",
                info.holders
                    .map(|h| group_thousands(h as f64, 0))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            ("Price (USD)", usd(info.price_usd, 4)),
            (
                "Market Cap (USD)",
                info.market_cap
                    .map(|m| format!("${}", group_thousands(m.round(), 0)))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            ("Circulating Supply", or_na(info.circulating_supply.as_deref())),
        ],
    }
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn amount(formatted: Option<&str>, raw: Option<&str>) -> String {
    or_na(formatted.or(raw))
}

fn usd(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("${v:.decimals$}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `0x1234567890abcdef` -> `0x1234...cdef`
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 10 {
        return id.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Comma-grouped integer part, fractional part trimmed to `max_decimals`
pub fn group_thousands(value: f64, max_decimals: usize) -> String {
    let formatted = format!("{:.*}", max_decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (formatted.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(kind: QueryKind, items: Vec<serde_json::Value>) -> Records {
        Records::decode(kind, items).unwrap()
    }

    #[test]
    fn test_empty_result_is_indicator_not_table() {
        assert_eq!(present(&Records::Holders(vec![])), Presentation::Empty);
    }

    #[test]
    fn test_balance_row_formatting() {
        let records = decode(
            QueryKind::Balances,
            vec![json!({
                "symbol": "WETH",
                "amount": "1000000000000000000",
                "amountFormatted": "1.0",
                "price_usd": 3120.5,
                "value_usd": 3120.5,
                "contract": "0xc02a"
            })],
        );
        let Presentation::Table(table) = present(&records) else {
            panic!("expected table");
        };
        assert_eq!(table.columns.len(), 6);
        assert_eq!(
            table.rows[0],
            vec!["WETH", "N/A", "1.0", "$3120.5000", "$3120.50", "0xc02a"]
        );
    }

    #[test]
    fn test_transfer_tx_id_is_shortened() {
        let records = decode(
            QueryKind::Transfers,
            vec![json!({ "transaction_id": "0xabcdef0123456789", "amount": 12 })],
        );
        let Presentation::Table(table) = present(&records) else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0][3], "12");
        assert_eq!(table.rows[0][4], NOT_AVAILABLE);
        assert_eq!(table.rows[0][5], "0xabcd...6789");
    }

    #[test]
    fn test_holders_are_ranked_in_order() {
        let records = decode(
            QueryKind::Holders,
            vec![json!({ "address": "0xa" }), json!({ "address": "0xb" })],
        );
        let Presentation::Table(table) = present(&records) else {
            panic!("expected table");
        };
        assert_eq!(table.rows[1][0], "2");
        assert_eq!(table.rows[1][1], "0xb");
    }

    #[test]
    fn test_token_info_uses_first_record() {
        let records = decode(
            QueryKind::TokenInfo,
            vec![json!({ "name": "Graph", "symbol": "GRT", "holders": 172345, "market_cap": 1234567.8 })],
        );
        let Presentation::Details(details) = present(&records) else {
            panic!("expected details");
        };
        assert_eq!(details.title, "Token Info: Graph (GRT)");
        let lookup = |key: &str| {
            details
                .fields
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(lookup("Holders"), "172,345");
        assert_eq!(lookup("Market Cap (USD)"), "$1,234,568");
        assert_eq!(lookup("Decimals"), NOT_AVAILABLE);
    }

    #[test]
    fn test_ohlc_row_and_volume() {
        let records = decode(
            QueryKind::OhlcHistory,
            vec![json!({ "datetime": "2025-04-01", "open": 1, "close": "1.23456", "volume": 1234567.5 })],
        );
        let (columns, rows) = present(&records).to_grid().unwrap();
        assert_eq!(columns.len(), 7);
        assert_eq!(rows[0][2], "1.0000");
        assert_eq!(rows[0][3], NOT_AVAILABLE);
        assert_eq!(rows[0][5], "1.2346");
        assert_eq!(rows[0][6], "1,234,567.5");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(-1234567.0, 0), "-1,234,567");
        assert_eq!(group_thousands(12.3456, 3), "12.346");
    }
}
