//! Typed result records, one shape per query kind
//!
//! Every field is optional: the Token API omits fields freely and sometimes
//! ships numbers as strings. Numeric fields accept either form; anything else
//! becomes `None` rather than failing the whole record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::query::QueryKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default, deserialize_with = "lenient_string")]
    pub contract: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: Option<String>,
    #[serde(default, rename = "amountFormatted", deserialize_with = "lenient_string")]
    pub amount_formatted: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub decimals: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub network_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub decimals: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub network_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub holders: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub circulating_supply: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: Option<String>,
    #[serde(default, rename = "amountFormatted", deserialize_with = "lenient_string")]
    pub amount_formatted: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contract: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: Option<String>,
    #[serde(default, rename = "amountFormatted", deserialize_with = "lenient_string")]
    pub amount_formatted: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value_usd: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    #[serde(default, deserialize_with = "lenient_string")]
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

/// An ordered result sequence for one query kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Records {
    Balances(Vec<Balance>),
    TokenInfo(Vec<TokenInfo>),
    Transfers(Vec<Transfer>),
    Holders(Vec<Holder>),
    OhlcHistory(Vec<OhlcBar>),
}

impl Records {
    /// Decode a normalized item sequence into the record type of `kind`
    pub fn decode(kind: QueryKind, items: Vec<Value>) -> Result<Records, serde_json::Error> {
        Ok(match kind {
            QueryKind::Balances => Records::Balances(decode_all(items)?),
            QueryKind::TokenInfo => Records::TokenInfo(decode_all(items)?),
            QueryKind::Transfers => Records::Transfers(decode_all(items)?),
            QueryKind::Holders => Records::Holders(decode_all(items)?),
            QueryKind::OhlcHistory => Records::OhlcHistory(decode_all(items)?),
        })
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Records::Balances(_) => QueryKind::Balances,
            Records::TokenInfo(_) => QueryKind::TokenInfo,
            Records::Transfers(_) => QueryKind::Transfers,
            Records::Holders(_) => QueryKind::Holders,
            Records::OhlcHistory(_) => QueryKind::OhlcHistory,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Balances(rows) => rows.len(),
            Records::TokenInfo(rows) => rows.len(),
            Records::Transfers(rows) => rows.len(),
            Records::Holders(rows) => rows.len(),
            Records::OhlcHistory(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifier worth copying for a row: contract, holder address or tx id
    pub fn row_key(&self, index: usize) -> Option<&str> {
        match self {
            Records::Balances(rows) => rows.get(index)?.contract.as_deref(),
            Records::TokenInfo(rows) => rows.get(index)?.address.as_deref(),
            Records::Transfers(rows) => rows.get(index)?.transaction_id.as_deref(),
            Records::Holders(rows) => rows.get(index)?.address.as_deref(),
            Records::OhlcHistory(rows) => rows.get(index)?.datetime.as_deref(),
        }
    }
}

fn decode_all<T: for<'de> Deserialize<'de>>(items: Vec<Value>) -> Result<Vec<T>, serde_json::Error> {
    items.into_iter().map(serde_json::from_value).collect()
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}
