//! Balance value distribution (top-N slices plus "Other")

use serde::Serialize;

use super::records::Balance;

pub const DEFAULT_TOP_N: usize = 5;
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Bucket balances by USD value.
///
/// Records without a positive USD value are dropped. The rest are ordered by
/// value, highest first, with ties kept in their original order. The first
/// `top_n` become labeled slices and the remainder is summed into one
/// [`OTHER_LABEL`] slice. An empty return means there is nothing to chart.
pub fn balance_distribution(balances: &[Balance], top_n: usize) -> Vec<Slice> {
    let mut valued: Vec<(&Balance, f64)> = balances
        .iter()
        .filter_map(|b| b.value_usd.filter(|v| v.is_finite() && *v > 0.0).map(|v| (b, v)))
        .collect();

    // sort_by is stable, so equal values keep input order
    valued.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut slices = Vec::with_capacity(top_n.min(valued.len()) + 1);
    let mut other = 0.0;
    let mut bucketed = false;
    for (index, (balance, value)) in valued.into_iter().enumerate() {
        if index < top_n {
            let label = balance
                .symbol
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("Token {}", index + 1));
            slices.push(Slice { label, value });
        } else {
            other += value;
            bucketed = true;
        }
    }

    if bucketed {
        slices.push(Slice {
            label: OTHER_LABEL.to_string(),
            value: other,
        });
    }

    slices
}

/// Share of each slice in the total, in the same order
pub fn shares(slices: &[Slice]) -> Vec<f64> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return vec![0.0; slices.len()];
    }
    slices.iter().map(|s| s.value / total).collect()
}
