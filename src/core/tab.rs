//! Per-kind result state and Transfers pagination

use crate::domain::Records;

/// Result/loading/error slot for one query kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabState {
    /// Absent until a fetch succeeds; cleared again on failure
    pub result: Option<Records>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl TabState {
    /// Number of dispatches issued for this tab so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn row_count(&self) -> Option<usize> {
        self.result.as_ref().map(Records::len)
    }

    /// Nothing fetched yet and nothing in flight
    pub fn is_idle(&self) -> bool {
        !self.loading && self.result.is_none() && self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }
}

/// Optional Transfers filters applied to every Transfers dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferFilter {
    pub age_days: Option<u32>,
    pub contract: Option<String>,
}

impl TransferFilter {
    pub fn is_empty(&self) -> bool {
        self.age_days.is_none() && self.contract.is_none()
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(age) = self.age_days {
            parts.push(format!("age {age}d"));
        }
        if let Some(contract) = &self.contract {
            parts.push(format!("contract {contract}"));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}
