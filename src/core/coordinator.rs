//! Per-tab query coordinator
//!
//! Owns one [`TabState`] per [`QueryKind`], the Transfers pagination and
//! filters, and turns "fetch this kind for this address" into a request
//! descriptor. A dispatch is split in two halves so the UI can run the
//! network call elsewhere: [`Coordinator::begin`] validates and marks the
//! tab loading, [`Coordinator::settle`] stores the outcome. Each dispatch
//! bumps the tab's generation; settling with an older ticket is ignored, so
//! the most recent dispatch always wins.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::tab::{Pagination, TabState, TransferFilter};
use crate::domain::{NetworkId, QueryKind, Records};
use crate::infrastructure::api::{
    Endpoints, Executor, FetchError, RequestDescriptor, TransferParams, MAX_AGE_DAYS, MAX_PAGE_SIZE,
};

/// Message shown when a failure carries no text of its own
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Which Transfers page a dispatch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Start over at page 1
    Fresh,
    Page(u32),
}

/// Identifies one dispatch so its completion can be matched to the tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: QueryKind,
    pub generation: u64,
}

/// A validated dispatch waiting for its network call
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub ticket: Ticket,
    pub request: RequestDescriptor,
}

/// What [`Coordinator::settle`] did with an outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// A newer dispatch exists for the tab; outcome dropped
    Stale,
    /// Result stored; `rows` is `None` when the API returned no data
    Stored { rows: Option<usize> },
    Failed(FetchError),
}

pub struct Coordinator {
    endpoints: Endpoints,
    tabs: [TabState; 5],
    active: QueryKind,
    pagination: Pagination,
    /// Page size the Transfers page on screen was requested with
    fetched_page_size: Option<u32>,
    filter: TransferFilter,
}

impl Coordinator {
    pub fn new(endpoints: Endpoints, page_size: u32) -> Self {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            endpoints,
            tabs: Default::default(),
            active: QueryKind::default(),
            pagination: Pagination::new(page_size),
            fetched_page_size: None,
            filter: TransferFilter::default(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn tab(&self, kind: QueryKind) -> &TabState {
        &self.tabs[kind.index()]
    }

    pub fn active(&self) -> QueryKind {
        self.active
    }

    pub fn active_tab(&self) -> &TabState {
        self.tab(self.active)
    }

    /// Change the displayed tab. Never fetches.
    pub fn set_active(&mut self, kind: QueryKind) {
        self.active = kind;
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Takes effect on the next Transfers dispatch. Paging restarts from
    /// page 1; next/previous stay disabled until a fresh fetch.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), FetchError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(FetchError::InvalidParameter {
                name: "limit",
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
            });
        }
        self.pagination.page_size = page_size;
        self.pagination.page = 1;
        Ok(())
    }

    pub fn filter(&self) -> &TransferFilter {
        &self.filter
    }

    pub fn set_age_filter(&mut self, age_days: Option<u32>) -> Result<(), FetchError> {
        if let Some(age) = age_days {
            if !(1..=MAX_AGE_DAYS).contains(&age) {
                return Err(FetchError::InvalidParameter {
                    name: "age",
                    reason: format!("must be between 1 and {MAX_AGE_DAYS} days, got {age}"),
                });
            }
        }
        self.filter.age_days = age_days;
        Ok(())
    }

    pub fn set_contract_filter(&mut self, contract: Option<&str>) -> Result<(), FetchError> {
        let contract = match contract.map(str::trim) {
            None => None,
            Some(c) if c.starts_with("0x") => Some(c.to_string()),
            Some(_) => return Err(FetchError::InvalidAddress { expected: "contract" }),
        };
        self.filter.contract = contract;
        Ok(())
    }

    /// Start a dispatch for `kind`.
    ///
    /// The tab is marked loading and its error cleared before validation.
    /// If the address or a parameter is rejected, the tab ends up not
    /// loading with the error stored and no result, and nothing is returned
    /// to send.
    pub fn begin(
        &mut self,
        kind: QueryKind,
        address: &str,
        network: NetworkId,
        paging: Paging,
    ) -> Result<PendingFetch, FetchError> {
        let page = match paging {
            Paging::Fresh => 1,
            Paging::Page(page) => page,
        };
        let params = TransferParams {
            page,
            page_size: self.pagination.page_size,
            age_days: self.filter.age_days,
            contract: self.filter.contract.clone(),
        };

        if kind == QueryKind::Transfers && paging == Paging::Fresh {
            self.pagination.page = 1;
        }

        let tab = &mut self.tabs[kind.index()];
        let generation = tab.bump_generation();
        tab.loading = true;
        tab.error = None;

        let request = match self.endpoints.for_kind(kind, address, network, &params) {
            Ok(request) => request,
            Err(err) => {
                warn!(%kind, error = %err, "request rejected before dispatch");
                Self::fail(tab, &err);
                return Err(err);
            }
        };

        if kind == QueryKind::Transfers {
            self.pagination.page = page;
            self.fetched_page_size = Some(params.page_size);
        }
        info!(%kind, %network, generation, url = %request.url(), "dispatching");
        Ok(PendingFetch {
            ticket: Ticket { kind, generation },
            request,
        })
    }

    /// Store the outcome of the dispatch identified by `ticket`
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<Value, FetchError>) -> Settlement {
        let tab = &mut self.tabs[ticket.kind.index()];
        if ticket.generation != tab.generation() {
            debug!(
                kind = %ticket.kind,
                stale = ticket.generation,
                current = tab.generation(),
                "discarding superseded response"
            );
            return Settlement::Stale;
        }

        tab.loading = false;
        match outcome.and_then(|payload| normalize(ticket.kind, payload)) {
            Ok(records) => {
                let rows = records.as_ref().map(Records::len);
                debug!(kind = %ticket.kind, ?rows, "stored result");
                tab.result = records;
                tab.error = None;
                Settlement::Stored { rows }
            }
            Err(err) => {
                Self::fail(tab, &err);
                Settlement::Failed(err)
            }
        }
    }

    /// Begin, execute and settle in one step
    pub async fn dispatch(
        &mut self,
        executor: &Executor,
        kind: QueryKind,
        address: &str,
        network: NetworkId,
        paging: Paging,
    ) -> Result<(), FetchError> {
        let pending = self.begin(kind, address, network, paging)?;
        let outcome = executor.execute(&pending.request).await;
        match self.settle(pending.ticket, outcome) {
            Settlement::Failed(err) => Err(err),
            Settlement::Stored { .. } | Settlement::Stale => Ok(()),
        }
    }

    /// Fetch the following Transfers page
    pub fn next_page(&mut self, wallet: &str, network: NetworkId) -> Result<PendingFetch, FetchError> {
        let next = self.pagination.page + 1;
        self.begin(QueryKind::Transfers, wallet, network, Paging::Page(next))
    }

    /// Fetch the preceding Transfers page; `None` on page 1
    pub fn previous_page(
        &mut self,
        wallet: &str,
        network: NetworkId,
    ) -> Option<Result<PendingFetch, FetchError>> {
        if self.pagination.page <= 1 {
            return None;
        }
        let previous = self.pagination.page - 1;
        Some(self.begin(QueryKind::Transfers, wallet, network, Paging::Page(previous)))
    }

    /// A full page came back, so another one may exist
    pub fn has_next_page(&self) -> bool {
        let tab = self.tab(QueryKind::Transfers);
        !tab.loading
            && self.fetched_page_size == Some(self.pagination.page_size)
            && tab
                .result
                .as_ref()
                .is_some_and(|records| records.len() >= self.pagination.page_size as usize)
    }

    pub fn has_previous_page(&self) -> bool {
        !self.tab(QueryKind::Transfers).loading && self.pagination.page > 1
    }

    fn fail(tab: &mut TabState, err: &FetchError) {
        let message = err.to_string();
        tab.error = Some(if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        });
        tab.result = None;
        tab.loading = false;
    }
}

/// Arrays pass through, a lone object becomes a one-element sequence and
/// null means no result.
fn normalize(kind: QueryKind, payload: Value) -> Result<Option<Records>, FetchError> {
    let items = match payload {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        other => vec![other],
    };
    Records::decode(kind, items)
        .map(Some)
        .map_err(|e| FetchError::Decode { cause: e.to_string() })
}
