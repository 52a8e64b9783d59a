//! Coordinator flows against a scripted transport
//!
//! Exercises dispatch end to end (builder, executor, settlement) without a
//! network: the transport records every URL it is handed and answers from a
//! fixed script.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokenboard::config::{ApiConfig, Credential, DEFAULT_BASE_URL};
use tokenboard::core::{Coordinator, Paging, Settlement};
use tokenboard::domain::{NetworkId, QueryKind};
use tokenboard::infrastructure::api::{
    Endpoints, Executor, FetchError, RawResponse, RequestDescriptor, Transport,
};

const WALLET: &str = "0x2a0c0dbecc7e4d658f48e01e3fa353f44050c208";
const TOKEN: &str = "0xc944e90c64b2c07662a292be6244bdf05cda44a7";

struct Scripted {
    status: u16,
    body: String,
    urls: Mutex<Vec<String>>,
}

impl Scripted {
    fn replying(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for Scripted {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, FetchError> {
        self.urls.lock().unwrap().push(request.url().to_string());
        Ok(RawResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

fn setup(transport: Arc<Scripted>, page_size: u32) -> (Coordinator, Executor) {
    let endpoints = Endpoints::new(ApiConfig::new(DEFAULT_BASE_URL, Credential::new("jwt")));
    (Coordinator::new(endpoints, page_size), Executor::new(transport))
}

fn address_for(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::Balances | QueryKind::Transfers => WALLET,
        _ => TOKEN,
    }
}

#[tokio::test]
async fn test_every_kind_stores_unwrapped_data() {
    for kind in QueryKind::ALL {
        let transport = Scripted::replying(200, json!({ "data": [{ "symbol": "GRT" }, { "symbol": "ETH" }] }));
        let (mut coordinator, executor) = setup(transport.clone(), 10);

        coordinator
            .dispatch(&executor, kind, address_for(kind), NetworkId::Mainnet, Paging::Fresh)
            .await
            .unwrap();

        let tab = coordinator.tab(kind);
        assert!(!tab.loading, "{kind} still loading");
        assert!(tab.error.is_none(), "{kind} has error {:?}", tab.error);
        assert_eq!(tab.row_count(), Some(2), "{kind}");
        assert_eq!(transport.urls().len(), 1);
    }
}

#[tokio::test]
async fn test_bare_object_becomes_single_record() {
    let transport = Scripted::replying(200, json!({ "data": { "name": "Graph Token", "holders": 1200 } }));
    let (mut coordinator, executor) = setup(transport, 10);

    coordinator
        .dispatch(&executor, QueryKind::TokenInfo, TOKEN, NetworkId::Mainnet, Paging::Fresh)
        .await
        .unwrap();
    assert_eq!(coordinator.tab(QueryKind::TokenInfo).row_count(), Some(1));
}

#[tokio::test]
async fn test_invalid_address_never_reaches_transport() {
    for kind in QueryKind::ALL {
        for bad in ["", "c944e90c64b2c07662a292be6244bdf05cda44a7"] {
            let transport = Scripted::replying(200, json!([]));
            let (mut coordinator, executor) = setup(transport.clone(), 10);

            let err = coordinator
                .dispatch(&executor, kind, bad, NetworkId::Mainnet, Paging::Fresh)
                .await
                .unwrap_err();
            assert!(matches!(err, FetchError::InvalidAddress { .. }));
            assert!(transport.urls().is_empty());

            let tab = coordinator.tab(kind);
            assert!(!tab.loading);
            assert!(tab.result.is_none());
            assert!(tab.error.as_deref().unwrap().contains("must start with 0x"));
        }
    }
}

#[tokio::test]
async fn test_transfers_next_page_keeps_wallet_and_network() {
    let transport = Scripted::replying(200, json!({ "data": [{}, {}, {}] }));
    let (mut coordinator, executor) = setup(transport.clone(), 3);

    coordinator
        .dispatch(&executor, QueryKind::Transfers, WALLET, NetworkId::Base, Paging::Fresh)
        .await
        .unwrap();
    assert!(coordinator.has_next_page());

    let pending = coordinator.next_page(WALLET, NetworkId::Base).unwrap();
    let outcome = executor.execute(&pending.request).await;
    coordinator.settle(pending.ticket, outcome);

    let urls = transport.urls();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].contains("page=1"));
    assert!(urls[1].contains(&format!("/transfers/evm/{WALLET}?network_id=base&page=2&limit=3")));
    assert_eq!(coordinator.pagination().page, 2);
}

#[tokio::test]
async fn test_previous_on_first_page_is_a_no_op() {
    let transport = Scripted::replying(200, json!([{}]));
    let (mut coordinator, executor) = setup(transport.clone(), 10);
    coordinator
        .dispatch(&executor, QueryKind::Transfers, WALLET, NetworkId::Mainnet, Paging::Fresh)
        .await
        .unwrap();
    let before = coordinator.tab(QueryKind::Transfers).clone();

    assert!(coordinator.previous_page(WALLET, NetworkId::Mainnet).is_none());
    assert_eq!(coordinator.tab(QueryKind::Transfers), &before);
    assert_eq!(coordinator.pagination().page, 1);
    assert_eq!(transport.urls().len(), 1);
}

#[tokio::test]
async fn test_exact_multiple_leaves_next_enabled() {
    let transport = Scripted::replying(200, json!([{}, {}]));
    let (mut coordinator, executor) = setup(transport, 2);
    coordinator
        .dispatch(&executor, QueryKind::Transfers, WALLET, NetworkId::Mainnet, Paging::Fresh)
        .await
        .unwrap();
    assert!(coordinator.has_next_page());

    // the following page comes back empty
    let pending = coordinator.next_page(WALLET, NetworkId::Mainnet).unwrap();
    coordinator.settle(pending.ticket, Ok(json!([])));
    assert_eq!(coordinator.tab(QueryKind::Transfers).row_count(), Some(0));
    assert!(!coordinator.has_next_page());
    assert!(coordinator.has_previous_page());
}

#[tokio::test]
async fn test_not_found_round_trip() {
    let transport = Scripted::replying(404, json!({ "message": "not found" }));
    let (mut coordinator, executor) = setup(transport, 10);

    let err = coordinator
        .dispatch(&executor, QueryKind::Holders, TOKEN, NetworkId::Mainnet, Paging::Fresh)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpError { status: 404, .. }));

    let tab = coordinator.tab(QueryKind::Holders);
    let message = tab.error.as_deref().unwrap();
    assert!(message.contains("404"));
    assert!(message.contains("not found"));
    assert!(tab.result.is_none());
    assert!(!tab.loading);
}

#[tokio::test]
async fn test_missing_credential_is_reported_per_tab() {
    let transport = Scripted::replying(200, json!([]));
    let endpoints = Endpoints::new(ApiConfig::new(DEFAULT_BASE_URL, None));
    let mut coordinator = Coordinator::new(endpoints, 10);
    let executor = Executor::new(transport.clone());

    let err = coordinator
        .dispatch(&executor, QueryKind::Balances, WALLET, NetworkId::Mainnet, Paging::Fresh)
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::MissingCredential);
    assert!(transport.urls().is_empty());
    assert!(coordinator
        .tab(QueryKind::Balances)
        .error
        .as_deref()
        .unwrap()
        .contains("TOKEN_API_JWT"));
    assert!(coordinator.tab(QueryKind::Holders).is_idle());
}

#[tokio::test]
async fn test_overlapping_dispatches_latest_wins() {
    let (mut coordinator, _) = setup(Scripted::replying(200, json!([])), 10);

    let first = coordinator
        .begin(QueryKind::Holders, TOKEN, NetworkId::Mainnet, Paging::Fresh)
        .unwrap();
    let second = coordinator
        .begin(QueryKind::Holders, TOKEN, NetworkId::Optimism, Paging::Fresh)
        .unwrap();

    // completions arrive out of order
    let late = coordinator.settle(second.ticket, Ok(json!([{ "address": "0xnew" }])));
    let early = coordinator.settle(first.ticket, Err(FetchError::TransportError { cause: "reset".into() }));

    assert_eq!(late, Settlement::Stored { rows: Some(1) });
    assert_eq!(early, Settlement::Stale);
    let tab = coordinator.tab(QueryKind::Holders);
    assert!(tab.error.is_none());
    assert!(!tab.loading);
    assert_eq!(tab.result.as_ref().and_then(|r| r.row_key(0)), Some("0xnew"));
}

#[tokio::test]
async fn test_tab_switching_preserves_each_tab() {
    let transport = Scripted::replying(200, json!([{ "symbol": "ETH" }]));
    let (mut coordinator, executor) = setup(transport.clone(), 10);

    coordinator
        .dispatch(&executor, QueryKind::Balances, WALLET, NetworkId::Mainnet, Paging::Fresh)
        .await
        .unwrap();
    let _ = coordinator
        .dispatch(&executor, QueryKind::Holders, "bad", NetworkId::Mainnet, Paging::Fresh)
        .await;

    for kind in [QueryKind::Holders, QueryKind::Transfers, QueryKind::Balances] {
        coordinator.set_active(kind);
    }
    assert_eq!(coordinator.tab(QueryKind::Balances).row_count(), Some(1));
    assert!(coordinator.tab(QueryKind::Holders).error.is_some());
    assert!(coordinator.tab(QueryKind::Transfers).is_idle());
    assert_eq!(transport.urls().len(), 1);
}
