//! Request descriptors and the five Token API endpoint builders

use reqwest::{Method, Url};

use super::error::FetchError;
use crate::config::{ApiConfig, Credential};
use crate::domain::{InputMode, NetworkId, QueryKind};

pub const MAX_PAGE_SIZE: u32 = 1000;
pub const MAX_AGE_DAYS: u32 = 180;

/// A fully built GET request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    kind: QueryKind,
    method: Method,
    url: Url,
    credential: Option<Credential>,
}

impl RequestDescriptor {
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn bearer(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Header pairs to send; Authorization only when a credential exists
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", "application/json".to_string())];
        if let Some(credential) = &self.credential {
            headers.push(("Authorization", format!("Bearer {}", credential.expose())));
        }
        headers
    }

    /// Value of a query parameter, if present
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Transfers-only parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    pub page: u32,
    pub page_size: u32,
    pub age_days: Option<u32>,
    pub contract: Option<String>,
}

impl TransferParams {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            age_days: None,
            contract: None,
        }
    }
}

/// Endpoint builders bound to one immutable [`ApiConfig`]
#[derive(Debug, Clone)]
pub struct Endpoints {
    config: ApiConfig,
}

impl Endpoints {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /balances/evm/{wallet}?network_id=`
    pub fn balances(&self, address: &str, network: NetworkId) -> Result<RequestDescriptor, FetchError> {
        let address = validate_address(address, InputMode::Wallet.noun())?;
        self.build(QueryKind::Balances, &["balances", "evm"], address, network, &[])
    }

    /// `GET /tokens/evm/{token}?network_id=`
    pub fn token_info(&self, address: &str, network: NetworkId) -> Result<RequestDescriptor, FetchError> {
        let address = validate_address(address, InputMode::Token.noun())?;
        self.build(QueryKind::TokenInfo, &["tokens", "evm"], address, network, &[])
    }

    /// `GET /transfers/evm/{wallet}?network_id=&page=&limit=[&age=][&contract=]`
    pub fn transfers(
        &self,
        address: &str,
        network: NetworkId,
        page: u32,
        page_size: u32,
        age_days: Option<u32>,
        contract: Option<&str>,
    ) -> Result<RequestDescriptor, FetchError> {
        let address = validate_address(address, InputMode::Wallet.noun())?;
        if page < 1 {
            return Err(FetchError::InvalidParameter {
                name: "page",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(FetchError::InvalidParameter {
                name: "limit",
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
            });
        }

        let mut extra = vec![("page", page.to_string()), ("limit", page_size.to_string())];
        if let Some(age) = age_days {
            if !(1..=MAX_AGE_DAYS).contains(&age) {
                return Err(FetchError::InvalidParameter {
                    name: "age",
                    reason: format!("must be between 1 and {MAX_AGE_DAYS} days, got {age}"),
                });
            }
            extra.push(("age", age.to_string()));
        }
        if let Some(contract) = contract {
            extra.push(("contract", validate_address(contract, "contract")?.to_string()));
        }

        self.build(QueryKind::Transfers, &["transfers", "evm"], address, network, &extra)
    }

    /// `GET /holders/evm/{token}?network_id=`
    pub fn holders(&self, address: &str, network: NetworkId) -> Result<RequestDescriptor, FetchError> {
        let address = validate_address(address, InputMode::Token.noun())?;
        self.build(QueryKind::Holders, &["holders", "evm"], address, network, &[])
    }

    /// `GET /ohlc/prices/evm/{token}?network_id=`
    pub fn ohlc_history(&self, address: &str, network: NetworkId) -> Result<RequestDescriptor, FetchError> {
        let address = validate_address(address, InputMode::Token.noun())?;
        self.build(QueryKind::OhlcHistory, &["ohlc", "prices", "evm"], address, network, &[])
    }

    /// Route to the builder matching `kind`
    pub fn for_kind(
        &self,
        kind: QueryKind,
        address: &str,
        network: NetworkId,
        transfer: &TransferParams,
    ) -> Result<RequestDescriptor, FetchError> {
        match kind {
            QueryKind::Balances => self.balances(address, network),
            QueryKind::TokenInfo => self.token_info(address, network),
            QueryKind::Transfers => self.transfers(
                address,
                network,
                transfer.page,
                transfer.page_size,
                transfer.age_days,
                transfer.contract.as_deref(),
            ),
            QueryKind::Holders => self.holders(address, network),
            QueryKind::OhlcHistory => self.ohlc_history(address, network),
        }
    }

    fn build(
        &self,
        kind: QueryKind,
        segments: &[&str],
        address: &str,
        network: NetworkId,
        extra: &[(&str, String)],
    ) -> Result<RequestDescriptor, FetchError> {
        let bad_base = |reason: String| FetchError::InvalidParameter {
            name: "base_url",
            reason,
        };

        let mut url = Url::parse(&self.config.base_url).map_err(|e| bad_base(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| bad_base(format!("'{}' cannot carry a path", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments)
            .push(address);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("network_id", network.id());
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(RequestDescriptor {
            kind,
            method: Method::GET,
            url,
            credential: self.config.credential.clone(),
        })
    }
}

fn validate_address<'a>(address: &'a str, expected: &'static str) -> Result<&'a str, FetchError> {
    let trimmed = address.trim();
    if trimmed.is_empty() || !trimmed.starts_with("0x") {
        return Err(FetchError::InvalidAddress { expected });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    const WALLET: &str = "0x2a0c0dbecc7e4d658f48e01e3fa353f44050c208";
    const TOKEN: &str = "0xc944e90c64b2c07662a292be6244bdf05cda44a7";

    fn endpoints() -> Endpoints {
        Endpoints::new(ApiConfig::new(DEFAULT_BASE_URL, Credential::new("jwt-token")))
    }

    #[test]
    fn test_simple_endpoints() {
        let e = endpoints();
        assert_eq!(
            e.balances(WALLET, NetworkId::Mainnet).unwrap().url().as_str(),
            format!("{DEFAULT_BASE_URL}/balances/evm/{WALLET}?network_id=mainnet")
        );
        assert_eq!(
            e.token_info(TOKEN, NetworkId::Bsc).unwrap().url().as_str(),
            format!("{DEFAULT_BASE_URL}/tokens/evm/{TOKEN}?network_id=bsc")
        );
        assert_eq!(
            e.holders(TOKEN, NetworkId::ArbitrumOne).unwrap().url().as_str(),
            format!("{DEFAULT_BASE_URL}/holders/evm/{TOKEN}?network_id=arbitrum-one")
        );
        assert_eq!(
            e.ohlc_history(TOKEN, NetworkId::Matic).unwrap().url().as_str(),
            format!("{DEFAULT_BASE_URL}/ohlc/prices/evm/{TOKEN}?network_id=matic")
        );
    }

    #[test]
    fn test_transfers_optional_params_only_when_supplied() {
        let e = endpoints();
        let plain = e.transfers(WALLET, NetworkId::Base, 2, 25, None, None).unwrap();
        assert_eq!(
            plain.url().as_str(),
            format!("{DEFAULT_BASE_URL}/transfers/evm/{WALLET}?network_id=base&page=2&limit=25")
        );

        let filtered = e
            .transfers(WALLET, NetworkId::Base, 1, 10, Some(30), Some(TOKEN))
            .unwrap();
        assert_eq!(filtered.query("age").as_deref(), Some("30"));
        assert_eq!(filtered.query("contract").as_deref(), Some(TOKEN));
    }

    #[test]
    fn test_transfers_range_checks() {
        let e = endpoints();
        let cases = [
            (0, 10, None, "page"),
            (1, 0, None, "limit"),
            (1, 1001, None, "limit"),
            (1, 10, Some(0), "age"),
            (1, 10, Some(181), "age"),
        ];
        for (page, size, age, param) in cases {
            match e.transfers(WALLET, NetworkId::Mainnet, page, size, age, None) {
                Err(FetchError::InvalidParameter { name, .. }) => assert_eq!(name, param),
                other => panic!("expected invalid {param}, got {other:?}"),
            }
        }
        assert!(e.transfers(WALLET, NetworkId::Mainnet, 1, 1000, Some(180), None).is_ok());
    }

    #[test]
    fn test_invalid_address_names_expected_kind() {
        let e = endpoints();
        assert_eq!(
            e.balances("", NetworkId::Mainnet),
            Err(FetchError::InvalidAddress { expected: "wallet" })
        );
        assert_eq!(
            e.holders("c944e90c", NetworkId::Mainnet),
            Err(FetchError::InvalidAddress { expected: "token" })
        );
        assert_eq!(
            e.transfers(WALLET, NetworkId::Mainnet, 1, 10, None, Some("usdc")),
            Err(FetchError::InvalidAddress { expected: "contract" })
        );
    }

    #[test]
    fn test_headers_carry_bearer_and_accept() {
        let descriptor = endpoints().balances(WALLET, NetworkId::Mainnet).unwrap();
        assert_eq!(descriptor.method(), &Method::GET);
        assert_eq!(
            descriptor.headers(),
            vec![
                ("Accept", "application/json".to_string()),
                ("Authorization", "Bearer jwt-token".to_string()),
            ]
        );

        let anonymous = Endpoints::new(ApiConfig::new(DEFAULT_BASE_URL, None));
        let descriptor = anonymous.balances(WALLET, NetworkId::Mainnet).unwrap();
        assert!(descriptor.bearer().is_none());
        assert_eq!(descriptor.headers().len(), 1);
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let e = Endpoints::new(ApiConfig::new("http://127.0.0.1:9000/proxy/", None));
        let descriptor = e.token_info(TOKEN, NetworkId::Optimism).unwrap();
        assert_eq!(
            descriptor.url().as_str(),
            format!("http://127.0.0.1:9000/proxy/tokens/evm/{TOKEN}?network_id=optimism")
        );
    }
}
