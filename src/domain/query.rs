//! Query kinds, input modes and supported networks

use std::fmt;
use std::str::FromStr;

/// The five data views offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum QueryKind {
    #[default]
    Balances,
    TokenInfo,
    Transfers,
    Holders,
    OhlcHistory,
}

impl QueryKind {
    pub const ALL: [QueryKind; 5] = [
        QueryKind::Balances,
        QueryKind::TokenInfo,
        QueryKind::Transfers,
        QueryKind::Holders,
        QueryKind::OhlcHistory,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            QueryKind::Balances => "Balances",
            QueryKind::TokenInfo => "Token Info",
            QueryKind::Transfers => "Transfers",
            QueryKind::Holders => "Token Holders",
            QueryKind::OhlcHistory => "Price History (OHLC)",
        }
    }

    /// Short machine name, used for log fields and export file names
    pub fn slug(&self) -> &'static str {
        match self {
            QueryKind::Balances => "balances",
            QueryKind::TokenInfo => "token-info",
            QueryKind::Transfers => "transfers",
            QueryKind::Holders => "holders",
            QueryKind::OhlcHistory => "ohlc",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            QueryKind::Balances => '1',
            QueryKind::TokenInfo => '2',
            QueryKind::Transfers => '3',
            QueryKind::Holders => '4',
            QueryKind::OhlcHistory => '5',
        }
    }

    pub fn from_shortcut(ch: char) -> Option<QueryKind> {
        QueryKind::ALL.into_iter().find(|kind| kind.shortcut() == ch)
    }

    pub fn input_mode(&self) -> InputMode {
        match self {
            QueryKind::Balances | QueryKind::Transfers => InputMode::Wallet,
            QueryKind::TokenInfo | QueryKind::Holders | QueryKind::OhlcHistory => InputMode::Token,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            QueryKind::Balances => 0,
            QueryKind::TokenInfo => 1,
            QueryKind::Transfers => 2,
            QueryKind::Holders => 3,
            QueryKind::OhlcHistory => 4,
        }
    }

    pub fn cycle(&self, forward: bool) -> QueryKind {
        let len = QueryKind::ALL.len();
        let idx = if forward {
            (self.index() + 1) % len
        } else {
            (self.index() + len - 1) % len
        };
        QueryKind::ALL[idx]
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Which address a query kind expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Wallet,
    Token,
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Wallet => "Wallet Address",
            InputMode::Token => "Token Address",
        }
    }

    /// Noun used in validation messages ("wallet", "token")
    pub fn noun(&self) -> &'static str {
        match self {
            InputMode::Wallet => "wallet",
            InputMode::Token => "token",
        }
    }

    pub fn placeholder(&self) -> String {
        format!("Enter {} (e.g., 0x...)", self.label())
    }
}

/// EVM networks served by the Token API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkId {
    #[default]
    Mainnet,
    Bsc,
    Base,
    ArbitrumOne,
    Optimism,
    Matic,
}

impl NetworkId {
    pub const ALL: [NetworkId; 6] = [
        NetworkId::Mainnet,
        NetworkId::Bsc,
        NetworkId::Base,
        NetworkId::ArbitrumOne,
        NetworkId::Optimism,
        NetworkId::Matic,
    ];

    /// Identifier sent as `network_id`
    pub fn id(&self) -> &'static str {
        match self {
            NetworkId::Mainnet => "mainnet",
            NetworkId::Bsc => "bsc",
            NetworkId::Base => "base",
            NetworkId::ArbitrumOne => "arbitrum-one",
            NetworkId::Optimism => "optimism",
            NetworkId::Matic => "matic",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NetworkId::Mainnet => "Ethereum Mainnet",
            NetworkId::Bsc => "Binance Smart Chain",
            NetworkId::Base => "Base",
            NetworkId::ArbitrumOne => "Arbitrum One",
            NetworkId::Optimism => "Optimism",
            NetworkId::Matic => "Polygon (Matic)",
        }
    }

    pub fn cycle(&self, forward: bool) -> NetworkId {
        let len = NetworkId::ALL.len();
        let pos = NetworkId::ALL.iter().position(|n| n == self).unwrap_or(0);
        let idx = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        NetworkId::ALL[idx]
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network '{0}' (expected one of: mainnet, bsc, base, arbitrum-one, optimism, matic)")]
pub struct UnknownNetwork(pub String);

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NetworkId::ALL
            .into_iter()
            .find(|n| n.id() == wanted)
            .ok_or_else(|| UnknownNetwork(s.trim().to_string()))
    }
}
