//! Domain layer - query kinds, typed results and their presentation

pub mod distribution;
pub mod present;
pub mod query;
pub mod records;

pub use distribution::{balance_distribution, Slice, DEFAULT_TOP_N};
pub use present::{present, DetailView, Presentation, TableView};
pub use query::{InputMode, NetworkId, QueryKind};
pub use records::{Balance, Holder, OhlcBar, Records, TokenInfo, Transfer};
