pub mod action;
pub mod command;
pub mod coordinator;
pub mod tab;

pub use action::{Action, NotifyLevel};
pub use command::{parse_command, Command};
pub use coordinator::{Coordinator, Paging, PendingFetch, Settlement, Ticket, UNKNOWN_ERROR};
pub use tab::{Pagination, TabState, TransferFilter};
