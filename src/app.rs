use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::core::{
    parse_command, Action, Command, Coordinator, NotifyLevel, Paging, PendingFetch, Settlement,
};
use crate::domain::{InputMode as AddressMode, NetworkId, Presentation, QueryKind};
use crate::infrastructure::RuntimeEvent;
use crate::modules::export::{export_result, ExportFormat};

const STATUS_TTL: Duration = Duration::from_secs(3);

/// What keystrokes currently go to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    /// Editing the address bound to the active tab
    EditAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    pub coordinator: Coordinator,
    pub network: NetworkId,
    pub wallet: String,
    pub token: String,
    pub input_mode: InputMode,
    pub command: CommandBar,
    /// Address being typed while in [`InputMode::EditAddress`]
    pub edit_buffer: String,
    pub status: Option<StatusMessage>,
    /// Selected row per tab
    pub selected: [usize; 5],
    pub top_n: usize,
    pub credential_configured: bool,
    pub help_open: bool,
    pub should_quit: bool,
    pending_fetches: Vec<PendingFetch>,
}

impl App {
    pub fn new(coordinator: Coordinator, network: NetworkId, wallet: String, token: String) -> Self {
        let credential_configured = coordinator.endpoints().config().credential.is_some();
        Self {
            coordinator,
            network,
            wallet,
            token,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            edit_buffer: String::new(),
            status: None,
            selected: [0; 5],
            top_n: crate::domain::DEFAULT_TOP_N,
            credential_configured,
            help_open: false,
            should_quit: false,
            pending_fetches: Vec::new(),
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    pub fn active_kind(&self) -> QueryKind {
        self.coordinator.active()
    }

    /// The address bound to `kind`'s input mode
    pub fn address_for(&self, kind: QueryKind) -> &str {
        match kind.input_mode() {
            AddressMode::Wallet => &self.wallet,
            AddressMode::Token => &self.token,
        }
    }

    pub fn active_address(&self) -> &str {
        self.address_for(self.active_kind())
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn select_tab(&mut self, kind: QueryKind) {
        self.coordinator.set_active(kind);
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        self.select_tab(self.active_kind().cycle(forward));
    }

    pub fn cycle_network(&mut self, forward: bool) {
        self.network = self.network.cycle(forward);
        self.set_status(format!("Network: {}", self.network.name()), StatusLevel::Info);
    }

    pub fn set_network(&mut self, network: NetworkId) {
        self.network = network;
        self.set_status(format!("Network: {}", network.name()), StatusLevel::Info);
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    /// Start editing the active tab's address, prefilled with its value
    pub fn begin_edit(&mut self) {
        self.edit_buffer = self.active_address().to_string();
        self.input_mode = InputMode::EditAddress;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn apply_edit(&mut self) {
        let value = std::mem::take(&mut self.edit_buffer).trim().to_string();
        let mode = self.active_kind().input_mode();
        self.set_address(mode, value);
        self.input_mode = InputMode::Normal;
    }

    fn set_address(&mut self, mode: AddressMode, value: String) {
        let label = mode.label();
        match mode {
            AddressMode::Wallet => self.wallet = value,
            AddressMode::Token => self.token = value,
        }
        self.set_status(format!("{label} updated"), StatusLevel::Info);
    }

    /// Fresh fetch for the active tab
    pub fn fetch_active(&mut self) {
        let kind = self.active_kind();
        let address = self.address_for(kind).to_string();
        let begun = self.coordinator.begin(kind, &address, self.network, Paging::Fresh);
        self.queue(kind, begun);
    }

    pub fn next_page(&mut self) {
        if self.active_kind() != QueryKind::Transfers {
            self.set_status("Paging applies to Transfers", StatusLevel::Warn);
            return;
        }
        if !self.coordinator.has_next_page() {
            self.set_status("No further pages", StatusLevel::Warn);
            return;
        }
        let wallet = self.wallet.clone();
        let begun = self.coordinator.next_page(&wallet, self.network);
        self.queue(QueryKind::Transfers, begun);
    }

    pub fn previous_page(&mut self) {
        if self.active_kind() != QueryKind::Transfers {
            self.set_status("Paging applies to Transfers", StatusLevel::Warn);
            return;
        }
        if self.coordinator.tab(QueryKind::Transfers).loading {
            return;
        }
        let wallet = self.wallet.clone();
        match self.coordinator.previous_page(&wallet, self.network) {
            Some(begun) => self.queue(QueryKind::Transfers, begun),
            None => self.set_status("Already on the first page", StatusLevel::Warn),
        }
    }

    fn queue(&mut self, kind: QueryKind, begun: Result<PendingFetch, crate::infrastructure::FetchError>) {
        match begun {
            Ok(pending) => {
                self.selected[kind.index()] = 0;
                self.set_status(format!("Fetching {}…", kind.title()), StatusLevel::Info);
                self.pending_fetches.push(pending);
            }
            Err(err) => self.set_status(err.to_string(), StatusLevel::Error),
        }
    }

    /// Fetches begun since the last call, ready to hand to the runtime
    pub fn take_pending_fetches(&mut self) -> Vec<PendingFetch> {
        std::mem::take(&mut self.pending_fetches)
    }

    pub fn apply_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Settled { ticket, outcome } => {
                let kind = ticket.kind;
                match self.coordinator.settle(ticket, outcome) {
                    Settlement::Stale => {}
                    Settlement::Stored { rows: Some(rows) } => {
                        self.clamp_selection(kind);
                        self.set_status(
                            format!("{}: {} rows", kind.title(), rows),
                            StatusLevel::Info,
                        );
                    }
                    Settlement::Stored { rows: None } => {
                        self.set_status(format!("{}: no data returned", kind.title()), StatusLevel::Warn);
                    }
                    Settlement::Failed(err) => {
                        let level = if err.is_local() { StatusLevel::Warn } else { StatusLevel::Error };
                        self.set_status(format!("{} failed: {}", kind.title(), err), level);
                    }
                }
            }
            RuntimeEvent::Error { message } => self.set_status(message, StatusLevel::Error),
        }
    }

    fn row_count(&self, kind: QueryKind) -> usize {
        match kind {
            // Detail view has no selectable rows
            QueryKind::TokenInfo => 0,
            _ => self.coordinator.tab(kind).row_count().unwrap_or(0),
        }
    }

    fn clamp_selection(&mut self, kind: QueryKind) {
        let len = self.row_count(kind);
        let selected = &mut self.selected[kind.index()];
        *selected = (*selected).min(len.saturating_sub(1));
    }

    pub fn selected_row(&self) -> usize {
        self.selected[self.active_kind().index()]
    }

    pub fn move_selection_up(&mut self) {
        let selected = &mut self.selected[self.coordinator.active().index()];
        *selected = selected.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let kind = self.active_kind();
        let len = self.row_count(kind);
        let selected = &mut self.selected[kind.index()];
        if *selected + 1 < len {
            *selected += 1;
        }
    }

    /// Identifier of the selected row, for the clipboard
    pub fn selected_key(&self) -> Option<String> {
        let kind = self.active_kind();
        let records = self.coordinator.tab(kind).result.as_ref()?;
        let index = if kind == QueryKind::TokenInfo { 0 } else { self.selected_row() };
        records.row_key(index).map(str::to_string)
    }

    /// Presentation of the active tab's result, if one is stored
    pub fn presentation(&self) -> Option<Presentation> {
        self.coordinator
            .active_tab()
            .result
            .as_ref()
            .map(crate::domain::present)
    }

    pub fn export(&mut self, format: ExportFormat) {
        let kind = self.active_kind();
        let action = export_result(
            self.coordinator.tab(kind).result.as_ref(),
            format,
            self.network,
            self.address_for(kind),
        );
        self.apply_action(action);
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        self.exit_command();
        if input.is_empty() {
            return;
        }

        debug!(command = %input, "command entered");
        let cmd = parse_command(&input);
        let action = self.execute_command(&cmd);
        self.apply_action(action);
        self.command.last = Some(input);
    }

    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Wallet(address) => {
                self.set_address(AddressMode::Wallet, address.trim().to_string());
                Action::None
            }
            Command::Token(address) => {
                self.set_address(AddressMode::Token, address.trim().to_string());
                Action::None
            }
            Command::Network(id) => match id.parse::<NetworkId>() {
                Ok(network) => {
                    self.set_network(network);
                    Action::None
                }
                Err(err) => Action::warn(err.to_string()),
            },
            Command::Limit(value) => match value.parse::<u32>() {
                Ok(size) => match self.coordinator.set_page_size(size) {
                    Ok(()) => Action::info(format!("Transfers page size: {size}, fetch to apply")),
                    Err(err) => Action::warn(err.to_string()),
                },
                Err(_) => Action::warn(format!("Invalid limit: {value}")),
            },
            Command::Age(value) => {
                let age = if is_off(value) {
                    None
                } else {
                    match value.parse::<u32>() {
                        Ok(days) => Some(days),
                        Err(_) => return Action::warn(format!("Invalid age: {value}")),
                    }
                };
                match self.coordinator.set_age_filter(age) {
                    Ok(()) => self.filter_notice(),
                    Err(err) => Action::warn(err.to_string()),
                }
            }
            Command::Contract(value) => {
                let contract = (!is_off(value)).then_some(value.as_str());
                match self.coordinator.set_contract_filter(contract) {
                    Ok(()) => self.filter_notice(),
                    Err(err) => Action::warn(err.to_string()),
                }
            }
            Command::Fetch => {
                self.fetch_active();
                Action::None
            }
            Command::Next => {
                self.next_page();
                Action::None
            }
            Command::Prev => {
                self.previous_page();
                Action::None
            }
            Command::Export(format) => {
                let format = match format.as_deref().map(str::parse::<ExportFormat>) {
                    None => ExportFormat::default(),
                    Some(Ok(format)) => format,
                    Some(Err(err)) => return Action::warn(err),
                };
                self.export(format);
                Action::None
            }
            Command::Help => Action::OpenHelp,
            Command::Quit => Action::Quit,
            Command::Unknown(s) => Action::warn(format!("Unknown command: {}", s)),
        }
    }

    fn filter_notice(&self) -> Action {
        info!(filter = %self.coordinator.filter().describe(), "transfer filter changed");
        Action::info(format!(
            "Transfers filter: {}",
            self.coordinator.filter().describe()
        ))
    }

    /// Apply an action returned by a command or module
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Notify(msg, level) => self.set_status(msg, level.into()),
            Action::OpenHelp => self.help_open = true,
            Action::Quit => self.should_quit = true,
        }
    }
}

fn is_off(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "off" | "none" | "clear")
}
