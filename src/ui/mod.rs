use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod widgets;

use crate::app::{App, InputMode, StatusLevel};
use crate::config::CREDENTIAL_ENV;
use crate::domain::present::NO_RESULTS;
use crate::domain::{balance_distribution, DetailView, Presentation, QueryKind, Records, TableView};
use widgets::share_bar::legend_text;
use widgets::ShareBars;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    tabs::draw_tab_bar(f, areas.tabs, app);
    draw_input(f, areas.input, app);
    draw_results(f, areas.main, app);
    draw_pagination(f, areas.pagination, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "Tokenboard",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Network", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ({}) ", app.network.name(), app.network.id())),
        Span::styled("API", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.coordinator.endpoints().config().base_url)),
    ]);

    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let credential = if app.credential_configured {
        Span::styled("token set", Style::default().fg(Color::LightGreen))
    } else {
        Span::styled(
            format!("{CREDENTIAL_ENV} missing"),
            Style::default().fg(Color::LightRed),
        )
    };
    let right = Paragraph::new(Line::from(vec![
        Span::styled("Auth ", Style::default().fg(Color::DarkGray)),
        credential,
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let mode = app.active_kind().input_mode();
    let editing = app.input_mode == InputMode::EditAddress;

    let content = if editing {
        Line::from(vec![
            Span::raw(app.edit_buffer.as_str()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else if app.active_address().is_empty() {
        Line::from(Span::styled(
            mode.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(app.active_address()))
    };

    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let hint = if editing { " Enter=ok Esc=cancel " } else { " e=edit f=fetch " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", mode.label()))
        .title(
            Title::from(hint)
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        );

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
    let kind = app.active_kind();
    let tab = app.coordinator.tab(kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", kind.title()));

    if tab.loading {
        let text = Paragraph::new(format!("Fetching {}…", kind.title()))
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        f.render_widget(text, area);
        return;
    }

    if let Some(error) = tab.error.as_deref() {
        let text = Paragraph::new(format!("Error: {error}"))
            .style(Style::default().fg(Color::LightRed))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(text, area);
        return;
    }

    let Some(records) = tab.result.as_ref() else {
        let hint = if tab.generation() == 0 {
            format!("Press f to fetch {} for the {}.", kind.title(), kind.input_mode().noun())
        } else {
            "The API returned no data.".to_string()
        };
        let text = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(text, area);
        return;
    };

    match crate::domain::present(records) {
        Presentation::Empty => {
            let text = Paragraph::new(NO_RESULTS)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(text, area);
        }
        Presentation::Details(details) => draw_details(f, area, &details),
        Presentation::Table(table) => {
            let slices = match records {
                Records::Balances(balances) => balance_distribution(balances, app.top_n),
                _ => Vec::new(),
            };
            if slices.is_empty() {
                draw_table(f, area, &table, app.selected_row());
            } else {
                let (table_area, chart_area) = layout::with_chart(area);
                draw_table(f, table_area, &table, app.selected_row());
                draw_distribution(f, chart_area, &slices);
            }
        }
    }
}

fn draw_table(f: &mut Frame, area: Rect, view: &TableView, selected: usize) {
    let header = Row::new(view.columns.iter().map(|c| {
        Cell::from(*c).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = view
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))));
    let widths = column_widths(view.columns.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ({}) ", view.title, view.rows.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("› ");

    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn column_widths(count: usize) -> Vec<Constraint> {
    let count = count.max(1) as u32;
    (0..count).map(|_| Constraint::Ratio(1, count)).collect()
}

fn draw_details(f: &mut Frame, area: Rect, details: &DetailView) {
    let label_width = details.fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let lines: Vec<Line> = details
        .fields
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<label_width$}  "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value.as_str()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", details.title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_distribution(f: &mut Frame, area: Rect, slices: &[crate::domain::Slice]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Value Distribution (USD) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bars_height = (slices.len() as u16).min(inner.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(bars_height), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    f.render_widget(ShareBars::new(slices), chunks[0]);
    let legend: Vec<Line> = legend_text(slices)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray))))
        .collect();
    f.render_widget(Paragraph::new(Text::from(legend)), chunks[2]);
}

fn draw_pagination(f: &mut Frame, area: Rect, app: &App) {
    if app.active_kind() != QueryKind::Transfers
        || app.coordinator.tab(QueryKind::Transfers).result.is_none()
    {
        return;
    }

    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let pagination = app.coordinator.pagination();
    let filter = app.coordinator.filter();

    let mut spans = vec![
        Span::styled(
            "‹ p Previous",
            if app.coordinator.has_previous_page() { enabled } else { disabled },
        ),
        Span::raw(format!("   Page {}   ", pagination.page)),
        Span::styled(
            "Next n ›",
            if app.coordinator.has_next_page() { enabled } else { disabled },
        ),
        Span::styled(
            format!("   {} per page", pagination.page_size),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !filter.is_empty() {
        spans.push(Span::styled("   Filter ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(filter.describe()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let kind = app.active_kind();
    let tab = app.coordinator.tab(kind);
    let rows = tab
        .row_count()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "--".to_string());

    let mut spans = vec![
        Span::styled("Tab ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", kind.title())),
        Span::styled("Rows ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", rows)),
        Span::styled("Wallet ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", short_addr(&app.wallet))),
        Span::styled("Token ", Style::default().fg(Color::DarkGray)),
        Span::raw(short_addr(&app.token)),
    ];
    let in_flight = QueryKind::ALL
        .iter()
        .filter(|k| app.coordinator.tab(**k).loading)
        .count();
    if in_flight > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("Loading ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(in_flight.to_string(), Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }
    let word = input.split_whitespace().next().unwrap_or("");

    let commands = [
        ("wallet", "wallet <0x…>  set wallet address"),
        ("token", "token <0x…>  set token address"),
        ("network", "network <id>  mainnet bsc base arbitrum-one optimism matic"),
        ("limit", "limit <1-1000>  Transfers page size"),
        ("age", "age <1-180|off>  Transfers age filter (days)"),
        ("contract", "contract <0x…|off>  Transfers contract filter"),
        ("fetch", "fetch active tab"),
        ("next", "next Transfers page"),
        ("prev", "previous Transfers page"),
        ("export", "export [csv|json]"),
        ("help", "show keys"),
        ("quit", "exit"),
    ];

    commands
        .iter()
        .find(|(cmd, _)| cmd.starts_with(word))
        .map(|(_, desc)| *desc)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint_text = command_hint(&app.command.input).unwrap_or("wallet token network limit age contract fetch export");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(&app.command.input),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::EditAddress => Line::from(Span::styled(
            format!("Editing {} (Enter=ok Esc=cancel)", app.active_kind().input_mode().label()),
            Style::default().fg(Color::DarkGray),
        )),
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints()
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints() -> Line<'static> {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("1-5", key),
        Span::styled(" tabs  ", text),
        Span::styled("[ ]", key),
        Span::styled(" network  ", text),
        Span::styled("e", key),
        Span::styled(" edit  ", text),
        Span::styled("f", key),
        Span::styled(" fetch  ", text),
        Span::styled("n/p", key),
        Span::styled(" page  ", text),
        Span::styled("y", key),
        Span::styled(" copy  ", text),
        Span::styled("x/X", key),
        Span::styled(" export  ", text),
        Span::styled(":", key),
        Span::styled(" command  ", text),
        Span::styled("?", key),
        Span::styled(" help", text),
    ])
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Tabs"),
        Line::from("  1-5        Balances / Token Info / Transfers / Holders / OHLC"),
        Line::from("  Tab S-Tab  Next / previous tab"),
        Line::from("  [ / ]      Previous / next network"),
        Line::from(""),
        Line::from("Query"),
        Line::from("  e          Edit address for this tab"),
        Line::from("  f / Enter  Fetch"),
        Line::from("  n / p      Next / previous Transfers page"),
        Line::from("  j / k      Move selection"),
        Line::from("  y          Copy selected address / tx id"),
        Line::from("  x / X      Export CSV / JSON"),
        Line::from("  :          Command line"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :wallet 0x…   :token 0x…   :network base"),
        Line::from("  :limit 50     :age 30      :contract 0x… | off"),
        Line::from("  :export json"),
        Line::from(""),
        Line::from(format!(
            "Transfers filter: {}",
            app.coordinator.filter().describe()
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn short_addr(value: &str) -> String {
    if value.is_empty() {
        return "--".to_string();
    }
    crate::domain::present::short_id(value)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, Credential, DEFAULT_BASE_URL, DEFAULT_TOKEN, DEFAULT_WALLET};
    use crate::core::Coordinator;
    use crate::domain::NetworkId;
    use crate::infrastructure::{Endpoints, RuntimeEvent};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let endpoints = Endpoints::new(ApiConfig::new(DEFAULT_BASE_URL, Credential::new("jwt")));
        App::new(
            Coordinator::new(endpoints, 10),
            NetworkId::Mainnet,
            DEFAULT_WALLET.to_string(),
            DEFAULT_TOKEN.to_string(),
        )
    }

    #[test]
    fn test_idle_tab_shows_fetch_hint() {
        let screen = render(&app());
        assert!(screen.contains("Tokenboard"));
        assert!(screen.contains("Wallet Address"));
        assert!(screen.contains("Press f to fetch Balances"));
    }

    #[test]
    fn test_balances_render_table_and_distribution() {
        let mut app = app();
        app.fetch_active();
        for pending in app.take_pending_fetches() {
            app.apply_event(RuntimeEvent::Settled {
                ticket: pending.ticket,
                outcome: Ok(json!([
                    { "symbol": "ETH", "value_usd": 900.0 },
                    { "symbol": "GRT", "value_usd": 100.0 }
                ])),
            });
        }
        let screen = render(&app);
        assert!(screen.contains("Token Balances (2)"));
        assert!(screen.contains("Value Distribution"));
        assert!(screen.contains("90.0%"));
    }

    #[test]
    fn test_empty_result_shows_indicator() {
        let mut app = app();
        app.select_tab(QueryKind::Holders);
        app.fetch_active();
        for pending in app.take_pending_fetches() {
            app.apply_event(RuntimeEvent::Settled {
                ticket: pending.ticket,
                outcome: Ok(json!([])),
            });
        }
        assert!(render(&app).contains(NO_RESULTS));
    }

    #[test]
    fn test_command_hint_matches_prefix() {
        assert_eq!(command_hint("net"), Some("network <id>  mainnet bsc base arbitrum-one optimism matic"));
        assert_eq!(command_hint(""), None);
        assert_eq!(command_hint("zzz"), None);
    }
}
