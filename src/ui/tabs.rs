//! Tab bar rendering

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs as RataTabs;
use ratatui::Frame;

use crate::app::App;
use crate::domain::QueryKind;

/// Draw the query-kind tab bar; a marker flags tabs with a fetch in flight
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = QueryKind::ALL
        .iter()
        .map(|kind| {
            let tab = app.coordinator.tab(*kind);
            let marker = if tab.loading {
                Span::styled(" ⟳", Style::default().fg(Color::Yellow))
            } else if tab.error.is_some() {
                Span::styled(" !", Style::default().fg(Color::LightRed))
            } else {
                Span::raw("")
            };
            Line::from(vec![
                Span::styled(
                    format!("{}:", kind.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(kind.title()),
                marker,
            ])
        })
        .collect();

    let tabs = RataTabs::new(titles)
        .select(app.active_kind().index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}
