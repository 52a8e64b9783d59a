//! Horizontal share bars for the balance distribution

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::distribution::{shares, Slice};
use crate::domain::present::group_thousands;

const EIGHTHS: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::LightGreen,
    Color::Yellow,
    Color::LightMagenta,
    Color::LightBlue,
    Color::DarkGray,
];

/// One row per slice: label, bar sized by share of the total, percentage
pub struct ShareBars<'a> {
    slices: &'a [Slice],
    label_width: usize,
}

impl<'a> ShareBars<'a> {
    pub fn new(slices: &'a [Slice]) -> Self {
        let label_width = slices
            .iter()
            .map(|s| s.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(12);
        Self { slices, label_width }
    }
}

impl<'a> Widget for ShareBars<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.slices.is_empty() {
            return;
        }

        let fractions = shares(self.slices);
        // label + space + bar + " 100.0%"
        let bar_width = (area.width as usize).saturating_sub(self.label_width + 8);

        for (i, (slice, share)) in self.slices.iter().zip(fractions).enumerate() {
            if i as u16 >= area.height {
                break;
            }
            let y = area.y + i as u16;
            let color = PALETTE[i.min(PALETTE.len() - 1)];

            let label: String = slice.label.chars().take(self.label_width).collect();
            buf.set_string(area.x, y, &label, Style::default().fg(Color::White));

            let bar = share_bar_text(share, bar_width);
            let bar_x = area.x + (self.label_width + 1) as u16;
            buf.set_string(bar_x, y, &bar, Style::default().fg(color));

            let pct_x = bar_x + bar_width as u16;
            buf.set_string(
                pct_x,
                y,
                format!(" {:>5.1}%", share * 100.0),
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}

/// A bar `width` cells wide at full share, with eighth-cell resolution
pub fn share_bar_text(share: f64, width: usize) -> String {
    if width == 0 || !share.is_finite() || share <= 0.0 {
        return " ".repeat(width);
    }

    let eighths = (share.min(1.0) * width as f64 * 8.0).round() as usize;
    let full = eighths / 8;
    let rest = eighths % 8;

    let mut bar: String = std::iter::repeat(EIGHTHS[7]).take(full).collect();
    if rest > 0 && full < width {
        bar.push(EIGHTHS[rest - 1]);
    }
    let pad = width.saturating_sub(bar.chars().count());
    bar.extend(std::iter::repeat(' ').take(pad));
    bar
}

/// `label  $1,234.56` lines, for the legend under the bars
pub fn legend_text(slices: &[Slice]) -> Vec<String> {
    slices
        .iter()
        .map(|s| {
            let rounded = (s.value * 100.0).round() / 100.0;
            let cents = format!("{:.2}", rounded);
            let decimals = cents.rsplit('.').next().unwrap_or("00");
            format!("{}  ${}.{}", s.label, group_thousands(rounded.trunc(), 0), decimals)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_bar_text_width_is_fixed() {
        assert_eq!(share_bar_text(1.0, 8), "████████");
        assert_eq!(share_bar_text(0.5, 8), "████    ");
        assert_eq!(share_bar_text(0.0, 4), "    ");
        assert_eq!(share_bar_text(0.0625, 2).chars().count(), 2);
    }

    #[test]
    fn test_share_bar_text_partial_cell() {
        // 3/16 of 2 cells = 3 eighths
        assert_eq!(share_bar_text(0.1875, 2), "▍ ");
    }

    #[test]
    fn test_legend_formats_usd() {
        let slices = vec![Slice {
            label: "ETH".to_string(),
            value: 1234.5,
        }];
        assert_eq!(legend_text(&slices), vec!["ETH  $1,234.50".to_string()]);
    }
}
