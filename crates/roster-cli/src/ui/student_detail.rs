//! Student detail pane: right panel.
//!
//! Shows whatever the server returned for this viewer. Masked values are
//! dimmed.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use roster_core::filter::HIDDEN;

use crate::{app::App, render};

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(record) = app.detail.as_ref() else { return };

  let block = Block::default()
    .title(format!(" {} ", render::list_label(record)))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = render::detail_rows(record);
  if rows.is_empty() {
    f.render_widget(
      Paragraph::new("Nothing visible.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let lines: Vec<Line> = rows
    .into_iter()
    .skip(app.detail_scroll)
    .map(|(label, value)| {
      let value_style = if value == HIDDEN {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
      } else {
        Style::default()
      };
      Line::from(vec![
        Span::styled(
          format!("{label:<18}"),
          Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, value_style),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines), inner);
}
