//! Student list pane: left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use roster_core::filter::ViewRecord;

use crate::{
  app::{App, Screen},
  render,
};

fn item(record: &ViewRecord) -> ListItem<'static> {
  let label = render::list_label(record);
  let style = if render::visible_name(record).is_some() {
    Style::default()
  } else {
    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
  };
  let mut spans = vec![Span::styled(label, style)];
  if let Some(year) = record.get("year_of_admission").and_then(|v| v.as_i64()) {
    spans.push(Span::styled(format!("  '{:02}", year % 100), Style::default().fg(Color::DarkGray)));
  }
  ListItem::new(Line::from(spans))
}

/// Render the student list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_students();
  let total = app.students.len();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Students ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Students ({total}) ")
  };

  let border = if app.screen == Screen::StudentList { Color::Gray } else { Color::DarkGray };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let items: Vec<ListItem> = filtered.iter().map(|r| item(r)).collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let cursor = if app.filter_active { "_" } else { "" };
    f.render_widget(
      Paragraph::new(format!("/{}{cursor}", app.filter)).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select((!filtered.is_empty()).then_some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
