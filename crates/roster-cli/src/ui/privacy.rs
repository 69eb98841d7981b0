//! Privacy pane: the signed-in student's field settings.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};
use roster_core::field::PrivacyField;
use strum::IntoEnumIterator;

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Privacy ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Gray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(settings) = app.privacy.as_ref() else { return };

  let items: Vec<ListItem> = PrivacyField::iter()
    .map(|field| {
      // No row means visible.
      let (mark, style) = match settings.is_private(field) {
        Some(true) => ("[private]", Style::default().fg(Color::Red)),
        Some(false) => ("[public] ", Style::default().fg(Color::Green)),
        None => ("[public] ", Style::default().fg(Color::DarkGray)),
      };
      ListItem::new(Line::from(vec![
        Span::styled(format!("{mark} "), style),
        Span::raw(field.as_str()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.privacy_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}
