use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

/// Test picker shown on the start screen.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            theme,
        }
    }

    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = 0;
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizdeck",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Flashcard Quiz Runner",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        if self.items.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "The question bank has no tests.",
                Style::default().fg(colors.text_dim()),
            )))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
            return;
        }

        // Keep the selection visible when the list outgrows the area.
        let per_page = (layout[2].height / 3).max(1) as usize;
        let first = self.selected.saturating_sub(per_page - 1);
        let visible: Vec<(usize, &MenuItem)> =
            self.items.iter().enumerate().skip(first).take(per_page).collect();

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(visible.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[2]);

        for (slot, (i, item)) in visible.into_iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected { colors.accent() } else { colors.fg() })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.text_dim()))),
            ];

            if slot < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[slot], buf);
            }
        }
    }
}
