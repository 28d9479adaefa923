use quizdeck::session::input::MAX_DIGIT_OPTIONS;
use quizdeck::session::queue::Presentation;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct QuizCard<'a> {
    presentation: &'a Presentation,
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> QuizCard<'a> {
    pub fn new(presentation: &'a Presentation, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            presentation,
            cursor,
            theme,
        }
    }

    fn option_line(&self, index: usize, text: &str) -> Line<'a> {
        let colors = &self.theme.colors;
        let p = self.presentation;

        let key = if index < MAX_DIGIT_OPTIONS {
            format!("[{}]", index + 1)
        } else {
            "   ".to_string()
        };
        let marker = if index == self.cursor && !p.resolved { ">" } else { " " };

        let (mut style, suffix) = if p.resolved && index == p.correct_index {
            (
                Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD),
                "  ✓",
            )
        } else if p.eliminated.contains(&index) {
            (
                Style::default()
                    .fg(colors.incorrect())
                    .add_modifier(Modifier::CROSSED_OUT),
                "  ✗",
            )
        } else {
            (Style::default().fg(colors.fg()), "")
        };
        if index == self.cursor && !p.resolved {
            style = style.bg(colors.selected_bg());
        }

        Line::from(vec![
            Span::styled(format!(" {marker} {key} "), Style::default().fg(colors.accent())),
            Span::styled(text.to_string(), style),
            Span::styled(suffix, style),
        ])
    }
}

impl Widget for QuizCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let p = self.presentation;

        let border = if p.resolved {
            colors.correct()
        } else {
            colors.border_focused()
        };
        let block = Block::bordered()
            .title(format!(" {} ", p.topic))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                p.text.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(
            p.options
                .iter()
                .enumerate()
                .map(|(i, opt)| self.option_line(i, opt)),
        );

        if p.resolved {
            lines.push(Line::from(""));
            let verdict = if p.first_attempt {
                Span::styled("Correct!", Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD))
            } else {
                Span::styled(
                    format!("Answer: {}", p.correct_answer()),
                    Style::default().fg(colors.correct()),
                )
            };
            lines.push(Line::from(verdict));
            if !p.explanation.trim().is_empty() {
                lines.push(Line::from(Span::styled(
                    p.explanation.clone(),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
