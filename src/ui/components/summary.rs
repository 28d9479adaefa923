use quizdeck::engine::mastery::chart_entries;
use quizdeck::session::SessionSnapshot;
use quizdeck::store::{LeaderboardEntry, ScoreRecord};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct SummaryPanel<'a> {
    snapshot: &'a SessionSnapshot,
    record: Option<&'a ScoreRecord>,
    leaderboard: &'a [LeaderboardEntry],
    theme: &'a Theme,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, theme: &'a Theme) -> Self {
        Self {
            snapshot,
            record: None,
            leaderboard: &[],
            theme,
        }
    }

    pub fn record(mut self, record: Option<&'a ScoreRecord>) -> Self {
        self.record = record;
        self
    }

    pub fn leaderboard(mut self, entries: &'a [LeaderboardEntry]) -> Self {
        self.leaderboard = entries;
        self
    }
}

fn format_elapsed(secs: f64) -> String {
    let secs = secs.max(0.0).round() as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let snap = self.snapshot;

        let title = if snap.completed {
            " Session Complete "
        } else {
            " Session Ended "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let heading = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(colors.text_dim());
        let fg = Style::default().fg(colors.fg());

        let mut lines = vec![
            Line::from(Span::styled(snap.test_name.clone(), heading)),
            Line::from(vec![
                Span::styled("Points   ", dim),
                Span::styled(snap.points.to_string(), fg.add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("Progress ", dim),
                Span::styled(format!("{}/{}", snap.done, snap.total), fg),
            ]),
            Line::from(vec![
                Span::styled("Time     ", dim),
                Span::styled(format_elapsed(snap.elapsed_secs), fg),
            ]),
        ];
        if snap.skipped > 0 {
            lines.push(Line::from(Span::styled(
                format!("{} malformed question(s) skipped", snap.skipped),
                Style::default().fg(colors.incorrect()),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("First-try mastery", heading)));
        let entries = chart_entries(&snap.topic_stats);
        if entries.is_empty() {
            lines.push(Line::from(Span::styled("No questions answered.", dim)));
        }
        for entry in &entries {
            let pct = entry.percent();
            let style = if pct >= 50 {
                Style::default().fg(colors.correct())
            } else {
                Style::default().fg(colors.incorrect())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:>4}% ", pct), style),
                Span::styled(entry.label.clone(), fg),
                Span::styled(format!(" ({}/{})", entry.correct, entry.total), dim),
            ]));
        }

        if let Some(record) = self.record {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("All sessions", heading)));
            lines.push(Line::from(Span::styled(
                format!(
                    "{} played, best {}, total {}",
                    record.sessions, record.best_points, record.total_points
                ),
                fg,
            )));
        }

        if !self.leaderboard.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Leaderboard", heading)));
            for (rank, entry) in self.leaderboard.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>2}. ", rank + 1), dim),
                    Span::styled(format!("{:<12}", entry.name), fg),
                    Span::styled(entry.points.to_string(), fg.add_modifier(Modifier::BOLD)),
                ]));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
