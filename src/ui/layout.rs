use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header, body and a footer of key hints.
pub struct ScreenLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            header: vertical[0],
            body: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Split the summary body into chart and side panel. Narrow terminals
/// stack them.
pub fn summary_split(body: Rect) -> (Rect, Rect) {
    let direction = if body.width >= 80 {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let parts = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body);
    (parts[0], parts[1])
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
        }
        has_hint = true;
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[1-4] Answer", "[Esc] End", "[q] Quit"], 26);
        assert_eq!(lines, vec![" [1-4] Answer  [Esc] End", " [q] Quit"]);
        assert!(pack_hint_lines(&["x"], 0).is_empty());
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect(50, 50, area);
        assert_eq!((r.width, r.height), (40, 10));
        let big = Rect::new(0, 0, 200, 60);
        let r = centered_rect(50, 50, big);
        assert_eq!((r.x, r.y, r.width, r.height), (50, 15, 100, 30));
    }

    #[test]
    fn test_summary_split_stacks_when_narrow() {
        let (chart, side) = summary_split(Rect::new(0, 0, 60, 40));
        assert_eq!(chart.width, 60);
        assert!(side.y > chart.y);
        let (chart, side) = summary_split(Rect::new(0, 0, 100, 40));
        assert!(side.x > chart.x);
    }
}
