use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: word list + detail column, progress bar
    Medium, // 60-99 cols: word list over a detail panel, progress bar
    Narrow, // <60 cols: word list over a short detail panel, no progress bar
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn detail_beside_list(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 20 && *self != LayoutTier::Narrow
    }

    fn detail_height(&self) -> u16 {
        match self {
            LayoutTier::Wide => 0,
            LayoutTier::Medium => 7,
            LayoutTier::Narrow => 5,
        }
    }
}

/// Regions of the browse screen.
pub struct BrowseLayout {
    pub header: Rect,
    pub search: Rect,
    pub tabs: Rect,
    pub list: Rect,
    pub detail: Rect,
    pub progress: Option<Rect>,
    pub status: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl BrowseLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let tier = LayoutTier::from_area(area);
        let show_progress = tier.show_progress_bar(area.height);

        let mut constraints = vec![
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
        ];
        if show_progress {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(footer_lines.max(1)));

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let (progress, status, footer) = if show_progress {
            (Some(vertical[4]), vertical[5], vertical[6])
        } else {
            (None, vertical[4], vertical[5])
        };

        let (list, detail) = if tier.detail_beside_list() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(vertical[3]);
            (horizontal[0], horizontal[1])
        } else {
            let stacked = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(tier.detail_height())])
                .split(vertical[3]);
            (stacked[0], stacked[1])
        };

        Self {
            header: vertical[0],
            search: vertical[1],
            tabs: vertical[2],
            list,
            detail,
            progress,
            status,
            footer,
            tier,
        }
    }
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
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
        } else {
            out.push(current);
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
    const MIN_POPUP_WIDTH: u16 = 50;
    const MIN_POPUP_HEIGHT: u16 = 7;

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
