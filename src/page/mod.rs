//! The laid-out brand page and its interactive state.

mod layout;
pub(crate) mod text;

use crate::motion::Reveal;
use crate::visibility::{intersect, RowSpan, VisibilityTrigger};
use tracing::debug;

pub(crate) use layout::{nav_entries, NAV_ROWS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    Top,
    Work,
    Services,
    About,
}

impl Anchor {
    pub(crate) const NAV: [Anchor; 3] = [Anchor::Work, Anchor::Services, Anchor::About];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Anchor::Top => "Top",
            Anchor::Work => "Work",
            Anchor::Services => "Services",
            Anchor::About => "About",
        }
    }
}

/// Colour role, resolved against the palette at draw time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    Ink,
    Body,
    Muted,
    Faint,
    Accent,
    OnDark,
    OnDarkMuted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Style {
    pub(crate) tone: Tone,
    pub(crate) bold: bool,
    pub(crate) italic: bool,
    pub(crate) underline: bool,
}

impl Style {
    pub(crate) const fn tone(tone: Tone) -> Self {
        Self {
            tone,
            bold: false,
            italic: false,
            underline: false,
        }
    }
    pub(crate) const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
    pub(crate) const fn italic(self) -> Self {
        Self { italic: true, ..self }
    }
    pub(crate) const fn underline(self) -> Self {
        Self {
            underline: true,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fill {
    Sand,
    Card,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HoverLook {
    /// Accent border.
    Lift,
    /// Dark fill with light text.
    Invert,
}

/// What a hotspot does when activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Scroll(Anchor),
    Open(&'static str),
    ToggleDetails,
    Nothing,
}

/// A run of text at a fixed page position.
#[derive(Clone, Debug)]
pub(crate) struct Item {
    pub(crate) row: i32,
    pub(crate) col: u16,
    pub(crate) text: String,
    pub(crate) style: Style,
    pub(crate) group: Option<usize>,
    pub(crate) hover: Option<usize>,
}

/// Filled or bordered rectangle drawn beneath items.
#[derive(Clone, Debug)]
pub(crate) struct Panel {
    pub(crate) span: RowSpan,
    pub(crate) col: u16,
    pub(crate) width: u16,
    pub(crate) fill: Fill,
    pub(crate) border: bool,
    pub(crate) group: Option<usize>,
    pub(crate) hover: Option<(usize, HoverLook)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cue {
    /// Starts once the page has loaded.
    Load,
    /// Starts when the block scrolls into view.
    Scroll,
}

/// A block that enters together.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Group {
    pub(crate) span: RowSpan,
    pub(crate) reveal: Reveal,
    pub(crate) cue: Cue,
}

#[derive(Clone, Debug)]
pub(crate) struct Hotspot {
    pub(crate) span: RowSpan,
    pub(crate) col: u16,
    pub(crate) width: u16,
    pub(crate) action: Action,
    pub(crate) label: String,
}

impl Hotspot {
    fn contains(&self, row: i32, col: u16) -> bool {
        row >= self.span.top
            && row < self.span.bottom
            && col >= self.col
            && col < self.col.saturating_add(self.width)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Layout {
    pub(crate) width: u16,
    pub(crate) rows: i32,
    pub(crate) items: Vec<Item>,
    pub(crate) panels: Vec<Panel>,
    pub(crate) groups: Vec<Group>,
    pub(crate) hotspots: Vec<Hotspot>,
    pub(crate) anchors: Vec<(Anchor, i32)>,
}

impl Layout {
    pub(crate) fn anchor_row(&self, a: Anchor) -> i32 {
        self.anchors
            .iter()
            .find(|(k, _)| *k == a)
            .map(|(_, r)| *r)
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
struct RevealState {
    trigger: VisibilityTrigger,
    shown_at: Option<f32>,
}

/// Laid-out page plus everything the reader changes by interacting with it.
pub(crate) struct Page {
    layout: Layout,
    viewport_rows: u16,
    threshold: f32,
    expanded: bool,
    reveals: Vec<RevealState>,
    loaded_at: Option<f32>,
    hovered: Option<usize>,
    focused: Option<usize>,
}

impl Page {
    pub(crate) fn new(cols: u16, rows: u16, threshold: f32) -> Self {
        let layout = layout::build(cols, rows, false);
        let reveals = layout
            .groups
            .iter()
            .map(|g| {
                let mut trigger = VisibilityTrigger::new(threshold);
                if g.cue == Cue::Scroll {
                    trigger.observe();
                }
                RevealState {
                    trigger,
                    shown_at: None,
                }
            })
            .collect();
        Self {
            layout,
            viewport_rows: rows,
            threshold,
            expanded: false,
            reveals,
            loaded_at: None,
            hovered: None,
            focused: None,
        }
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn threshold(&self) -> f32 {
        self.threshold
    }

    pub(crate) fn expanded(&self) -> bool {
        self.expanded
    }

    pub(crate) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(crate) fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Last row the viewport may start at.
    pub(crate) fn max_scroll(&self) -> i32 {
        (self.layout.rows - self.viewport_rows as i32).max(0)
    }

    /// Re-lays the page out. Group count depends only on content, so reveal
    /// state carries over.
    pub(crate) fn relayout(&mut self, cols: u16, rows: u16) {
        self.viewport_rows = rows;
        self.layout = layout::build(cols, rows, self.expanded);
        debug_assert_eq!(self.layout.groups.len(), self.reveals.len());
        self.clamp_focus();
        debug!(cols, rows, total = self.layout.rows, "page laid out");
    }

    pub(crate) fn toggle_details(&mut self) {
        self.expanded = !self.expanded;
        let (cols, rows) = (self.layout.width, self.viewport_rows);
        self.relayout(cols, rows);
    }

    fn clamp_focus(&mut self) {
        let n = self.layout.hotspots.len();
        if self.focused.is_some_and(|f| f >= n) {
            self.focused = None;
        }
        if self.hovered.is_some_and(|h| h >= n) {
            self.hovered = None;
        }
    }

    /// Starts the load-in transitions. Later calls keep the first time.
    pub(crate) fn mark_loaded(&mut self, now: f32) {
        if self.loaded_at.is_none() {
            self.loaded_at = Some(now);
            for (g, st) in self.layout.groups.iter().zip(self.reveals.iter_mut()) {
                if g.cue == Cue::Load {
                    st.shown_at = Some(now);
                }
            }
        }
    }

    /// Feeds the current viewport to every observing trigger.
    pub(crate) fn observe_viewport(&mut self, scroll_row: i32, now: f32) -> usize {
        let viewport = RowSpan::new(scroll_row, self.viewport_rows as i32);
        let mut fired = 0;
        for (g, st) in self.layout.groups.iter().zip(self.reveals.iter_mut()) {
            if st.trigger.notify(intersect(g.span, viewport)) {
                st.shown_at = Some(now);
                fired += 1;
            }
        }
        fired
    }

    #[cfg(test)]
    pub(crate) fn is_revealed(&self, group: usize) -> bool {
        self.reveals.get(group).is_some_and(|r| r.shown_at.is_some())
    }

    /// Eased entrance progress of a group; ungrouped content is always shown.
    pub(crate) fn progress(&self, group: Option<usize>, now: f32) -> f32 {
        let Some(g) = group else {
            return 1.0;
        };
        match (self.layout.groups.get(g), self.reveals.get(g)) {
            (Some(grp), Some(st)) => grp.reveal.progress(st.shown_at, now),
            _ => 1.0,
        }
    }

    pub(crate) fn reveal_offset(&self, group: Option<usize>, progress: f32) -> i32 {
        group
            .and_then(|g| self.layout.groups.get(g))
            .map(|g| g.reveal.offset(progress))
            .unwrap_or(0)
    }

    /// Hotspot under a screen cell, given the scroll offset.
    pub(crate) fn hit(&self, x: u16, y: u16, scroll_row: i32) -> Option<usize> {
        if y < NAV_ROWS {
            return None;
        }
        let row = scroll_row + y as i32;
        self.layout
            .hotspots
            .iter()
            .position(|h| h.contains(row, x))
    }

    /// Nav entry under a screen cell, as an index into `nav_entries`.
    pub(crate) fn nav_hit(&self, x: u16, y: u16) -> Option<usize> {
        if y >= NAV_ROWS {
            return None;
        }
        nav_entries(self.layout.width)
            .iter()
            .position(|(col, label, _)| x >= *col && x < col + text::width(label) as u16)
    }

    pub(crate) fn set_hover(&mut self, hotspot: Option<usize>) {
        self.hovered = hotspot;
    }

    /// Moves keyboard focus and returns the row to bring into view.
    pub(crate) fn focus_step(&mut self, delta: i32) -> Option<i32> {
        let n = self.layout.hotspots.len() as i32;
        if n == 0 {
            return None;
        }
        let next = match self.focused {
            Some(f) => (f as i32 + delta).rem_euclid(n),
            None if delta >= 0 => 0,
            None => n - 1,
        } as usize;
        self.focused = Some(next);
        self.hovered = Some(next);
        Some(self.layout.hotspots[next].span.top)
    }

    pub(crate) fn hotspot(&self, idx: usize) -> Option<&Hotspot> {
        self.layout.hotspots.get(idx)
    }

    /// Blocks still waiting to scroll into view.
    pub(crate) fn pending_reveals(&self) -> usize {
        self.reveals.iter().filter(|r| r.trigger.is_observing()).count()
    }

    /// Detaches every observer. Called when the page goes away.
    pub(crate) fn unmount(&mut self) {
        let seen = self.reveals.iter().filter(|r| r.trigger.visible()).count();
        let callbacks: u32 = self.reveals.iter().map(|r| r.trigger.callbacks()).sum();
        for st in &mut self.reveals {
            st.trigger.disconnect();
        }
        debug!(seen, callbacks, "page observers disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::new(120, 40, 0.12)
    }

    #[test]
    fn test_hero_shows_on_load_not_on_scroll() {
        let mut p = page();
        let hero: Vec<usize> = p
            .layout()
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.cue == Cue::Load)
            .map(|(i, _)| i)
            .collect();
        assert!(!hero.is_empty());
        p.observe_viewport(0, 0.0);
        assert!(hero.iter().all(|g| !p.is_revealed(*g)));
        p.mark_loaded(0.5);
        assert!(hero.iter().all(|g| p.is_revealed(*g)));
    }

    #[test]
    fn test_scrolling_reveals_blocks_once() {
        let mut p = page();
        let work = p.layout().anchor_row(Anchor::Work);
        let first = p.observe_viewport(work, 1.0);
        assert!(first > 0);
        // scroll away and back: nothing re-fires
        p.observe_viewport(0, 2.0);
        assert_eq!(p.observe_viewport(work, 3.0), 0);
    }

    #[test]
    fn test_unrevealed_group_has_no_progress() {
        let mut p = page();
        let last = p.layout().groups.len() - 1;
        assert_eq!(p.progress(Some(last), 100.0), 0.0);
        let bottom = p.max_scroll();
        p.observe_viewport(bottom, 100.0);
        assert!(p.is_revealed(last));
        assert_eq!(p.progress(Some(last), 102.0), 1.0);
        assert_eq!(p.progress(None, 0.0), 1.0);
    }

    #[test]
    fn test_unmount_stops_reveals() {
        let mut p = page();
        assert!(p.pending_reveals() > 0);
        p.unmount();
        assert_eq!(p.pending_reveals(), 0);
        let bottom = p.max_scroll();
        for row in 0..=bottom {
            assert_eq!(p.observe_viewport(row, 1.0), 0);
        }
    }

    #[test]
    fn test_toggle_details_grows_page_and_keeps_groups() {
        let mut p = page();
        let rows = p.layout().rows;
        let groups = p.layout().groups.len();
        p.toggle_details();
        assert!(p.expanded());
        assert!(p.layout().rows > rows);
        assert_eq!(p.layout().groups.len(), groups);
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut p = page();
        let n = p.layout().hotspots.len();
        assert!(n > 2);
        p.focus_step(-1);
        assert_eq!(p.focused(), Some(n - 1));
        p.focus_step(1);
        assert_eq!(p.focused(), Some(0));
        assert_eq!(p.hovered(), Some(0));
    }

    #[test]
    fn test_hit_ignores_nav_rows() {
        let p = page();
        let h = &p.layout().hotspots[0];
        let (row, col) = (h.span.top, h.col);
        assert_eq!(p.hit(col, 0, row), None);
        assert_eq!(p.hit(col, NAV_ROWS, row - NAV_ROWS as i32), Some(0));
    }

    #[test]
    fn test_nav_hit_finds_entries() {
        let p = page();
        let entries = nav_entries(120);
        let (col, _, action) = &entries[1];
        assert_eq!(*action, Action::Scroll(Anchor::Work));
        assert_eq!(p.nav_hit(*col, 1), Some(1));
        assert_eq!(p.nav_hit(*col, NAV_ROWS), None);
        assert_eq!(p.nav_hit(0, 1), None);
    }
}
