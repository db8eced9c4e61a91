use super::text::{clip, width, wrap};
use super::{Action, Anchor, Cue, Fill, Group, HoverLook, Hotspot, Item, Layout, Panel, Style, Tone};
use crate::content::{
    CaseStudy, Service, ABOUT_HEADLINE, ABOUT_PARAGRAPHS, AVATAR_ROW, BOOKING_URL, BRAND,
    CASE_ROWS, CTA_BODY, CTA_HEADLINE, FEATURED_CASES, FOOTER_NOTE, HERO_BODY, HERO_HEADLINE,
    HERO_KICKER, SERVICES, SIDEBAR_FACTS, SOCIALS, STATS,
};
use crate::motion::{Reveal, FADE_IN, HERO_IN};
use crate::visibility::RowSpan;

/// Height of the fixed nav bar, in rows.
pub(crate) const NAV_ROWS: u16 = 3;
/// Below this many columns, grids collapse to a single column.
const NARROW_COLS: u16 = 90;
const SECTION_PAD: i32 = 5;
const GAP: u16 = 2;
const CARD_STAGGER: f32 = 0.08;

const INK: Style = Style::tone(Tone::Ink);
const BODY: Style = Style::tone(Tone::Body);
const MUTED: Style = Style::tone(Tone::Muted);
const FAINT: Style = Style::tone(Tone::Faint);
const ACCENT: Style = Style::tone(Tone::Accent);

type Rich = Vec<(String, Style)>;

fn rich(parts: &[(&str, Style)]) -> Rich {
    parts.iter().map(|(s, st)| (s.to_string(), *st)).collect()
}

/// Horizontal padding: about a twentieth of the width, within 3..=10.
fn side_pad(cols: u16) -> u16 {
    (cols / 20).clamp(3, 10)
}

/// Nav bar entries: (column, label, action). Shared by drawing and hit tests.
pub(crate) fn nav_entries(cols: u16) -> Vec<(u16, String, Action)> {
    let pad = side_pad(cols);
    let mut out = vec![(pad, BRAND.to_string(), Action::Scroll(Anchor::Top))];
    let mut right: Vec<(String, Action)> = Anchor::NAV
        .iter()
        .map(|a| (a.label().to_uppercase(), Action::Scroll(*a)))
        .collect();
    right.push(("[ Book a Call ]".to_string(), Action::Open(BOOKING_URL)));
    let total: usize = right.iter().map(|(s, _)| width(s)).sum::<usize>() + 3 * (right.len() - 1);
    let mut col = cols.saturating_sub(pad).saturating_sub(total as u16);
    let min_col = pad + width(BRAND) as u16 + 2;
    if col < min_col {
        // too narrow for the links; keep only the call button
        right.drain(..right.len() - 1);
        col = cols
            .saturating_sub(pad)
            .saturating_sub(width(&right[0].0) as u16)
            .max(min_col);
    }
    for (label, action) in right {
        let w = width(&label) as u16;
        out.push((col, label, action));
        col = col.saturating_add(w + 3);
    }
    out
}

struct Builder {
    lay: Layout,
    row: i32,
    pad: u16,
}

impl Builder {
    fn inner(&self) -> u16 {
        self.lay.width.saturating_sub(self.pad * 2).max(10)
    }

    fn narrow(&self) -> bool {
        self.lay.width < NARROW_COLS
    }

    fn group(&mut self, top: i32, reveal: Reveal, cue: Cue) -> usize {
        self.lay.groups.push(Group {
            span: RowSpan::new(top, 0),
            reveal,
            cue,
        });
        self.lay.groups.len() - 1
    }

    fn close_group(&mut self, g: usize, bottom: i32) {
        let span = &mut self.lay.groups[g].span;
        span.bottom = bottom.max(span.top);
    }

    fn text(&mut self, row: i32, col: u16, text: impl Into<String>, style: Style, group: Option<usize>, hover: Option<usize>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.lay.items.push(Item {
            row,
            col,
            text,
            style,
            group,
            hover,
        });
    }

    fn rich_line(&mut self, row: i32, col: u16, line: &Rich, group: Option<usize>, hover: Option<usize>) {
        let mut x = col;
        for (s, st) in line {
            self.text(row, x, s.clone(), *st, group, hover);
            x = x.saturating_add(width(s) as u16);
        }
    }

    /// Wrapped paragraph; returns rows used.
    fn para(&mut self, row: i32, col: u16, max_w: u16, s: &str, style: Style, group: Option<usize>, hover: Option<usize>) -> i32 {
        let lines = wrap(s, max_w as usize);
        let n = lines.len() as i32;
        for (i, l) in lines.into_iter().enumerate() {
            self.text(row + i as i32, col, l, style, group, hover);
        }
        n
    }

    fn centered(&mut self, row: i32, s: &str, style: Style, group: Option<usize>) {
        let w = width(s) as u16;
        let col = self.pad + self.inner().saturating_sub(w) / 2;
        self.text(row, col, s, style, group, None);
    }

    fn hotspot(&mut self, span: RowSpan, col: u16, width: u16, action: Action, label: &str) -> usize {
        self.lay.hotspots.push(Hotspot {
            span,
            col,
            width,
            action,
            label: label.to_string(),
        });
        self.lay.hotspots.len() - 1
    }

    fn panel(&mut self, span: RowSpan, col: u16, width: u16, fill: Fill, border: bool, group: Option<usize>, hover: Option<(usize, HoverLook)>) -> usize {
        self.lay.panels.push(Panel {
            span,
            col,
            width,
            fill,
            border,
            group,
            hover,
        });
        self.lay.panels.len() - 1
    }

    /// Button-like link: registers a hotspot and its label.
    fn button(&mut self, row: i32, col: u16, label: &str, style: Style, action: Action, group: Option<usize>) -> u16 {
        let text = format!("[ {label} ]");
        let w = width(&text) as u16;
        let hs = self.hotspot(RowSpan::new(row, 1), col, w, action, label);
        self.text(row, col, text, style, group, Some(hs));
        w
    }

    fn rule(&mut self, row: i32, col: u16, w: u16, group: Option<usize>) {
        self.text(row, col, "─".repeat(w as usize), FAINT, group, None);
    }

    /// Section label plus a one-line rich headline.
    fn section_head(&mut self, label: &str, headline: &[Rich]) {
        let g = self.group(self.row, FADE_IN, Cue::Scroll);
        let pad = self.pad;
        self.text(self.row, pad, label.to_uppercase(), ACCENT, Some(g), None);
        self.row += 2;
        for line in headline {
            self.rich_line(self.row, pad, line, Some(g), None);
            self.row += 1;
        }
        self.close_group(g, self.row);
        self.row += 2;
    }

    /// Splits the inner width into `n` equal columns with gaps.
    fn columns(&self, n: usize) -> (u16, Vec<u16>) {
        let inner = self.inner();
        let n16 = n.max(1) as u16;
        let w = inner.saturating_sub(GAP * (n16 - 1)) / n16;
        let cols = (0..n16).map(|i| self.pad + i * (w + GAP)).collect();
        (w, cols)
    }
}

/// Lays out the whole page for a viewport of `cols` x `rows`.
pub(crate) fn build(cols: u16, rows: u16, expanded: bool) -> Layout {
    let mut b = Builder {
        lay: Layout {
            width: cols,
            ..Layout::default()
        },
        row: 0,
        pad: side_pad(cols),
    };
    hero(&mut b, rows);
    work(&mut b);
    services(&mut b, expanded);
    about(&mut b);
    cta(&mut b);
    footer(&mut b);
    b.lay.rows = b.row;
    b.lay
}

fn hero(b: &mut Builder, viewport_rows: u16) {
    b.lay.anchors.push((Anchor::Top, 0));
    let pad = b.pad;
    let inner = b.inner();
    let mut row = NAV_ROWS as i32 + 4;

    let g = b.group(row, HERO_IN.delayed(0.1), Cue::Load);
    b.text(row, pad, clip(&HERO_KICKER.to_uppercase(), inner as usize), FAINT, Some(g), None);
    b.close_group(g, row + 1);
    row += 2;

    let g = b.group(row, HERO_IN.delayed(0.25), Cue::Load);
    b.text(row, pad, HERO_HEADLINE[0], INK.bold(), Some(g), None);
    let (lead, tail) = HERO_HEADLINE[1]
        .rsplit_once(' ')
        .unwrap_or(("", HERO_HEADLINE[1]));
    let line: Rich = vec![
        (format!("{lead} "), INK.bold()),
        (tail.to_string(), ACCENT.bold().italic()),
    ];
    b.rich_line(row + 1, pad, &line, Some(g), None);
    b.close_group(g, row + 2);
    row += 3;

    let g = b.group(row, HERO_IN.delayed(0.45), Cue::Load);
    let n = b.para(row, pad, inner.min(64), HERO_BODY, BODY, Some(g), None);
    b.close_group(g, row + n);
    row += n + 1;

    let g = b.group(row, HERO_IN.delayed(0.6), Cue::Load);
    let w = b.button(row, pad, "Work With Me", INK.bold(), Action::Open(BOOKING_URL), Some(g));
    b.button(row, pad + w + GAP, "See My Work", BODY, Action::Scroll(Anchor::Work), Some(g));
    b.close_group(g, row + 1);
    row += 2;

    let stats_top = (row + 2).max(viewport_rows as i32 - 5);
    let g = b.group(stats_top, HERO_IN.delayed(0.8), Cue::Load);
    b.rule(stats_top, pad, inner, Some(g));
    let (cw, cols) = b.columns(STATS.len());
    for (s, col) in STATS.iter().zip(cols) {
        b.text(stats_top + 2, col, s.value, INK.bold(), Some(g), None);
        b.text(stats_top + 3, col, clip(s.label, cw as usize), FAINT, Some(g), None);
    }
    b.close_group(g, stats_top + 4);
    b.row = (stats_top + 5).max(viewport_rows as i32);
}

fn case_lines(cs: &CaseStudy, w: usize) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    let client = if cs.url.is_some() { INK.bold().underline() } else { INK.bold() };
    out.extend(wrap(cs.client, w).into_iter().map(|l| (l, client)));
    out.extend(wrap(cs.result, w).into_iter().map(|l| (l, ACCENT.italic())));
    out.push((String::new(), MUTED));
    out.extend(wrap(cs.description, w).into_iter().map(|l| (l, MUTED)));
    if let Some(u) = cs.url2 {
        let short = u.trim_start_matches("https://").trim_start_matches("www.");
        out.push((String::new(), MUTED));
        out.push((clip(&format!("also {short}"), w), FAINT));
    }
    out
}

fn work(b: &mut Builder) {
    let top = b.row;
    b.lay.anchors.push((Anchor::Work, top));
    let band = b.panel(RowSpan::new(top, 0), 0, b.lay.width, Fill::Sand, false, None, None);
    b.row += SECTION_PAD;

    let headline = [rich(&[("Results that speak ", INK.bold()), ("for themselves.", INK.bold().italic())])];
    b.section_head("Selected Work", &headline);

    for (start, n) in CASE_ROWS {
        let per_row = if b.narrow() { 1 } else { n };
        let indices: Vec<usize> = (start..start + n).collect();
        for chunk in indices.chunks(per_row) {
            let (cw, cols) = b.columns(chunk.len());
            let text_w = cw.saturating_sub(4).max(8) as usize;
            let bodies: Vec<_> = chunk
                .iter()
                .map(|&i| case_lines(&FEATURED_CASES[i], text_w))
                .collect();
            // header row + blank + body, inside a border with one row of padding
            let tallest = bodies.iter().map(|l| l.len()).max().unwrap_or(0) as i32;
            let height = tallest + 6;
            let top = b.row;
            for ((&i, lines), col) in chunk.iter().zip(&bodies).zip(cols) {
                let cs = &FEATURED_CASES[i];
                let g = b.group(top, FADE_IN.delayed(i as f32 * CARD_STAGGER), Cue::Scroll);
                let action = cs.url.map(Action::Open).unwrap_or(Action::Nothing);
                let hs = b.hotspot(RowSpan::new(top, height), col, cw, action, cs.client);
                b.panel(RowSpan::new(top, height), col, cw, Fill::Card, true, Some(g), Some((hs, HoverLook::Lift)));
                let x = col + 2;
                let number = format!("0{}", i + 1);
                let cat_w = text_w.saturating_sub(width(&number) + 1);
                b.text(top + 2, x, clip(&cs.category.to_uppercase(), cat_w), ACCENT, Some(g), Some(hs));
                b.text(top + 2, x + (text_w - width(&number)) as u16, number, FAINT.italic(), Some(g), Some(hs));
                for (k, (l, st)) in lines.iter().enumerate() {
                    b.text(top + 4 + k as i32, x, l.clone(), *st, Some(g), Some(hs));
                }
                b.close_group(g, top + height);
            }
            b.row = top + height + 1;
        }
    }

    b.row += 2;
    let g = b.group(b.row, FADE_IN.delayed(0.15), Cue::Scroll);
    let pad = b.pad;
    let inner = b.inner();
    b.rule(b.row, pad, inner, Some(g));
    b.row += 2;
    b.text(b.row, pad, "ALSO WORKED WITH", FAINT, Some(g), None);
    b.row += 2;
    let mut x = pad;
    for p in &AVATAR_ROW {
        let label = format!("({}) {}", p.initials, p.name);
        let w = width(&label) as u16;
        if x > pad && x + w > pad + inner {
            x = pad;
            b.row += 2;
        }
        let hs = b.hotspot(RowSpan::new(b.row, 1), x, w, Action::Open(p.url), p.name);
        b.text(b.row, x, format!("({})", p.initials), INK.bold(), Some(g), Some(hs));
        b.text(b.row, x + width(p.initials) as u16 + 3, p.name, BODY, Some(g), Some(hs));
        x += w + 4;
    }
    b.row += 1;
    b.close_group(g, b.row);

    b.row += SECTION_PAD;
    b.lay.panels[band].span = RowSpan { top, bottom: b.row };
}

fn service_lines(s: &Service, w: usize, expanded: bool) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    out.extend(wrap(s.title, w).into_iter().map(|l| (l, INK.bold())));
    out.push((String::new(), MUTED));
    out.extend(wrap(s.tagline, w).into_iter().map(|l| (l, ACCENT.italic())));
    out.push((String::new(), MUTED));
    out.extend(wrap(s.body, w).into_iter().map(|l| (l, MUTED)));
    if !s.bullets.is_empty() {
        out.push((String::new(), MUTED));
        let toggle = if expanded { "HIDE DETAILS ▲" } else { "WHAT'S INCLUDED ▼" };
        out.push((toggle.to_string(), ACCENT));
        if expanded {
            out.push((String::new(), MUTED));
            for bullet in s.bullets {
                out.push((clip(&format!("● {bullet}"), w), MUTED));
            }
        }
    }
    out
}

fn services(b: &mut Builder, expanded: bool) {
    b.lay.anchors.push((Anchor::Services, b.row));
    b.row += SECTION_PAD;
    let headline = [rich(&[("What I ", INK.bold()), ("build", INK.bold().italic()), (" for you.", INK.bold())])];
    b.section_head("Services", &headline);

    let per_row = if b.narrow() { 1 } else { SERVICES.len() };
    let indices: Vec<usize> = (0..SERVICES.len()).collect();
    for chunk in indices.chunks(per_row) {
        let (cw, cols) = b.columns(chunk.len());
        let text_w = cw.saturating_sub(6).max(8) as usize;
        let bodies: Vec<_> = chunk
            .iter()
            .map(|&i| service_lines(&SERVICES[i], text_w, expanded))
            .collect();
        let tallest = bodies.iter().map(|l| l.len()).max().unwrap_or(0) as i32;
        let height = tallest + 6;
        let top = b.row;
        for ((&i, lines), col) in chunk.iter().zip(&bodies).zip(cols) {
            let s = &SERVICES[i];
            let delay = if i == 0 { 0.05 } else { 0.15 };
            let g = b.group(top, FADE_IN.delayed(delay), Cue::Scroll);
            let action = if s.bullets.is_empty() { Action::Nothing } else { Action::ToggleDetails };
            let hs = b.hotspot(RowSpan::new(top, height), col, cw, action, s.title);
            b.panel(RowSpan::new(top, height), col, cw, Fill::Card, true, Some(g), Some((hs, HoverLook::Invert)));
            let x = col + 3;
            b.text(top + 2, x, format!("0{}", i + 1), ACCENT.italic(), Some(g), Some(hs));
            for (k, (l, st)) in lines.iter().enumerate() {
                b.text(top + 4 + k as i32, x, l.clone(), *st, Some(g), Some(hs));
            }
            b.close_group(g, top + height);
        }
        b.row = top + height + 1;
    }
    b.row += SECTION_PAD - 1;
}

fn about(b: &mut Builder) {
    let top = b.row;
    b.lay.anchors.push((Anchor::About, top));
    let band = b.panel(RowSpan::new(top, 0), 0, b.lay.width, Fill::Sand, false, None, None);
    b.row += SECTION_PAD;

    let inner = b.inner();
    let pad = b.pad;
    let (left_w, right_col, right_w) = if b.narrow() {
        (inner, pad, inner)
    } else {
        let gap = 6;
        let left = (inner.saturating_sub(gap) as f32 * 0.6) as u16;
        (left, pad + left + gap, inner.saturating_sub(left + gap))
    };

    // left column
    let start = b.row;
    let g = b.group(start, FADE_IN, Cue::Scroll);
    let mut row = start;
    b.text(row, pad, "ABOUT", ACCENT, Some(g), None);
    row += 2;
    b.text(row, pad, clip(ABOUT_HEADLINE[0], left_w as usize), INK.bold(), Some(g), None);
    b.text(row + 1, pad, clip(ABOUT_HEADLINE[1], left_w as usize), INK.bold().italic(), Some(g), None);
    row += 3;
    for (i, p) in ABOUT_PARAGRAPHS.iter().enumerate() {
        if i > 0 {
            row += 1;
        }
        row += b.para(row, pad, left_w, p, BODY, Some(g), None);
    }
    b.close_group(g, row);
    let left_bottom = row;

    // sidebar
    let mut row = if b.narrow() { left_bottom + 2 } else { start };
    let g = b.group(row, FADE_IN.delayed(0.15), Cue::Scroll);
    let photo_h = 7;
    b.panel(RowSpan::new(row, photo_h), right_col, right_w, Fill::Dark, false, Some(g), None);
    let mid = |s: &str| right_col + right_w.saturating_sub(width(s) as u16) / 2;
    b.text(row + 2, mid("F"), "F", ACCENT.bold().italic(), Some(g), None);
    b.text(row + 4, mid("YOUR PHOTO HERE"), "YOUR PHOTO HERE", Style::tone(Tone::OnDarkMuted), Some(g), None);
    row += photo_h + 1;

    let facts_top = row;
    let fact_w = right_w.saturating_sub(6) as usize;
    let mut fr = facts_top + 1;
    for (i, fact) in SIDEBAR_FACTS.iter().enumerate() {
        b.text(fr, right_col + 3, "●", ACCENT, Some(g), None);
        let n = b.para(fr, right_col + 5, fact_w as u16, fact, Style::tone(Tone::OnDark), Some(g), None);
        fr += n;
        if i + 1 < SIDEBAR_FACTS.len() {
            fr += 1;
        }
    }
    let facts_h = fr + 1 - facts_top;
    b.panel(RowSpan::new(facts_top, facts_h), right_col, right_w, Fill::Dark, false, Some(g), None);
    row = facts_top + facts_h;
    b.close_group(g, row);

    b.row = left_bottom.max(row) + SECTION_PAD;
    b.lay.panels[band].span = RowSpan { top, bottom: b.row };
}

fn cta(b: &mut Builder) {
    b.row += SECTION_PAD + 1;
    let g = b.group(b.row, FADE_IN, Cue::Scroll);
    b.centered(b.row, "LET'S WORK TOGETHER", ACCENT, Some(g));
    b.row += 2;
    b.centered(b.row, CTA_HEADLINE[0], INK.bold(), Some(g));
    b.centered(b.row + 1, CTA_HEADLINE[1], ACCENT.bold().italic(), Some(g));
    b.row += 3;
    let body_w = b.inner().min(60) as usize;
    for line in wrap(CTA_BODY, body_w) {
        b.centered(b.row, &line, MUTED, Some(g));
        b.row += 1;
    }
    b.row += 1;
    let label = "Book a Strategy Call";
    let w = width(label) as u16 + 4;
    let col = b.pad + b.inner().saturating_sub(w) / 2;
    b.button(b.row, col, label, INK.bold(), Action::Open(BOOKING_URL), Some(g));
    b.row += 1;
    b.close_group(g, b.row);
    b.row += SECTION_PAD + 1;
}

fn footer(b: &mut Builder) {
    let w = b.lay.width;
    b.rule(b.row, 0, w, None);
    b.row += 2;
    let pad = b.pad;
    b.text(b.row, pad, FOOTER_NOTE, FAINT, None, None);
    let total: usize = SOCIALS.iter().map(|s| width(s.label)).sum::<usize>() + 3 * (SOCIALS.len() - 1);
    let mut x = w.saturating_sub(pad).saturating_sub(total as u16);
    if x < pad + width(FOOTER_NOTE) as u16 + 2 {
        b.row += 2;
        x = pad;
    }
    for s in &SOCIALS {
        let sw = width(s.label) as u16;
        let hs = b.hotspot(RowSpan::new(b.row, 1), x, sw, Action::Open(s.url), s.label);
        b.text(b.row, x, s.label, MUTED, None, Some(hs));
        x += sw + 3;
    }
    b.row += 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors_are_ordered() {
        let lay = build(120, 40, false);
        let rows: Vec<i32> = [Anchor::Top, Anchor::Work, Anchor::Services, Anchor::About]
            .iter()
            .map(|a| lay.anchor_row(*a))
            .collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]), "{rows:?}");
        assert!(lay.rows > rows[3]);
    }

    #[test]
    fn test_hero_fills_viewport() {
        let lay = build(120, 60, false);
        assert!(lay.anchor_row(Anchor::Work) >= 60);
    }

    #[test]
    fn test_items_stay_inside_width() {
        for cols in [60u16, 100, 160] {
            let lay = build(cols, 40, true);
            for it in &lay.items {
                let end = it.col as usize + width(&it.text);
                assert!(end <= cols as usize, "{cols}: {:?} ends at {end}", it.text);
            }
        }
    }

    #[test]
    fn test_narrow_layout_stacks_cards() {
        let wide = build(140, 40, false);
        let narrow = build(70, 40, false);
        assert!(narrow.rows > wide.rows);
        assert_eq!(wide.groups.len(), narrow.groups.len());
    }

    #[test]
    fn test_every_case_has_a_card_hotspot() {
        let lay = build(120, 40, false);
        for cs in &FEATURED_CASES {
            let hs = lay.hotspots.iter().find(|h| h.label == cs.client).expect("card hotspot");
            match cs.url {
                Some(u) => assert_eq!(hs.action, Action::Open(u)),
                None => assert_eq!(hs.action, Action::Nothing),
            }
        }
    }

    #[test]
    fn test_nav_entries_fit() {
        for cols in [40u16, 80, 200] {
            let entries = nav_entries(cols);
            assert!(entries.iter().any(|(_, _, a)| *a == Action::Open(BOOKING_URL)));
            for (col, label, _) in &entries {
                assert!(*col as usize + width(label) <= cols as usize || cols < 40);
            }
        }
    }
}
