use crate::ambient::{Rgba, Surface};
use crate::page::{nav_entries, Fill, HoverLook, Page, Tone, NAV_ROWS};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
    pub(crate) italic: bool,
    pub(crate) underline: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

/* -----------------------------
   Backdrop raster
------------------------------ */

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba> for Pixel {
    fn from(c: Rgba) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: (c.a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        }
    }
}

/// Braille-backed surface: 2x4 subpixels per terminal cell.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
    scale: (f32, f32),
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
            scale: (1.0, 1.0),
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    fn to_backing(&self, p: (f32, f32)) -> (f32, f32) {
        (p.0 * self.scale.0, p.1 * self.scale.1)
    }

    fn blend_over(&mut self, x: i32, y: i32, src: Pixel) {
        if x < 0 || y < 0 || src.a == 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        let dst = self.px[i];

        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }

    /// Elliptical stamp in backing pixels; `falloff` fades alpha to the rim.
    fn stamp(&mut self, c: (f32, f32), radius: f32, color: Rgba, falloff: bool) {
        let rx = (radius * self.scale.0).max(0.5);
        let ry = (radius * self.scale.1).max(0.5);
        let x0 = (c.0 - rx).floor() as i32;
        let x1 = (c.0 + rx).ceil() as i32;
        let y0 = (c.1 - ry).floor() as i32;
        let y1 = (c.1 + ry).ceil() as i32;
        let mut hit = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x as f32 + 0.5 - c.0) / rx;
                let dy = (y as f32 + 0.5 - c.1) / ry;
                let d2 = dx * dx + dy * dy;
                if d2 > 1.0 {
                    continue;
                }
                let a = if falloff {
                    let t = 1.0 - d2.sqrt();
                    color.a * t * t
                } else {
                    color.a
                };
                self.blend_over(x, y, color.with_alpha(a).into());
                hit = true;
            }
        }
        // sub-pixel dots still leave a mark
        if !hit && !falloff {
            self.blend_over(c.0.floor() as i32, c.1.floor() as i32, color.into());
        }
    }
}

impl Surface for PixelCanvas {
    fn density(&self) -> (u32, u32) {
        (2, 4)
    }

    fn configure(&mut self, backing_w: u32, backing_h: u32, scale: (f32, f32)) {
        if backing_w != self.w || backing_h != self.h {
            *self = PixelCanvas::new(backing_w, backing_h);
        }
        self.scale = scale;
    }

    fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba) {
        let a = self.to_backing(from);
        let b = self.to_backing(to);
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as i32;
        let src = Pixel::from(color);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            self.blend_over(x.floor() as i32, y.floor() as i32, src);
        }
    }

    fn disc(&mut self, center: (f32, f32), radius: f32, color: Rgba) {
        let c = self.to_backing(center);
        self.stamp(c, radius, color, false);
    }

    fn halo(&mut self, center: (f32, f32), radius: f32, color: Rgba) {
        let c = self.to_backing(center);
        self.stamp(c, radius, color, true);
    }
}

/* -----------------------------
   Braille encoding: 2x4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

fn bayer_2x4_threshold(ix: u32, iy: u32) -> f32 {
    const M: [[u8; 2]; 4] = [[0, 4], [6, 2], [1, 5], [7, 3]];
    let v = M[(iy & 3) as usize][(ix & 1) as usize] as f32;
    (v + 0.5) / 8.0
}

/// Backdrop alpha that lights every dot in a cell.
const DITHER_FULL: f32 = 0.4;

/// Writes braille glyphs for every cell with ink; empty cells keep their
/// content. Faint ink is dithered and its colour pulled towards `bg`.
pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, enable_color: bool, bg: [u8; 3]) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        for cx in 0..cols {
            let px0 = cx * 2;
            let py0 = cy * 4;

            let mut mask: u8 = 0;
            let (mut sum_r, mut sum_g, mut sum_b) = (0u32, 0u32, 0u32);
            let mut sum_a = 0.0f32;
            let mut ink_count: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let x = px0 + dx;
                    let y = py0 + dy;
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    let a = p.a as f32 / 255.0;
                    if a > bayer_2x4_threshold(x, y) * DITHER_FULL {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        sum_a += a;
                        ink_count += 1;
                    }
                }
            }
            if mask == 0 {
                continue;
            }

            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            let fg = if enable_color {
                let n = ink_count as f32;
                let avg = [sum_r as f32 / n, sum_g as f32 / n, sum_b as f32 / n];
                let strength = 0.3 + 0.7 * (sum_a / n / 0.6).min(1.0);
                rgb(mix(bg, [avg[0] as u8, avg[1] as u8, avg[2] as u8], strength))
            } else {
                Color::Reset
            };
            let bg_color = if enable_color { rgb(bg) } else { Color::Reset };

            out.set(
                cx as u16,
                cy as u16,
                Cell {
                    ch,
                    fg,
                    bg: bg_color,
                    ..Cell::default()
                },
            );
        }
    }
}

/* -----------------------------
   Palette
------------------------------ */

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

fn mix(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t + 0.5) as u8;
    [ch(from[0], to[0]), ch(from[1], to[1]), ch(from[2], to[2])]
}

pub(crate) const PAGE_BG: [u8; 3] = [252, 250, 247];
const SAND: [u8; 3] = [245, 242, 237];
const CARD: [u8; 3] = [255, 255, 255];
const DARK: [u8; 3] = [26, 26, 26];
const BORDER: [u8; 3] = [228, 222, 213];
const ACCENT: [u8; 3] = [184, 160, 128];

#[derive(Clone, Copy, Debug)]
pub(crate) struct Palette {
    pub(crate) color: bool,
}

impl Palette {
    fn tone(&self, t: Tone) -> [u8; 3] {
        match t {
            Tone::Ink => [26, 26, 26],
            Tone::Body => [64, 60, 56],
            Tone::Muted => [112, 106, 98],
            Tone::Faint => [160, 154, 146],
            Tone::Accent => ACCENT,
            Tone::OnDark => [250, 248, 244],
            Tone::OnDarkMuted => [176, 170, 162],
        }
    }

    fn fill(&self, f: Fill) -> [u8; 3] {
        match f {
            Fill::Sand => SAND,
            Fill::Card => CARD,
            Fill::Dark => DARK,
        }
    }

    fn paint(&self, c: [u8; 3]) -> Color {
        if self.color {
            rgb(c)
        } else {
            Color::Reset
        }
    }

    /// Recovers the rgb of a painted cell background.
    fn unpaint(&self, c: Color) -> [u8; 3] {
        match c {
            Color::Rgb { r, g, b } => [r, g, b],
            _ => PAGE_BG,
        }
    }
}

/* -----------------------------
   Page drawing
------------------------------ */

/// Draws panels and text of the visible slice of the page.
pub(crate) fn draw_page(buf: &mut CellBuffer, page: &Page, scroll_row: i32, now: f32, pal: Palette) {
    let lay = page.layout();
    let hovered = page.hovered();
    let screen_rows = buf.h as i32;

    for panel in &lay.panels {
        let p = page.progress(panel.group, now);
        if p <= 0.0 {
            continue;
        }
        let top = panel.span.top - scroll_row + page.reveal_offset(panel.group, p);
        let bottom = top + panel.span.height();
        if bottom <= 0 || top >= screen_rows {
            continue;
        }
        let hover = panel.hover.filter(|(h, _)| hovered == Some(*h)).map(|(_, look)| look);
        let fill = if hover == Some(HoverLook::Invert) {
            DARK
        } else {
            pal.fill(panel.fill)
        };
        let border = match hover {
            Some(HoverLook::Lift) => ACCENT,
            _ => BORDER,
        };
        let x0 = panel.col;
        let x1 = panel.col.saturating_add(panel.width).min(buf.w);
        for y in top.max(0)..bottom.min(screen_rows) {
            for x in x0..x1 {
                let Some(under) = buf.get(x, y as u16) else {
                    continue;
                };
                let base = pal.unpaint(under.bg);
                let bg = pal.paint(mix(base, fill, p));
                // sand bands sit under the backdrop; solid cards hide it
                let c = if panel.fill == Fill::Sand && hover.is_none() {
                    Cell { bg, ..under }
                } else {
                    Cell { bg, ..Cell::default() }
                };
                buf.set(x, y as u16, c);
            }
        }
        if panel.border && panel.width >= 2 && panel.span.height() >= 2 {
            let fg = pal.paint(mix(PAGE_BG, border, p));
            draw_box(buf, x0, top, panel.width, panel.span.height(), fg, hover == Some(HoverLook::Lift));
        }
    }

    let inverted: Vec<usize> = lay
        .panels
        .iter()
        .filter_map(|p| p.hover)
        .filter(|(_, look)| *look == HoverLook::Invert)
        .map(|(h, _)| h)
        .filter(|h| hovered == Some(*h))
        .collect();

    for item in &lay.items {
        let p = page.progress(item.group, now);
        if p <= 0.0 {
            continue;
        }
        let y = item.row - scroll_row + page.reveal_offset(item.group, p);
        if y < 0 || y >= screen_rows {
            continue;
        }
        let mut style = item.style;
        if item.hover.is_some_and(|h| inverted.contains(&h)) {
            style.tone = match style.tone {
                Tone::Ink | Tone::Body => Tone::OnDark,
                Tone::Muted | Tone::Faint => Tone::OnDarkMuted,
                t => t,
            };
        }
        if !pal.color && item.hover.is_some() && item.hover == hovered {
            style.underline = true;
        }
        let tone = pal.tone(style.tone);
        for (i, ch) in item.text.chars().enumerate() {
            let x = item.col.saturating_add(i as u16);
            let Some(under) = buf.get(x, y as u16) else {
                break;
            };
            let bg = pal.unpaint(under.bg);
            buf.set(
                x,
                y as u16,
                Cell {
                    ch,
                    fg: pal.paint(mix(bg, tone, p)),
                    bg: under.bg,
                    bold: style.bold,
                    italic: style.italic,
                    underline: style.underline,
                },
            );
        }
    }
}

fn draw_box(buf: &mut CellBuffer, x0: u16, top: i32, bw: u16, bh: i32, fg: Color, heavy: bool) {
    let x1 = x0.saturating_add(bw - 1);
    let y1 = top + bh - 1;
    let (hz, vt, tl, tr, bl, br) = if heavy {
        ('━', '┃', '┏', '┓', '┗', '┛')
    } else {
        ('─', '│', '┌', '┐', '└', '┘')
    };
    let mut put = |x: u16, y: i32, ch: char| {
        if y < 0 {
            return;
        }
        if let Some(under) = buf.get(x, y as u16) {
            buf.set(x, y as u16, Cell { ch, fg, ..under });
        }
    };
    for x in x0 + 1..x1 {
        put(x, top, hz);
        put(x, y1, hz);
    }
    for y in top + 1..y1 {
        put(x0, y, vt);
        put(x1, y, vt);
    }
    put(x0, top, tl);
    put(x1, top, tr);
    put(x0, y1, bl);
    put(x1, y1, br);
}

/// Scroll depth past which the nav bar gets its solid backing.
const NAV_SOLID_AFTER: i32 = 2;

pub(crate) fn draw_nav(buf: &mut CellBuffer, scroll_row: i32, hovered: Option<usize>, pal: Palette) {
    if scroll_row > NAV_SOLID_AFTER {
        let bg = pal.paint(PAGE_BG);
        for y in 0..NAV_ROWS {
            for x in 0..buf.w {
                buf.set(x, y, Cell { bg, ..Cell::default() });
            }
        }
        let rule = pal.paint(BORDER);
        for x in 0..buf.w {
            buf.set(
                x,
                NAV_ROWS - 1,
                Cell {
                    ch: '─',
                    fg: rule,
                    bg,
                    ..Cell::default()
                },
            );
        }
    }
    for (i, (col, label, _)) in nav_entries(buf.w).into_iter().enumerate() {
        let tone = if i == 0 || hovered == Some(i) { Tone::Ink } else { Tone::Muted };
        let fg = pal.paint(if label.starts_with('[') { ACCENT } else { pal.tone(tone) });
        for (k, ch) in label.chars().enumerate() {
            let x = col.saturating_add(k as u16);
            let Some(under) = buf.get(x, 1) else {
                break;
            };
            buf.set(
                x,
                1,
                Cell {
                    ch,
                    fg,
                    bold: i == 0,
                    underline: hovered == Some(i) && i != 0,
                    ..under
                },
            );
        }
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg,
                ..Cell::default()
            },
        );
    }
}

/// Bottom line: a transient message, or the key hints.
pub(crate) fn draw_status(buf: &mut CellBuffer, msg: Option<&str>, pal: Palette) {
    let y = buf.h.saturating_sub(1);
    let (fg, bg) = if msg.is_some() {
        (pal.paint(pal.tone(Tone::OnDark)), pal.paint(DARK))
    } else {
        (pal.paint(pal.tone(Tone::Faint)), pal.paint(PAGE_BG))
    };
    for x in 0..buf.w {
        buf.set(x, y, Cell { bg, ..Cell::default() });
    }
    let text = msg.unwrap_or("↑↓ scroll · w/s/a sections · tab focus · enter open · ? help · q quit");
    draw_text(buf, 1, y, &crate::page::text::clip(text, buf.w.saturating_sub(2) as usize), fg, bg);
}

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str, pal: Palette) {
    let w = buf.w;
    let h = buf.h;
    let bw = 60.min(w.saturating_sub(4));
    let bh = 20.min(h.saturating_sub(4));
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;
    let bg = pal.paint(CARD);
    let fg = pal.paint(pal.tone(Tone::Body));

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            buf.set(x, y, Cell { bg, ..Cell::default() });
        }
    }
    draw_box(buf, x0, y0 as i32, bw, bh as i32, pal.paint(ACCENT), false);
    draw_text(buf, x0 + 2, y0 + 1, title, pal.paint(pal.tone(Tone::Ink)), bg);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        let line = crate::page::text::clip(line, bw.saturating_sub(4) as usize);
        draw_text(buf, x0 + 2, yy, &line, fg, bg);
        yy += 1;
    }
}

/* -----------------------------
   Terminal
------------------------------ */

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            // sized by the backdrop once it starts
            canvas: PixelCanvas::new(0, 0),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Resizes the cell buffers. The canvas is left to its surface owner.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_attrs = (false, false, false);

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                let attrs = (c.bold, c.italic, c.underline);
                if attrs != last_attrs {
                    // reset clears colours too
                    queue!(self.out, SetAttribute(Attribute::Reset))?;
                    last_fg = None;
                    last_bg = None;
                    if c.bold {
                        queue!(self.out, SetAttribute(Attribute::Bold))?;
                    }
                    if c.italic {
                        queue!(self.out, SetAttribute(Attribute::Italic))?;
                    }
                    if c.underline {
                        queue!(self.out, SetAttribute(Attribute::Underlined))?;
                    }
                    last_attrs = attrs;
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}
