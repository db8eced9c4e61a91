use crate::ambient::{DriverConfig, FrameDriver, HostRect};
use crate::config::{load_settings, project_paths, save_settings_atomic, Args, Paths, Settings};
use crate::content::BOOKING_URL;
use crate::input::{collect_input_nonblocking, map_event, UiAction};
use crate::logging;
use crate::motion::SmoothScroll;
use crate::page::{nav_entries, Action, Anchor, Page, NAV_ROWS};
use crate::render::{
    canvas_to_cells, draw_center_box, draw_nav, draw_page, draw_status, Palette, Terminal, PAGE_BG,
};
use crate::schedule::Scheduler;
use anyhow::Context;
use clap::Parser;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a status message stays up, in seconds.
const STATUS_SECS: f32 = 4.0;

pub(crate) struct App {
    settings: Settings,
    term: Terminal,
    sched: Scheduler,
    driver: FrameDriver,
    page: Page,
    scroll: SmoothScroll,
    help_open: bool,
    nav_hover: Option<usize>,
    status: Option<(String, f32)>,
    started: Instant,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let term = Terminal::begin().context("entering the alternate screen")?;
        let (cols, rows) = (term.cols, term.rows);
        let driver = FrameDriver::new(
            DriverConfig {
                node_count: settings.node_count,
                particle_count: settings.particle_count,
                link_distance: settings.link_distance,
                orbits: settings.orbits,
            },
            settings.seed,
        );
        let page = Page::new(cols, rows, settings.visibility_threshold);
        info!(cols, rows, threshold = page.threshold(), "page mounted");
        let mut scroll = SmoothScroll::default();
        scroll.set_max(page.max_scroll());

        let mut app = Self {
            settings,
            term,
            sched: Scheduler::new(),
            driver,
            page,
            scroll,
            help_open: false,
            nav_hover: None,
            status: None,
            started: Instant::now(),
            should_quit: false,
        };
        let host = app.host();
        app.driver.start(host, &mut app.term.canvas, &mut app.sched);
        Ok(app)
    }

    fn host(&self) -> Option<HostRect> {
        (self.term.cols > 0 && self.term.rows > 0).then_some(HostRect {
            cols: self.term.cols,
            rows: self.term.rows,
        })
    }

    fn now(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut last = self.now();

        while !self.should_quit {
            let frame_start = Instant::now();

            if self.term.resize_if_needed()? {
                self.on_resize();
            }

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event(ev, self.help_open) {
                    self.apply(action);
                }
                if self.should_quit {
                    break;
                }
            }

            let now = self.now();
            let dt = (now - last).max(0.0);
            last = now;

            self.page.mark_loaded(now);
            self.scroll.step(dt);
            let fired = self.page.observe_viewport(self.scroll.row(), now);
            if fired > 0 {
                debug!(fired, row = self.scroll.row(), "blocks entered view");
            }
            if self.status.as_ref().is_some_and(|(_, until)| now >= *until) {
                self.status = None;
            }

            for h in self.sched.take_frames() {
                self.driver.on_frame(h, &mut self.term.canvas, &mut self.sched);
            }

            self.render_frame(now)?;

            // frame cap
            spin_sleep(frame_dt, frame_start);
        }
        Ok(())
    }

    fn on_resize(&mut self) {
        let (cols, rows) = (self.term.cols, self.term.rows);
        if let Some(host) = self.host() {
            for id in self.sched.resize_listeners() {
                self.driver.on_resize(id, host, &mut self.term.canvas);
            }
        }
        self.page.relayout(cols, rows);
        self.scroll.set_max(self.page.max_scroll());
    }

    fn apply(&mut self, action: UiAction) {
        let screen = self.term.rows as i32 - NAV_ROWS as i32 - 1;
        match action {
            UiAction::Quit => self.should_quit = true,
            UiAction::HelpToggle => self.help_open = !self.help_open,
            UiAction::Back => self.help_open = false,
            UiAction::ScrollBy(n) => self.scroll.scroll_by(n),
            UiAction::Page(n) => self.scroll.scroll_by(n * screen.max(1)),
            UiAction::Home => self.scroll.scroll_to(0.0),
            UiAction::End => self.scroll.scroll_to(self.page.max_scroll() as f32),
            UiAction::Jump(anchor) => self.jump(anchor),
            UiAction::FocusNext | UiAction::FocusPrev => {
                let delta = if action == UiAction::FocusNext { 1 } else { -1 };
                if let Some(row) = self.page.focus_step(delta) {
                    self.bring_into_view(row);
                }
                if let Some(h) = self.page.focused().and_then(|i| self.page.hotspot(i)) {
                    let label = h.label.clone();
                    self.flash(label);
                }
                self.nav_hover = None;
            }
            UiAction::Activate => {
                if let Some(h) = self.page.focused().and_then(|i| self.page.hotspot(i)) {
                    let act = h.action;
                    self.activate(act);
                }
            }
            UiAction::ToggleDetails => self.activate(Action::ToggleDetails),
            UiAction::ShowBooking => self.activate(Action::Open(BOOKING_URL)),
            UiAction::Hover { col, row } => {
                self.nav_hover = self.page.nav_hit(col, row);
                let over = self.page.hit(col, row, self.scroll.row());
                self.page.set_hover(over);
            }
            UiAction::Click { col, row } => {
                let act = if let Some(i) = self.page.nav_hit(col, row) {
                    nav_entries(self.term.cols).get(i).map(|(_, _, a)| *a)
                } else {
                    self.page
                        .hit(col, row, self.scroll.row())
                        .and_then(|i| self.page.hotspot(i))
                        .map(|h| h.action)
                };
                if let Some(act) = act {
                    self.activate(act);
                }
            }
        }
    }

    fn activate(&mut self, action: Action) {
        match action {
            Action::Scroll(anchor) => self.jump(anchor),
            Action::Open(url) => {
                info!(url, "link activated");
                self.flash(format!("→ {url}"));
            }
            Action::ToggleDetails => {
                self.page.toggle_details();
                self.scroll.set_max(self.page.max_scroll());
                let msg = if self.page.expanded() { "details shown" } else { "details hidden" };
                self.flash(msg.to_string());
            }
            Action::Nothing => {}
        }
    }

    /// Smooth scroll to a section, leaving room for the nav bar.
    fn jump(&mut self, anchor: Anchor) {
        let row = self.page.layout().anchor_row(anchor);
        let target = if anchor == Anchor::Top { 0 } else { row - NAV_ROWS as i32 };
        debug!(?anchor, target, "jump");
        self.scroll.scroll_to(target as f32);
    }

    fn bring_into_view(&mut self, row: i32) {
        let top = self.scroll.target() as i32 + NAV_ROWS as i32;
        let bottom = self.scroll.target() as i32 + self.term.rows as i32 - 2;
        if row < top || row >= bottom {
            self.scroll.scroll_to((row - self.term.rows as i32 / 3).max(0) as f32);
        }
    }

    fn flash(&mut self, msg: String) {
        self.status = Some((msg, self.now() + STATUS_SECS));
    }

    fn render_frame(&mut self, now: f32) -> anyhow::Result<()> {
        let pal = Palette {
            color: self.settings.enable_color,
        };
        let scroll_row = self.scroll.row();
        let bg = if pal.color {
            crossterm::style::Color::Rgb {
                r: PAGE_BG[0],
                g: PAGE_BG[1],
                b: PAGE_BG[2],
            }
        } else {
            crossterm::style::Color::Reset
        };
        self.term.cur.clear(bg);

        if self.driver.is_running() {
            canvas_to_cells(&self.term.canvas, &mut self.term.cur, pal.color, PAGE_BG);
        }
        draw_page(&mut self.term.cur, &self.page, scroll_row, now, pal);
        draw_nav(&mut self.term.cur, scroll_row, self.nav_hover, pal);
        draw_status(&mut self.term.cur, self.status.as_ref().map(|(m, _)| m.as_str()), pal);

        if self.help_open {
            let body = self.help_text();
            draw_center_box(&mut self.term.cur, "Keys", &body, pal);
        }

        self.term.present(true)?;
        Ok(())
    }

    fn help_text(&self) -> String {
        let mut s = String::from(
            "↑ ↓ j k        scroll\n\
             PgUp PgDn spc  page\n\
             Home End       top / bottom\n\
             w s a t        Work / Services / About / top\n\
             Tab Shift-Tab  move focus\n\
             Enter          open focused link\n\
             i              toggle \"What's included\"\n\
             b              booking link\n\
             ? Esc          close help   q quit\n",
        );
        if let Some(sim) = self.driver.simulation() {
            let mut links = 0;
            sim.for_each_edge(self.driver.logical_size(), self.settings.link_distance, |_, _, _| {
                links += 1
            });
            s.push_str(&format!(
                "\nbackdrop: frame {}  t={:.2}  {} nodes  {} particles  {} links",
                self.driver.frames_drawn(),
                self.driver.clock(),
                sim.nodes.len(),
                sim.particles.len(),
                links
            ));
        }
        s.push_str(&format!("\n{} blocks not yet in view", self.page.pending_reveals()));
        s
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.driver.stop();
        self.page.unmount();
        self.term.end()
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let paths: Paths = project_paths()?;
    let settings = load_settings(&paths.settings_path).merge_args(&args);

    if args.write_config {
        save_settings_atomic(&paths.settings_path, &settings)?;
        println!("wrote {}", paths.settings_path.display());
        return Ok(());
    }

    let log_path = args.log_file.clone().unwrap_or(paths.log_path);
    logging::init(&log_path, &settings.log_filter)?;
    info!(fps = settings.fps_cap, seed = ?settings.seed, "brandpage starting");

    let mut app = App::init(settings)?;
    let result = app.run();
    // the terminal is restored on every exit path
    if let Err(e) = app.shutdown() {
        warn!(error = %e, "terminal restore failed");
        result?;
        return Err(e);
    }
    info!("brandpage exiting");
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
