use super::sim::Simulation;
use super::surface::{Rgba, Surface};
use crate::schedule::{CancelToken, FrameHandle, ListenerId, Scheduler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::TAU;
use tracing::{debug, info};

/// Logical size of one terminal cell. The link distance and all drawing
/// sizes are expressed in these units.
pub(crate) const CELL_PX: (f32, f32) = (8.0, 16.0);

/// Logical clock advance per frame.
pub(crate) const TIME_STEP: f64 = 0.016;

const NODE_COLOR: Rgba = Rgba::rgb(184, 160, 128);
const EDGE_COLOR: Rgba = Rgba::rgb(184, 160, 128);
const PARTICLE_COLOR: Rgba = Rgba::rgb(150, 130, 104);
const ORBIT_COLOR: Rgba = Rgba::rgb(120, 110, 96);

// (radius scale, aspect, rotation rate) per decorative ellipse
const ORBITS: [(f32, f32, f32); 3] = [(0.22, 0.45, 0.05), (0.31, 0.38, -0.035), (0.42, 0.30, 0.02)];
const ORBIT_SEGMENTS: usize = 96;
const ORBIT_FOCUS: (f32, f32) = (0.72, 0.42);

/// Terminal-cell rectangle the backdrop fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HostRect {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

#[derive(Clone, Debug)]
pub(crate) struct DriverConfig {
    pub(crate) node_count: usize,
    pub(crate) particle_count: usize,
    pub(crate) link_distance: f32,
    pub(crate) orbits: bool,
}

pub(crate) struct FrameDriver {
    config: DriverConfig,
    rng: StdRng,
    sim: Option<Simulation>,
    logical: (f32, f32),
    clock: f64,
    pending: Option<FrameHandle>,
    listener: Option<ListenerId>,
    token: Option<CancelToken>,
    frames_drawn: u64,
}

impl FrameDriver {
    pub(crate) fn new(config: DriverConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            sim: None,
            logical: (0.0, 0.0),
            clock: 0.0,
            pending: None,
            listener: None,
            token: None,
            frames_drawn: 0,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    pub(crate) fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub(crate) fn logical_size(&self) -> (f32, f32) {
        self.logical
    }

    pub(crate) fn clock(&self) -> f64 {
        self.clock
    }

    /// Clock narrowed for the trig in the draw and update steps.
    fn t(&self) -> f32 {
        self.clock as f32
    }

    pub(crate) fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Mounts the backdrop. A missing host leaves the driver idle.
    pub(crate) fn start(
        &mut self,
        host: Option<HostRect>,
        surface: &mut dyn Surface,
        sched: &mut Scheduler,
    ) {
        let Some(host) = host else {
            debug!("backdrop has no host; not starting");
            return;
        };
        if self.is_running() {
            self.stop();
        }
        self.measure(host, surface);
        self.sim = Some(Simulation::new(
            self.config.node_count,
            self.config.particle_count,
            &mut self.rng,
        ));
        self.clock = 0.0;
        let token = CancelToken::new();
        self.listener = Some(sched.add_resize_listener(&token));
        self.pending = Some(sched.request_frame(&token));
        self.token = Some(token);
        info!(
            nodes = self.config.node_count,
            particles = self.config.particle_count,
            cols = host.cols,
            rows = host.rows,
            "backdrop started"
        );
    }

    /// Cancels the token, which withdraws the pending frame and the resize
    /// listener from the scheduler. Safe to call more than once.
    pub(crate) fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.pending = None;
        self.listener = None;
        if self.sim.take().is_some() {
            info!(frames = self.frames_drawn, "backdrop stopped");
        }
    }

    pub(crate) fn on_resize(&mut self, id: ListenerId, host: HostRect, surface: &mut dyn Surface) {
        if self.listener != Some(id) || !self.is_running() {
            return;
        }
        debug!(cols = host.cols, rows = host.rows, "backdrop re-measured");
        self.measure(host, surface);
    }

    fn measure(&mut self, host: HostRect, surface: &mut dyn Surface) {
        let (dx, dy) = surface.density();
        let logical = (host.cols as f32 * CELL_PX.0, host.rows as f32 * CELL_PX.1);
        let backing_w = host.cols as u32 * dx;
        let backing_h = host.rows as u32 * dy;
        let scale = (
            if logical.0 > 0.0 { backing_w as f32 / logical.0 } else { 0.0 },
            if logical.1 > 0.0 { backing_h as f32 / logical.1 } else { 0.0 },
        );
        surface.configure(backing_w, backing_h, scale);
        self.logical = logical;
    }

    /// Runs one frame if `handle` is the request this driver is waiting on.
    /// Returns whether a frame was drawn.
    pub(crate) fn on_frame(
        &mut self,
        handle: FrameHandle,
        surface: &mut dyn Surface,
        sched: &mut Scheduler,
    ) -> bool {
        let Some(token) = self.token.clone().filter(|t| !t.is_cancelled()) else {
            return false;
        };
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        let Some(mut sim) = self.sim.take() else {
            return false;
        };

        self.clock += TIME_STEP;
        let t = self.t();
        surface.clear();

        sim.update_nodes(t);
        self.draw_edges(&sim, surface);
        self.draw_nodes(&sim, surface);
        sim.update_particles(t, &mut self.rng);
        self.draw_particles(&sim, surface);
        if self.config.orbits {
            self.draw_orbits(surface);
        }

        self.sim = Some(sim);
        self.frames_drawn += 1;
        self.pending = Some(sched.request_frame(&token));
        true
    }

    fn to_logical(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.logical.0, y * self.logical.1)
    }

    fn draw_edges(&self, sim: &Simulation, surface: &mut dyn Surface) {
        sim.for_each_edge(self.logical, self.config.link_distance, |i, j, alpha| {
            let a = sim.nodes[i];
            let b = sim.nodes[j];
            surface.line(
                self.to_logical(a.x, a.y),
                self.to_logical(b.x, b.y),
                EDGE_COLOR.with_alpha(alpha),
            );
        });
    }

    fn draw_nodes(&self, sim: &Simulation, surface: &mut dyn Surface) {
        let t = self.t();
        for n in &sim.nodes {
            let c = self.to_logical(n.x, n.y);
            let r = n.pulse_radius(t);
            surface.halo(c, r * 4.0, NODE_COLOR.with_alpha(n.glow_alpha(t)));
            surface.disc(c, r, NODE_COLOR.with_alpha(0.75));
        }
    }

    fn draw_particles(&self, sim: &Simulation, surface: &mut dyn Surface) {
        let t = self.t();
        for p in &sim.particles {
            let c = self.to_logical(p.x, p.y);
            surface.disc(c, p.radius, PARTICLE_COLOR.with_alpha(p.alpha(t)));
        }
    }

    fn draw_orbits(&self, surface: &mut dyn Surface) {
        let (w, h) = self.logical;
        let focus = (w * ORBIT_FOCUS.0, h * ORBIT_FOCUS.1);
        let base = w.min(h * 2.0);
        for (scale, aspect, rate) in ORBITS {
            let rx = base * scale;
            let ry = rx * aspect;
            let (s, c) = ((self.clock * rate as f64) % TAU as f64).sin_cos();
            let (s, c) = (s as f32, c as f32);
            let point = |k: usize| {
                let a = k as f32 / ORBIT_SEGMENTS as f32 * TAU;
                let (ex, ey) = (rx * a.cos(), ry * a.sin());
                (focus.0 + ex * c - ey * s, focus.1 + ex * s + ey * c)
            };
            let mut prev = point(0);
            for k in 1..=ORBIT_SEGMENTS {
                let next = point(k);
                surface.line(prev, next, ORBIT_COLOR.with_alpha(0.16));
                prev = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::sim::{NODE_COUNT, PARTICLE_COUNT};

    /// Counts draw calls instead of rasterising.
    #[derive(Default)]
    struct RecordingSurface {
        backing: (u32, u32),
        scale: (f32, f32),
        clears: usize,
        lines: usize,
        discs: usize,
        halos: usize,
    }

    impl Surface for RecordingSurface {
        fn density(&self) -> (u32, u32) {
            (2, 4)
        }
        fn configure(&mut self, backing_w: u32, backing_h: u32, scale: (f32, f32)) {
            self.backing = (backing_w, backing_h);
            self.scale = scale;
        }
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn line(&mut self, _from: (f32, f32), _to: (f32, f32), _color: Rgba) {
            self.lines += 1;
        }
        fn disc(&mut self, _center: (f32, f32), _radius: f32, _color: Rgba) {
            self.discs += 1;
        }
        fn halo(&mut self, _center: (f32, f32), _radius: f32, _color: Rgba) {
            self.halos += 1;
        }
    }

    fn config(orbits: bool) -> DriverConfig {
        DriverConfig {
            node_count: NODE_COUNT,
            particle_count: PARTICLE_COUNT,
            link_distance: 220.0,
            orbits,
        }
    }

    const HOST: HostRect = HostRect { cols: 120, rows: 40 };

    fn pump(d: &mut FrameDriver, surface: &mut RecordingSurface, sched: &mut Scheduler) -> usize {
        let mut fired = 0;
        for h in sched.take_frames() {
            if d.on_frame(h, surface, sched) {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn test_missing_host_is_noop() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(true), Some(1));
        d.start(None, &mut surface, &mut sched);
        assert!(!d.is_running());
        assert_eq!(sched.pending_frames(), 0);
        assert!(sched.resize_listeners().is_empty());
        assert_eq!(surface.backing, (0, 0));
    }

    #[test]
    fn test_start_configures_backing_for_density() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(true), Some(1));
        d.start(Some(HOST), &mut surface, &mut sched);
        assert_eq!(surface.backing, (240, 160));
        assert_eq!(surface.scale, (0.25, 0.25));
        assert_eq!(d.logical_size(), (960.0, 640.0));
        assert_eq!(sched.pending_frames(), 1);
    }

    #[test]
    fn test_clock_advances_by_fixed_step() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(false), Some(2));
        d.start(Some(HOST), &mut surface, &mut sched);
        for _ in 0..10 {
            assert_eq!(pump(&mut d, &mut surface, &mut sched), 1);
        }
        assert!((d.clock() - 10.0 * TIME_STEP).abs() < 1e-9);
        assert_eq!(d.frames_drawn(), 10);
    }

    #[test]
    fn test_clock_keeps_full_step_after_long_runs() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(true), Some(2));
        d.start(Some(HOST), &mut surface, &mut sched);
        for start in [262_144.0, 524_288.0, 1.0e9] {
            d.clock = start;
            assert_eq!(pump(&mut d, &mut surface, &mut sched), 1);
            let step = d.clock() - start;
            assert!((step - TIME_STEP).abs() < 1e-6, "{start}: step {step}");
        }
    }

    #[test]
    fn test_frame_draws_every_layer() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(true), Some(3));
        d.start(Some(HOST), &mut surface, &mut sched);
        pump(&mut d, &mut surface, &mut sched);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.halos, NODE_COUNT);
        assert_eq!(surface.discs, NODE_COUNT + PARTICLE_COUNT);
        assert!(surface.lines >= 3 * ORBIT_SEGMENTS);
    }

    #[test]
    fn test_no_frames_after_stop() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(true), Some(4));
        d.start(Some(HOST), &mut surface, &mut sched);
        for _ in 0..5 {
            pump(&mut d, &mut surface, &mut sched);
        }
        let before = d.frames_drawn();
        d.stop();
        assert_eq!(sched.pending_frames(), 0);
        assert!(sched.resize_listeners().is_empty());
        for _ in 0..5 {
            assert_eq!(pump(&mut d, &mut surface, &mut sched), 0);
        }
        assert_eq!(d.frames_drawn(), before);
        // a handle the driver never asked for is ignored too
        let stray = sched.request_frame(&CancelToken::new());
        assert!(!d.on_frame(stray, &mut surface, &mut sched));
        d.stop();
    }

    #[test]
    fn test_resize_remeasures_until_stopped() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(true), Some(5));
        d.start(Some(HOST), &mut surface, &mut sched);
        let id = sched.resize_listeners()[0];
        d.on_resize(id, HostRect { cols: 80, rows: 24 }, &mut surface);
        assert_eq!(surface.backing, (160, 96));
        d.stop();
        assert!(sched.resize_listeners().is_empty());
        d.on_resize(id, HostRect { cols: 200, rows: 50 }, &mut surface);
        assert_eq!(surface.backing, (160, 96));
    }

    #[test]
    fn test_seeded_run_keeps_nodes_bounded_and_links_some_pair() {
        let mut sched = Scheduler::new();
        let mut surface = RecordingSurface::default();
        let mut d = FrameDriver::new(config(false), Some(0xC0FFEE));
        d.start(Some(HOST), &mut surface, &mut sched);
        let mut linked = false;
        for _ in 0..100 {
            pump(&mut d, &mut surface, &mut sched);
            let sim = d.simulation().expect("running");
            assert_eq!(sim.nodes.len(), NODE_COUNT);
            for n in &sim.nodes {
                assert!((0.0..=1.0).contains(&n.x) && (0.0..=1.0).contains(&n.y));
            }
            sim.for_each_edge(d.logical_size(), 220.0, |_, _, _| linked = true);
        }
        assert!(linked);
    }
}
