use rand::Rng;
use std::f32::consts::TAU;

pub(crate) const NODE_COUNT: usize = 28;
pub(crate) const PARTICLE_COUNT: usize = 55;

const NODE_SPEED: f32 = 0.00035;
const NODE_JITTER: f32 = 0.00025;
const PARTICLE_JITTER: f32 = 0.0003;
// recycle margins for particles, in normalized units
const TOP_EXIT: f32 = -0.05;
const BOTTOM_ENTRY: f32 = 1.05;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) radius: f32,
    pub(crate) phase: f32,
}

impl Node {
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=1.0),
            y: rng.gen_range(0.0..=1.0),
            vx: rng.gen_range(-NODE_SPEED..NODE_SPEED),
            vy: rng.gen_range(-NODE_SPEED..NODE_SPEED),
            radius: rng.gen_range(1.5..3.5),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    /// Pulsing core radius at logical time `t`.
    pub(crate) fn pulse_radius(&self, t: f32) -> f32 {
        self.radius * (1.0 + 0.3 * (t * 1.8 + self.phase).sin())
    }

    /// Pulsing halo opacity at logical time `t`.
    pub(crate) fn glow_alpha(&self, t: f32) -> f32 {
        0.10 + 0.06 * (t * 1.2 + self.phase).cos()
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Particle {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) radius: f32,
    pub(crate) opacity: f32,
    pub(crate) phase: f32,
}

impl Particle {
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=1.0),
            y: rng.gen_range(0.0..=1.0),
            vx: rng.gen_range(-0.0002..0.0002),
            // always rising
            vy: -rng.gen_range(0.0004..0.0012),
            radius: rng.gen_range(0.5..1.7),
            opacity: rng.gen_range(0.15..0.5),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    pub(crate) fn alpha(&self, t: f32) -> f32 {
        self.opacity * (0.6 + 0.4 * (t * 2.0 + self.phase).sin())
    }
}

/// Node and particle state for one mounted backdrop.
#[derive(Clone, Debug)]
pub(crate) struct Simulation {
    pub(crate) nodes: Vec<Node>,
    pub(crate) particles: Vec<Particle>,
}

impl Simulation {
    pub(crate) fn new<R: Rng>(node_count: usize, particle_count: usize, rng: &mut R) -> Self {
        Self {
            nodes: (0..node_count).map(|_| Node::random(rng)).collect(),
            particles: (0..particle_count).map(|_| Particle::random(rng)).collect(),
        }
    }

    pub(crate) fn update_nodes(&mut self, t: f32) {
        for n in &mut self.nodes {
            n.x += n.vx + (t * 0.7 + n.phase).sin() * NODE_JITTER;
            n.y += n.vy + (t * 0.6 + n.phase).cos() * NODE_JITTER;
            if !(0.0..=1.0).contains(&n.x) {
                n.vx = -n.vx;
            }
            if !(0.0..=1.0).contains(&n.y) {
                n.vy = -n.vy;
            }
            n.x = n.x.clamp(0.0, 1.0);
            n.y = n.y.clamp(0.0, 1.0);
        }
    }

    pub(crate) fn update_particles<R: Rng>(&mut self, t: f32, rng: &mut R) {
        for p in &mut self.particles {
            p.x += p.vx + (t * 1.3 + p.phase).sin() * PARTICLE_JITTER;
            p.y += p.vy;
            if p.y < TOP_EXIT {
                p.y = BOTTOM_ENTRY;
                p.x = rng.gen_range(0.0..=1.0);
            }
            if !(0.0..=1.0).contains(&p.x) {
                p.vx = -p.vx;
                p.x = p.x.clamp(0.0, 1.0);
            }
        }
    }

    /// Calls `f(i, j, opacity)` for every node pair closer than `threshold`
    /// logical units, with node positions scaled by `size`.
    pub(crate) fn for_each_edge(
        &self,
        size: (f32, f32),
        threshold: f32,
        mut f: impl FnMut(usize, usize, f32),
    ) {
        let n = self.nodes.len();
        for i in 0..n {
            let a = self.nodes[i];
            for j in (i + 1)..n {
                let b = self.nodes[j];
                let dx = (a.x - b.x) * size.0;
                let dy = (a.y - b.y) * size.1;
                let d = (dx * dx + dy * dy).sqrt();
                if d < threshold {
                    f(i, j, edge_opacity(d, threshold));
                }
            }
        }
    }
}

pub(crate) const EDGE_ALPHA: f32 = 0.35;

/// Linear falloff to zero at `threshold`.
pub(crate) fn edge_opacity(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / threshold).clamp(0.0, 1.0) * EDGE_ALPHA
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_nodes_stay_in_unit_square() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sim = Simulation::new(NODE_COUNT, 0, &mut rng);
        // push a few against the walls
        sim.nodes[0].x = 1.0;
        sim.nodes[0].vx = 0.01;
        sim.nodes[1].y = 0.0;
        sim.nodes[1].vy = -0.01;
        let mut t = 0.0;
        for _ in 0..5_000 {
            t += 0.016;
            sim.update_nodes(t);
            for n in &sim.nodes {
                assert!((0.0..=1.0).contains(&n.x), "x out of range: {}", n.x);
                assert!((0.0..=1.0).contains(&n.y), "y out of range: {}", n.y);
            }
        }
    }

    #[test]
    fn test_node_velocity_reflects_at_wall() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sim = Simulation::new(1, 0, &mut rng);
        sim.nodes[0] = Node {
            x: 0.9995,
            y: 0.5,
            vx: 0.01,
            vy: 0.0,
            radius: 2.0,
            phase: 0.0,
        };
        sim.update_nodes(0.0);
        assert!(sim.nodes[0].vx < 0.0);
        assert_eq!(sim.nodes[0].x, 1.0);
    }

    #[test]
    fn test_particle_recycles_below_bottom() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sim = Simulation::new(0, PARTICLE_COUNT, &mut rng);
        for p in &mut sim.particles {
            p.y = -0.06;
        }
        sim.update_particles(1.0, &mut rng);
        for p in &sim.particles {
            assert!(p.y >= 1.0);
            assert!((0.0..=1.0).contains(&p.x));
        }
    }

    #[test]
    fn test_particles_always_rise() {
        let mut rng = StdRng::seed_from_u64(11);
        let sim = Simulation::new(0, 200, &mut rng);
        assert!(sim.particles.iter().all(|p| p.vy < 0.0));
    }

    #[test]
    fn test_particle_bounces_off_side() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sim = Simulation::new(0, 1, &mut rng);
        sim.particles[0].x = 0.0;
        sim.particles[0].vx = -0.01;
        sim.particles[0].y = 0.5;
        sim.update_particles(0.0, &mut rng);
        assert!(sim.particles[0].vx > 0.0);
        assert!((0.0..=1.0).contains(&sim.particles[0].x));
    }

    #[test]
    fn test_edge_opacity_vanishes_at_threshold() {
        assert!(edge_opacity(220.0, 220.0).abs() < 1e-6);
        let near = edge_opacity(219.999, 220.0);
        assert!(near >= 0.0 && near < 1e-4);
        assert!((edge_opacity(0.0, 220.0) - EDGE_ALPHA).abs() < 1e-6);
        assert_eq!(edge_opacity(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_edges_visit_each_close_pair_once() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut sim = Simulation::new(3, 0, &mut rng);
        sim.nodes[0].x = 0.0;
        sim.nodes[0].y = 0.0;
        sim.nodes[1].x = 0.1;
        sim.nodes[1].y = 0.0;
        sim.nodes[2].x = 1.0;
        sim.nodes[2].y = 1.0;
        let mut seen = Vec::new();
        sim.for_each_edge((1000.0, 1000.0), 220.0, |i, j, a| seen.push((i, j, a)));
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].0, seen[0].1), (0, 1));
        assert!(seen[0].2 > 0.0);
    }
}
