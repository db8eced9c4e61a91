use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ambient::sim::{NODE_COUNT, PARTICLE_COUNT};
use crate::visibility::DEFAULT_THRESHOLD;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    /// Fixed seed for the backdrop; entropy when unset.
    pub(crate) seed: Option<u64>,
    pub(crate) node_count: usize,
    pub(crate) particle_count: usize,
    /// Connective line cut-off, in logical pixels.
    pub(crate) link_distance: f32,
    pub(crate) visibility_threshold: f32,
    pub(crate) orbits: bool,
    pub(crate) log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            seed: None,
            node_count: NODE_COUNT,
            particle_count: PARTICLE_COUNT,
            link_distance: 220.0,
            visibility_threshold: DEFAULT_THRESHOLD,
            orbits: true,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(about = "Personal brand page with an ambient backdrop, in your terminal")]
pub(crate) struct Args {
    /// frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// seed the backdrop for a repeatable animation
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// monochrome output
    #[arg(long)]
    pub(crate) no_color: bool,

    /// skip the rotating ellipses
    #[arg(long)]
    pub(crate) no_orbits: bool,

    #[arg(long)]
    pub(crate) nodes: Option<usize>,

    #[arg(long)]
    pub(crate) particles: Option<usize>,

    /// write logs here instead of the data directory
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// save the effective settings and exit
    #[arg(long)]
    pub(crate) write_config: bool,
}

impl Settings {
    /// Command-line flags win over the settings file.
    pub(crate) fn merge_args(mut self, args: &Args) -> Self {
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.no_color {
            self.enable_color = false;
        }
        if args.no_orbits {
            self.orbits = false;
        }
        if let Some(n) = args.nodes {
            self.node_count = n;
        }
        if let Some(n) = args.particles {
            self.particle_count = n;
        }
        self
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "brandpage", "Brandpage")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("brandpage.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename replaces an existing target atomically on unix; windows refuses
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("renaming into {}", to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
        assert_eq!(s.node_count, 28);
        assert_eq!(s.particle_count, 55);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("settings.json");
        fs::write(&p, "{ not json").unwrap();
        assert_eq!(load_settings(&p), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("settings.json");
        fs::write(&p, r#"{ "fps_cap": 60, "seed": 42 }"#).unwrap();
        let s = load_settings(&p);
        assert_eq!(s.fps_cap, 60);
        assert_eq!(s.seed, Some(42));
        assert!(s.orbits);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("settings.json");
        let s = Settings {
            orbits: false,
            link_distance: 180.0,
            ..Settings::default()
        };
        save_settings_atomic(&p, &s).unwrap();
        assert!(!p.with_extension("json.tmp").exists());
        assert_eq!(load_settings(&p), s);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("settings.json");
        save_settings_atomic(&p, &Settings::default()).unwrap();
        let s = Settings {
            fps_cap: 24,
            ..Settings::default()
        };
        save_settings_atomic(&p, &s).unwrap();
        assert_eq!(load_settings(&p), s);

        let tmp = dir.path().join("other.tmp");
        fs::write(&tmp, "{}").unwrap();
        atomic_rename(&tmp, &p).unwrap();
        assert!(!tmp.exists());
        assert_eq!(fs::read_to_string(&p).unwrap(), "{}");
    }

    #[test]
    fn test_flags_override_file() {
        let args = Args::parse_from(["brandpage", "--fps", "12", "--no-orbits", "--seed", "9"]);
        let s = Settings::default().merge_args(&args);
        assert_eq!(s.fps_cap, 12);
        assert!(!s.orbits);
        assert_eq!(s.seed, Some(9));
        assert!(s.enable_color);
    }
}
