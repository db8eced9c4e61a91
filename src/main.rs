mod ambient;
mod app;
mod config;
mod content;
mod input;
mod logging;
mod motion;
mod page;
mod render;
mod schedule;
mod visibility;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
