//! Decorative node/particle backdrop.

mod driver;
pub(crate) mod sim;
mod surface;

pub(crate) use driver::{DriverConfig, FrameDriver, HostRect};
pub(crate) use surface::{Rgba, Surface};
