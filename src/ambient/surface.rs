/// Straight colour with a separate 0..1 opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: f32,
}

impl Rgba {
    pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub(crate) fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// A raster target the frame driver draws on.
///
/// Drawing calls take logical coordinates; the surface maps them through the
/// scale configured by `configure`.
pub(crate) trait Surface {
    /// Backing pixels per terminal cell, horizontally and vertically.
    fn density(&self) -> (u32, u32);
    fn configure(&mut self, backing_w: u32, backing_h: u32, scale: (f32, f32));
    fn clear(&mut self);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba);
    /// Filled disc with a hard edge.
    fn disc(&mut self, center: (f32, f32), radius: f32, color: Rgba);
    /// Disc whose opacity falls off towards the rim.
    fn halo(&mut self, center: (f32, f32), radius: f32, color: Rgba);
}
