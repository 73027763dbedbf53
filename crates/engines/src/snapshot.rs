//! PNG output of a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so that WASM builds can depend on
//! the `engines` crate without pulling in the `image` crate.

use backdrop_core::error::EngineError;
use log::debug;
use std::path::Path;

use crate::raster::RasterSurface;

/// Writes the surface as an RGBA PNG.
///
/// Returns `EngineError::InvalidDimensions` if the surface dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(surface.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    debug!("wrote {w}x{h} snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::surface::{Paint, Surface};
    use backdrop_core::Rgba;

    #[test]
    fn write_png_round_trip() {
        let mut surface = RasterSurface::new(16, 8, Rgba::opaque(0.0, 0.0, 0.0)).unwrap();
        surface.begin_path();
        surface.arc(8.0, 4.0, 3.0, 0.0, std::f64::consts::TAU);
        surface.fill(&Paint::solid(Rgba::GOLD));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");

        write_png(&surface, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
        assert_eq!(img.get_pixel(8, 4).0, [255, 215, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn write_png_to_missing_directory_is_io_error() {
        let surface = RasterSurface::new(2, 2, Rgba::GOLD).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.png");
        assert!(matches!(write_png(&surface, &path), Err(EngineError::Io(_))));
    }
}
