/// RGB texture storage and nearest-neighbour sampling
use std::path::Path;

use log::warn;

use crate::error::{LoadError, LoadResult};

/// Linear RGB color with channels in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const MID_GRAY: Rgb = Rgb { r: 0.5, g: 0.5, b: 0.5 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Multiply every channel by `factor`
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
        }
    }
}

/// Decoded texture: row-major RGB8, origin at the top-left.
///
/// A zero-sized texture is the "untextured" state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Texture {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a raw RGB buffer of `width * height * 3` bytes.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Self {
        if width == 0 || height == 0 || data.len() != width * height * 3 {
            warn!(
                "ignoring texture buffer of {} bytes for {}x{} image",
                data.len(),
                width,
                height
            );
            return Self::empty();
        }
        Self { width, height, data }
    }

    /// Decode an image file into an RGB texture
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| LoadError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = image.dimensions();
        Ok(Self::from_rgb(
            width as usize,
            height as usize,
            image.into_raw(),
        ))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_loaded(&self) -> bool {
        self.width > 0 && !self.data.is_empty()
    }

    /// Sample at `(u, v)` with wrap-around addressing.
    ///
    /// V points up while stored rows run top to bottom, so V is flipped.
    /// Without pixel data every query returns mid-gray.
    pub fn sample(&self, u: f64, v: f64) -> Rgb {
        if !self.is_loaded() {
            return Rgb::MID_GRAY;
        }
        let u = wrap_unit(u);
        let v = 1.0 - wrap_unit(v);

        let x = (u * self.width as f64) as usize % self.width;
        let y = (v * self.height as f64) as usize % self.height;

        let idx = (y * self.width + x) * 3;
        Rgb::from_bytes(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }
}

/// Wrap into [0, 1); the upper bound can be hit through rounding and is
/// folded back by the caller's modulo.
fn wrap_unit(t: f64) -> f64 {
    let t = t % 1.0;
    if t < 0.0 {
        t + 1.0
    } else {
        t
    }
}
