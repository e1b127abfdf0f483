//! 8-bit RGB colours, the random colour sampler, and the HSV byte remap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// An opaque 8-bit colour, channels in R, G, B order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// Linear blend `self * (1 - t) + other * t`, rounded per channel.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            (a as f64 * (1.0 - t) + b as f64 * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Color([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
        ])
    }

    /// Re-express the colour as HSV packed into three bytes.
    ///
    /// Hue is scaled from `[0, 360)` degrees to `[0, 255]`; saturation and
    /// value use the full byte range.  The packed triple is written back into
    /// the R, G, B slots, which is what the checkerboard remap stores.
    pub fn to_hsv_bytes(self) -> Color {
        let r = self.r() as f64 / 255.0;
        let g = self.g() as f64 / 255.0;
        let b = self.b() as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta <= f64::EPSILON {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max <= f64::EPSILON { 0.0 } else { delta / max };

        let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Color([to_byte(hue / 360.0), to_byte(saturation), to_byte(max)])
    }
}

/// Draws uniformly random colours from a shared [`RandomSource`].
pub struct ColorSampler {
    rng: RandomSource,
}

impl ColorSampler {
    pub fn new(rng: RandomSource) -> Self {
        Self { rng }
    }

    /// Each channel drawn independently from `[0, 255]`.
    pub fn sample(&mut self) -> Color {
        Color([
            self.rng.random::<u8>(),
            self.rng.random::<u8>(),
            self.rng.random::<u8>(),
        ])
    }
}
