use serde::{Deserialize, Serialize};

/// An unpremultiplied 8-bit-per-channel color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba::new(r, g, b, 0xff)
    }

    /// Unpacks a `0xAARRGGBB` word.
    pub const fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Rgba { r, g, b, a }
    }

    pub const fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Same color, different alpha. Stroke colors are sampled opaque and then given the stroke
    /// alpha this way.
    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Recovers the unpremultiplied color from a premultiplied `0xAARRGGBB` word.
    pub fn from_premultiplied_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        let unmul = |c: u8| -> u8 {
            if a == 0 {
                0
            } else {
                ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
            }
        };
        Rgba {
            r: unmul(r),
            g: unmul(g),
            b: unmul(b),
            a,
        }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}
