pub use smart_leds::hsv::hsv2rgb;

use crate::{
    color::{Hsv, Rgb},
    math8::{blend8, scale8},
};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Scale every channel of a color (255 keeps it unchanged)
#[inline]
pub fn scale_color(color: Rgb, scale: u8) -> Rgb {
    if scale == 255 {
        return color;
    }
    Rgb {
        r: scale8(color.r, scale),
        g: scale8(color.g, scale),
        b: scale8(color.b, scale),
    }
}

/// Dim a color towards black by `amount` (255 = black)
#[inline]
pub fn fade_to_black_by(color: Rgb, amount: u8) -> Rgb {
    scale_color(color, 255 - amount)
}

/// Fully saturated color at the given hue (0-255 circle)
#[inline]
pub fn hue_color(hue: u8) -> Rgb {
    hsv2rgb(Hsv {
        hue,
        sat: 255,
        val: 255,
    })
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
