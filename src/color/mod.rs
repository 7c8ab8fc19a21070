mod palette;
mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use palette::{MAX_PALETTE_SIZE, Palette};
pub use utils::{
    BLACK, WHITE, blend_colors, fade_to_black_by, hsv2rgb, hue_color, rgb_from_u32, scale_color,
};

pub type Rgb = RGB8;
pub type Hsv = HSV;
