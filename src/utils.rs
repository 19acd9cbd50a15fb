// --- File: utils.rs ---
use glam::Vec4;
use image::Rgba;

// --- Helper Functions ---

/// Builds an opaque colour from a `0xRRGGBB` literal.
pub const fn rgb_hex(hex: u32) -> Vec4 {
    Vec4::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    )
}

pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

pub fn round_to_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Quantises a normalised colour into an 8-bit pixel.
pub fn to_rgba8(color: Vec4) -> Rgba<u8> {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
}

// --- End of File: utils.rs ---
