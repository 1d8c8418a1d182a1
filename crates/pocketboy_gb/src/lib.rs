pub mod cpu;
pub mod machine;

pub use machine::GameBoy;

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Bytes per framebuffer pixel (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;
