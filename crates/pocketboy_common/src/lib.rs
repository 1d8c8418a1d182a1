/// RGBA color used by emulator framebuffers.
///
/// Frontends receive raw `width * height * 4` byte buffers; this type keeps
/// the channel ordering in one place.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Map a DMG 2-bit shade (0 = lightest, 3 = darkest) to a grayscale color.
    #[inline]
    pub const fn from_dmg_shade(shade: u8) -> Color {
        match shade & 0x03 {
            0 => Color::new_rgb(0xFF, 0xFF, 0xFF),
            1 => Color::new_rgb(0xAA, 0xAA, 0xAA),
            2 => Color::new_rgb(0x55, 0x55, 0x55),
            _ => Color::new_rgb(0x00, 0x00, 0x00),
        }
    }

    /// Write the color into an RGBA byte buffer at pixel index `index`.
    #[inline]
    pub fn write_rgba(&self, buffer: &mut [u8], index: usize) {
        let at = index * 4;
        if at + 3 < buffer.len() {
            buffer[at] = self.r;
            buffer[at + 1] = self.g;
            buffer[at + 2] = self.b;
            buffer[at + 3] = self.a;
        }
    }

    #[inline]
    pub const fn rgba(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }
}
