use pocketboy_common::Color;

use crate::{BYTES_PER_PIXEL, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Interrupt request bits produced by the GPU, matching IF bit positions.
pub(super) const IRQ_VBLANK: u8 = 0x01;
pub(super) const IRQ_STAT: u8 = 0x02;

/// T-cycle duration of each mode.
pub const OAM_SCAN_CLOCKS: u32 = 80;
pub const VRAM_SCAN_CLOCKS: u32 = 172;
pub const HBLANK_CLOCKS: u32 = 204;
/// One full scanline: OAM scan + VRAM scan + HBlank.
pub const LINE_CLOCKS: u32 = OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS + HBLANK_CLOCKS;
/// A full frame: 144 visible lines plus the 10-line VBlank.
pub const FRAME_CLOCKS: u32 = LINE_CLOCKS * 154;

const VISIBLE_LINES: u8 = 144;
const MAX_LINE: u8 = 153;

// LCDC bits consumed by the background renderer.
const LCDC_ENABLE: u8 = 0x80;
const LCDC_BG_MAP: u8 = 0x08;
const LCDC_TILE_DATA: u8 = 0x10;
const LCDC_BG_ENABLE: u8 = 0x01;

// STAT interrupt-select bits (3-6); bits 0-2 are derived read-only state.
const STAT_HBLANK_INT: u8 = 0x08;
const STAT_VBLANK_INT: u8 = 0x10;
const STAT_OAM_INT: u8 = 0x20;
const STAT_LYC_INT: u8 = 0x40;
const STAT_WRITABLE: u8 = 0x78;

/// LCD controller mode, in STAT bit 0-1 encoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    VramScan = 3,
}

/// Graphics timing state machine.
///
/// Advances in lockstep with CPU cycle counts: the bus feeds every
/// instruction's cost into [`Gpu::tick`], which walks the
/// OAM scan -> VRAM scan -> HBlank sequence per visible line, renders the
/// background row on the VRAM scan -> HBlank edge, and spends ten extra
/// line periods in VBlank before wrapping.
pub struct Gpu {
    pub(super) mode: Mode,
    /// T-cycles accumulated since the last mode transition.
    mode_clock: u32,
    /// Current scanline (LY), 0-153.
    pub(super) line: u8,
    /// Line-compare register (LYC).
    pub(super) lyc: u8,
    pub(super) scroll_y: u8,
    pub(super) scroll_x: u8,
    pub(super) lcdc: u8,
    /// Writable STAT bits (interrupt selects); bits 0-2 are derived.
    stat_select: u8,
    /// Background palette (BGP).
    pub(super) bgp: u8,
    /// Edge latch for the LY=LYC comparison so the STAT request fires once
    /// per match rather than on every tick.
    coincidence_latch: bool,
    framebuffer: Vec<u8>,
}

impl Default for Gpu {
    fn default() -> Self {
        Self {
            mode: Mode::OamScan,
            mode_clock: 0,
            line: 0,
            lyc: 0,
            scroll_y: 0,
            scroll_x: 0,
            lcdc: 0,
            stat_select: 0,
            bgp: 0,
            coincidence_latch: false,
            framebuffer: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL],
        }
    }
}

impl Gpu {
    /// The RGBA framebuffer (width * height * 4 bytes).
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Advance the GPU by `cycles` T-cycles, returning the interrupt
    /// request bits (IF layout) raised during this slice of time.
    ///
    /// `memory` is the bus backing array; the renderer samples the tile
    /// map and tile data out of the VRAM region by absolute address.
    pub(super) fn tick(&mut self, cycles: u32, memory: &[u8]) -> u8 {
        if self.lcdc & LCDC_ENABLE == 0 {
            // LCD disabled: timing is held at the top of the frame.
            self.mode = Mode::OamScan;
            self.mode_clock = 0;
            self.line = 0;
            self.coincidence_latch = false;
            return 0;
        }

        let mut irq = 0;
        self.mode_clock += cycles;

        match self.mode {
            Mode::OamScan => {
                if self.mode_clock >= OAM_SCAN_CLOCKS {
                    self.mode_clock = 0;
                    self.enter_mode(Mode::VramScan, &mut irq);
                }
            }
            Mode::VramScan => {
                if self.mode_clock >= VRAM_SCAN_CLOCKS {
                    self.mode_clock = 0;
                    // End of the scan is the point where the line's pixels
                    // are settled; write them out.
                    self.render_scanline(memory);
                    self.enter_mode(Mode::HBlank, &mut irq);
                }
            }
            Mode::HBlank => {
                if self.mode_clock >= HBLANK_CLOCKS {
                    self.mode_clock = 0;
                    self.line += 1;

                    if self.line == VISIBLE_LINES {
                        self.enter_mode(Mode::VBlank, &mut irq);
                        irq |= IRQ_VBLANK;
                        log::debug!("vblank start, IF bits 0x{irq:02X}");
                    } else {
                        self.enter_mode(Mode::OamScan, &mut irq);
                    }
                }
            }
            Mode::VBlank => {
                // VBlank counts ten whole line periods, LY keeps
                // incrementing through 144..=153 before wrapping.
                if self.mode_clock >= LINE_CLOCKS {
                    self.mode_clock = 0;
                    self.line += 1;

                    if self.line > MAX_LINE {
                        self.line = 0;
                        self.enter_mode(Mode::OamScan, &mut irq);
                    }
                }
            }
        }

        self.compare_line(&mut irq);
        irq
    }

    /// Switch modes and raise the STAT request if the new mode's
    /// interrupt-select bit is enabled. VRAM scan has no select bit.
    fn enter_mode(&mut self, mode: Mode, irq: &mut u8) {
        self.mode = mode;
        let select = match mode {
            Mode::HBlank => STAT_HBLANK_INT,
            Mode::VBlank => STAT_VBLANK_INT,
            Mode::OamScan => STAT_OAM_INT,
            Mode::VramScan => 0,
        };
        if self.stat_select & select != 0 {
            *irq |= IRQ_STAT;
        }
    }

    /// LY=LYC comparison, performed after every tick independently of the
    /// mode machine. The request fires on the edge into equality.
    fn compare_line(&mut self, irq: &mut u8) {
        let equal = self.line == self.lyc;
        if equal && !self.coincidence_latch && self.stat_select & STAT_LYC_INT != 0 {
            *irq |= IRQ_STAT;
        }
        self.coincidence_latch = equal;
    }

    /// Compose the STAT byte: bit 7 unused (reads 1), bits 3-6 the stored
    /// interrupt selects, bit 2 the coincidence flag, bits 0-1 the mode.
    pub(super) fn stat(&self) -> u8 {
        let mut stat = 0x80 | self.stat_select | self.mode as u8;
        if self.line == self.lyc {
            stat |= 0x04;
        }
        stat
    }

    /// Only the interrupt-select bits of STAT are writable.
    pub(super) fn write_stat(&mut self, value: u8) {
        self.stat_select = value & STAT_WRITABLE;
    }

    pub(super) fn write_lcdc(&mut self, value: u8) {
        let was_enabled = self.lcdc & LCDC_ENABLE != 0;
        self.lcdc = value;

        if was_enabled && value & LCDC_ENABLE == 0 {
            // Turning the LCD off resets the timing machine to line 0.
            self.mode = Mode::OamScan;
            self.mode_clock = 0;
            self.line = 0;
            self.coincidence_latch = false;
        }
    }

    /// Render the background portion of the current scanline into the
    /// framebuffer, honoring scroll registers and the LCDC map/data
    /// selects. With the background disabled the row is blanked to white.
    fn render_scanline(&mut self, memory: &[u8]) {
        let y = self.line as usize;
        if y >= SCREEN_HEIGHT {
            return;
        }

        if self.lcdc & LCDC_BG_ENABLE == 0 {
            for x in 0..SCREEN_WIDTH {
                Color::WHITE.write_rgba(&mut self.framebuffer, y * SCREEN_WIDTH + x);
            }
            return;
        }

        let map_base: u16 = if self.lcdc & LCDC_BG_MAP != 0 {
            0x9C00
        } else {
            0x9800
        };
        let unsigned_tiles = self.lcdc & LCDC_TILE_DATA != 0;

        let bg_y = (y as u8).wrapping_add(self.scroll_y);
        let tile_row = (bg_y / 8) as u16;
        let fine_y = (bg_y & 7) as u16;

        for x in 0..SCREEN_WIDTH {
            let bg_x = (x as u8).wrapping_add(self.scroll_x);
            let tile_col = (bg_x / 8) as u16;

            let map_addr = map_base + tile_row * 32 + tile_col;
            let tile_index = memory[map_addr as usize];

            let tile_base: u16 = if unsigned_tiles {
                0x8000 + (tile_index as u16) * 16
            } else {
                // 0x8800 addressing: signed index relative to 0x9000.
                (0x9000i32 + (tile_index as i8 as i32) * 16) as u16
            };

            // Two bytes per tile row: low bitplane then high bitplane.
            let row_addr = tile_base + fine_y * 2;
            let lo = memory[row_addr as usize];
            let hi = memory[row_addr as usize + 1];

            let bit = 7 - (bg_x & 7);
            let color_index = ((hi >> bit) & 0x01) << 1 | ((lo >> bit) & 0x01);
            let shade = (self.bgp >> (color_index * 2)) & 0x03;

            Color::from_dmg_shade(shade).write_rgba(&mut self.framebuffer, y * SCREEN_WIDTH + x);
        }
    }
}
