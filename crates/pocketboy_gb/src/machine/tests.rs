use super::gpu::{FRAME_CLOCKS, HBLANK_CLOCKS, LINE_CLOCKS, OAM_SCAN_CLOCKS, VRAM_SCAN_CLOCKS};
use super::{GameBoy, Mode, SystemBus};
use crate::cpu::Bus;

/// Drive the bus clock in instruction-sized slices; a single oversized
/// tick would fold whole modes together.
fn tick_cycles(bus: &mut SystemBus, total: u32) {
    let mut remaining = total;
    while remaining > 0 {
        let slice = remaining.min(4);
        bus.tick(slice);
        remaining -= slice;
    }
}

fn bus_with_lcd_on() -> SystemBus {
    let mut bus = SystemBus::default();
    bus.write8(0xFF40, 0x80);
    bus
}

// --- Memory routing ---

#[test]
fn wram_writes_mirror_into_echo_ram() {
    let mut bus = SystemBus::default();
    bus.write8(0xC010, 0x42);
    assert_eq!(bus.read8(0xE010), 0x42);

    bus.write8(0xE020, 0x99);
    assert_eq!(bus.read8(0xC020), 0x99);
}

#[test]
fn echo_mirroring_stops_at_its_bound() {
    // 0xDE00 would mirror to 0xFE00, past the end of echo RAM.
    let mut bus = SystemBus::default();
    bus.write8(0xDE00, 0x42);
    assert_eq!(bus.read8(0xDE00), 0x42);
    assert_eq!(bus.read8(0xFE00), 0x00);

    // The last mirrored byte is 0xDDFF <-> 0xFDFF.
    bus.write8(0xDDFF, 0x77);
    assert_eq!(bus.read8(0xFDFF), 0x77);
}

#[test]
fn rom_region_ignores_writes() {
    let mut bus = SystemBus::default();
    bus.load_rom(&[0xAA, 0xBB]);
    bus.write8(0x0000, 0x11);
    bus.write8(0x7FFF, 0x22);
    assert_eq!(bus.read8(0x0000), 0xAA);
    assert_eq!(bus.read8(0x7FFF), 0x00);
}

#[test]
fn oversized_rom_is_truncated_to_the_rom_region() {
    let mut bus = SystemBus::default();
    let rom = vec![0x5A; 0x9000];
    bus.load_rom(&rom);
    assert_eq!(bus.read8(0x7FFF), 0x5A);
    assert_eq!(bus.read8(0x8000), 0x00, "VRAM untouched by the load");
}

#[test]
fn word_access_is_little_endian() {
    let mut bus = SystemBus::default();
    bus.write16(0xC800, 0xBEEF);
    assert_eq!(bus.read8(0xC800), 0xEF);
    assert_eq!(bus.read8(0xC801), 0xBE);
    assert_eq!(bus.read16(0xC800), 0xBEEF);
}

#[test]
fn joypad_stub_reads_nothing_pressed() {
    let mut bus = SystemBus::default();
    assert_eq!(bus.read8(0xFF00) & 0x0F, 0x0F);

    // Group selects are stored, input nibble still reads high.
    bus.write8(0xFF00, 0x10);
    assert_eq!(bus.read8(0xFF00), 0x10 | 0xCF);
}

#[test]
fn interrupt_registers_mask_and_pad() {
    let mut bus = SystemBus::default();
    bus.write8(0xFF0F, 0xFF);
    assert_eq!(bus.read8(0xFF0F), 0x1F | 0xE0, "IF keeps five lines, pads high");

    bus.write8(0xFFFF, 0x15);
    assert_eq!(bus.read8(0xFFFF), 0x15);
}

#[test]
fn ly_reads_come_from_the_gpu_and_writes_are_ignored() {
    let mut bus = bus_with_lcd_on();
    tick_cycles(&mut bus, LINE_CLOCKS);
    assert_eq!(bus.read8(0xFF44), 1);

    bus.write8(0xFF44, 0x7F);
    assert_eq!(bus.read8(0xFF44), 1);
    // The backing array never sees LY.
    assert_eq!(bus.memory[0xFF44], 0);
}

// --- GPU timing ---

#[test]
fn line_and_frame_durations() {
    assert_eq!(LINE_CLOCKS, 456);
    assert_eq!(OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS + HBLANK_CLOCKS, 456);
    assert_eq!(FRAME_CLOCKS, 70224);
}

#[test]
fn mode_machine_walks_one_scanline() {
    let mut bus = bus_with_lcd_on();
    assert_eq!(bus.gpu.mode, Mode::OamScan);

    tick_cycles(&mut bus, OAM_SCAN_CLOCKS);
    assert_eq!(bus.gpu.mode, Mode::VramScan);

    tick_cycles(&mut bus, VRAM_SCAN_CLOCKS);
    assert_eq!(bus.gpu.mode, Mode::HBlank);
    assert_eq!(bus.gpu.line, 0);

    tick_cycles(&mut bus, HBLANK_CLOCKS);
    assert_eq!(bus.gpu.mode, Mode::OamScan);
    assert_eq!(bus.gpu.line, 1);
}

#[test]
fn vblank_starts_at_line_144_and_raises_the_interrupt() {
    let mut bus = bus_with_lcd_on();
    tick_cycles(&mut bus, LINE_CLOCKS * 144);
    assert_eq!(bus.gpu.mode, Mode::VBlank);
    assert_eq!(bus.gpu.line, 144);
    assert_ne!(bus.if_reg & 0x01, 0, "VBlank request in IF");
}

#[test]
fn a_full_frame_wraps_back_to_line_zero() {
    let mut bus = bus_with_lcd_on();
    tick_cycles(&mut bus, FRAME_CLOCKS);
    assert_eq!(bus.gpu.line, 0);
    assert_eq!(bus.gpu.mode, Mode::OamScan);

    // LY walks all the way through 153 on the way there.
    let mut bus = bus_with_lcd_on();
    tick_cycles(&mut bus, LINE_CLOCKS * 153 + LINE_CLOCKS / 2);
    assert_eq!(bus.gpu.line, 153);
}

#[test]
fn lcd_off_holds_the_timing_machine_at_line_zero() {
    let mut bus = SystemBus::default();
    tick_cycles(&mut bus, FRAME_CLOCKS);
    assert_eq!(bus.gpu.line, 0);
    assert_eq!(bus.gpu.mode, Mode::OamScan);
    assert_eq!(bus.if_reg, 0);
}

#[test]
fn disabling_the_lcd_resets_the_scanline() {
    let mut bus = bus_with_lcd_on();
    tick_cycles(&mut bus, LINE_CLOCKS * 10);
    assert_eq!(bus.gpu.line, 10);

    bus.write8(0xFF40, 0x00);
    tick_cycles(&mut bus, 4);
    assert_eq!(bus.read8(0xFF44), 0);
}

// --- STAT ---

#[test]
fn stat_composes_mode_coincidence_and_selects() {
    let mut bus = bus_with_lcd_on();
    // Line 0, LYC 0: coincidence set, mode OAM scan, bit 7 reads 1.
    assert_eq!(bus.read8(0xFF41), 0x80 | 0x04 | Mode::OamScan as u8);

    bus.write8(0xFF45, 1);
    assert_eq!(bus.read8(0xFF41), 0x80 | Mode::OamScan as u8);

    // Only the select bits stick on write.
    bus.write8(0xFF41, 0xFF);
    assert_eq!(bus.read8(0xFF41) & 0x78, 0x78);
    tick_cycles(&mut bus, OAM_SCAN_CLOCKS);
    assert_eq!(bus.read8(0xFF41) & 0x03, Mode::VramScan as u8);
}

#[test]
fn lyc_coincidence_fires_the_stat_interrupt_once() {
    let mut bus = bus_with_lcd_on();
    bus.write8(0xFF41, 0x40);
    bus.write8(0xFF45, 5);

    tick_cycles(&mut bus, LINE_CLOCKS * 5);
    assert_eq!(bus.gpu.line, 5);
    assert_ne!(bus.if_reg & 0x02, 0, "STAT request on reaching LYC");

    // Edge-latched: the same match does not re-fire while it holds.
    bus.if_reg = 0;
    tick_cycles(&mut bus, 8);
    assert_eq!(bus.if_reg & 0x02, 0);
}

#[test]
fn mode_selects_fire_the_stat_interrupt() {
    let mut bus = bus_with_lcd_on();
    bus.write8(0xFF41, 0x08); // HBlank select
    tick_cycles(&mut bus, OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS);
    assert_ne!(bus.if_reg & 0x02, 0);

    let mut bus = bus_with_lcd_on();
    bus.write8(0xFF41, 0x20); // OAM select, fires when line 1 starts
    tick_cycles(&mut bus, LINE_CLOCKS);
    assert_ne!(bus.if_reg & 0x02, 0);

    let mut bus = bus_with_lcd_on();
    bus.write8(0xFF41, 0x10); // VBlank select
    tick_cycles(&mut bus, LINE_CLOCKS * 144);
    assert_eq!(bus.if_reg & 0x03, 0x03, "both VBlank and STAT requested");
}

// --- Rendering ---

#[test]
fn background_disabled_renders_a_white_row() {
    let mut bus = bus_with_lcd_on();
    tick_cycles(&mut bus, OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS);

    let fb = bus.gpu.framebuffer();
    assert_eq!(&fb[0..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&fb[159 * 4..160 * 4], &[0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn background_tile_renders_through_the_palette() {
    let mut bus = SystemBus::default();
    // Tile 0, row 0: both bitplanes solid, color index 3 across the row.
    bus.write8(0x8000, 0xFF);
    bus.write8(0x8001, 0xFF);
    bus.write8(0xFF47, 0xE4); // identity palette, index 3 -> black
    bus.write8(0xFF40, 0x91); // LCD on, unsigned tile data, BG on

    tick_cycles(&mut bus, OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS);

    let fb = bus.gpu.framebuffer();
    assert_eq!(&fb[0..4], &[0x00, 0x00, 0x00, 0xFF]);
    assert_eq!(&fb[159 * 4..160 * 4], &[0x00, 0x00, 0x00, 0xFF]);
}

#[test]
fn scroll_y_shifts_the_sampled_tile_row() {
    let mut bus = SystemBus::default();
    bus.write8(0x8000, 0xFF);
    bus.write8(0x8001, 0xFF);
    bus.write8(0xFF47, 0xE4);
    bus.write8(0xFF42, 1); // SCY: line 0 now samples tile row 1, all zero
    bus.write8(0xFF40, 0x91);

    tick_cycles(&mut bus, OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS);

    let fb = bus.gpu.framebuffer();
    assert_eq!(&fb[0..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn signed_tile_addressing_resolves_around_0x9000() {
    let mut bus = SystemBus::default();
    // Map entry 0xFF is tile -1 in 0x8800 addressing: 0x9000 - 16.
    bus.write8(0x9800, 0xFF);
    bus.write8(0x8FF0, 0xFF);
    bus.write8(0x8FF1, 0xFF);
    bus.write8(0xFF47, 0xE4);
    bus.write8(0xFF40, 0x81); // LCD on, signed tile data, BG on

    tick_cycles(&mut bus, OAM_SCAN_CLOCKS + VRAM_SCAN_CLOCKS);

    let fb = bus.gpu.framebuffer();
    // First tile (columns 0-7) is black, the rest map to tile 0 at 0x9000.
    assert_eq!(&fb[0..4], &[0x00, 0x00, 0x00, 0xFF]);
    assert_eq!(&fb[8 * 4..8 * 4 + 4], &[0xFF, 0xFF, 0xFF, 0xFF]);
}

// --- Whole machine ---

#[test]
fn load_and_add_scenario() {
    // LD A,5 ; ADD A,B placed at the entry point.
    let mut rom = vec![0u8; 0x100];
    rom.extend_from_slice(&[0x3E, 0x05, 0x80]);

    let mut gb = GameBoy::new();
    gb.load_rom(&rom);
    gb.cpu.regs.b = 3;

    assert_eq!(gb.step(), 8);
    assert_eq!(gb.step(), 4);
    assert_eq!(gb.cpu.regs.a, 8);
}

#[test]
fn gpu_time_advances_with_executed_instructions() {
    // A long NOP run with the LCD enabled moves LY forward.
    let mut rom = vec![0u8; 0x100];
    rom.extend_from_slice(&[0u8; 0x1000]);

    let mut gb = GameBoy::new();
    gb.load_rom(&rom);
    gb.bus.write8(0xFF40, 0x80);

    let mut elapsed = 0;
    while elapsed < LINE_CLOCKS * 2 {
        elapsed += gb.step();
    }
    assert_eq!(gb.bus.read8(0xFF44), 2);
}

#[test]
fn locked_cpu_stops_the_frame_loop() {
    let mut rom = vec![0u8; 0x100];
    rom.push(0xD3);

    let mut gb = GameBoy::new();
    gb.load_rom(&rom);

    gb.step_frame();
    assert!(gb.cpu.is_locked());
    assert_eq!(gb.step(), 0);
}

#[test]
fn reset_clears_machine_state() {
    let mut rom = vec![0u8; 0x100];
    rom.extend_from_slice(&[0x3E, 0x44]);

    let mut gb = GameBoy::new();
    gb.load_rom(&rom);
    gb.step();
    gb.bus.write8(0xC000, 0x55);

    gb.reset();
    assert_eq!(gb.cpu.regs.a, 0);
    assert_eq!(gb.cpu.regs.pc, 0x0100);
    assert_eq!(gb.bus.read8(0xC000), 0);
    assert_eq!(gb.bus.read8(0x0100), 0, "ROM contents dropped on reset");
}

#[test]
fn framebuffer_has_the_expected_size() {
    let gb = GameBoy::new();
    assert_eq!(
        gb.framebuffer().len(),
        crate::SCREEN_WIDTH * crate::SCREEN_HEIGHT * crate::BYTES_PER_PIXEL
    );
}
