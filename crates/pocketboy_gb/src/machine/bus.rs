use crate::cpu::Bus;

use super::{gpu::Gpu, MEMORY_SIZE};

/// End of the cartridge ROM region (read-only from the core's side).
const ROM_END: u16 = 0x7FFF;
/// Working RAM and its echo mirror. Echo covers 0xE000-0xFDFF, so only
/// 0xC000-0xDDFF has an echo counterpart.
const WRAM_START: u16 = 0xC000;
const WRAM_END: u16 = 0xDFFF;
const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFDFF;
/// Distance between working RAM and its echo.
const ECHO_OFFSET: u16 = ECHO_START - WRAM_START;

/// The 64 KiB system bus.
///
/// A flat backing array overlaid with an explicit routing table: a handful
/// of I/O addresses are redirected to live GPU and interrupt-controller
/// fields instead of plain storage, and working RAM writes are mirrored
/// into the echo region.
pub struct SystemBus {
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) gpu: Gpu,
    /// Interrupt pending-request mask (IF, 0xFF0F), bits 0-4.
    pub(crate) if_reg: u8,
    /// Interrupt enable mask (IE, 0xFFFF).
    pub(crate) ie_reg: u8,
    /// Joypad group-select bits (P1 bits 4-5). Input itself is stubbed:
    /// the lower nibble always reads back high (nothing pressed).
    joyp_select: u8,
}

impl Default for SystemBus {
    fn default() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            gpu: Gpu::default(),
            if_reg: 0,
            ie_reg: 0,
            joyp_select: 0x30,
        }
    }
}

impl SystemBus {
    /// Copy a ROM image verbatim into the cartridge region starting at
    /// 0x0000. No header validation; oversized images are truncated to the
    /// ROM region.
    pub(super) fn load_rom(&mut self, rom: &[u8]) {
        let len = rom.len().min(ROM_END as usize + 1);
        self.memory[..len].copy_from_slice(&rom[..len]);
    }

    fn read8_routed(&self, addr: u16) -> u8 {
        match addr {
            // Echo RAM reads come from the underlying working RAM.
            ECHO_START..=ECHO_END => self.memory[(addr - ECHO_OFFSET) as usize],

            // Joypad (stub): upper two bits and the input nibble read high.
            0xFF00 => self.joyp_select | 0xCF,

            // Interrupt flags; unused upper bits read as 1.
            0xFF0F => self.if_reg | 0xE0,
            0xFFFF => self.ie_reg,

            // LCD registers live in the GPU, never in the array. LY in
            // particular always reflects the current scanline.
            0xFF40 => self.gpu.lcdc,
            0xFF41 => self.gpu.stat(),
            0xFF42 => self.gpu.scroll_y,
            0xFF43 => self.gpu.scroll_x,
            0xFF44 => self.gpu.line,
            0xFF45 => self.gpu.lyc,
            0xFF47 => self.gpu.bgp,

            _ => self.memory[addr as usize],
        }
    }

    fn write8_routed(&mut self, addr: u16, value: u8) {
        match addr {
            // Cartridge ROM is read-only from the CPU's point of view.
            0x0000..=ROM_END => {}

            // Working RAM: mirror into the echo region where it exists.
            WRAM_START..=WRAM_END => {
                self.memory[addr as usize] = value;
                let echo = addr + ECHO_OFFSET;
                if echo <= ECHO_END {
                    self.memory[echo as usize] = value;
                }
            }

            // Echo RAM: keep the underlying working RAM coherent.
            ECHO_START..=ECHO_END => {
                self.memory[addr as usize] = value;
                self.memory[(addr - ECHO_OFFSET) as usize] = value;
            }

            0xFF00 => self.joyp_select = value & 0x30,

            // Only the five interrupt lines are writable in IF.
            0xFF0F => self.if_reg = value & 0x1F,
            0xFFFF => self.ie_reg = value,

            0xFF40 => self.gpu.write_lcdc(value),
            0xFF41 => self.gpu.write_stat(value),
            0xFF42 => self.gpu.scroll_y = value,
            0xFF43 => self.gpu.scroll_x = value,
            // LY is read-only from outside the GPU.
            0xFF44 => {}
            0xFF45 => self.gpu.lyc = value,
            0xFF47 => self.gpu.bgp = value,

            _ => self.memory[addr as usize] = value,
        }
    }
}

impl Bus for SystemBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.read8_routed(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.write8_routed(addr, value)
    }

    /// Feed the instruction's cycle cost to the GPU timing machine and
    /// collect any interrupt requests it raised.
    fn tick(&mut self, cycles: u32) {
        let irq = self.gpu.tick(cycles, &self.memory);
        self.if_reg |= irq;
    }
}
