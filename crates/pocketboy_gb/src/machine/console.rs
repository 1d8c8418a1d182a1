use crate::cpu::Cpu;

use super::{gpu::FRAME_CLOCKS, SystemBus};

/// High-level Game Boy machine: the CPU core plus the system bus (memory,
/// GPU timing, interrupt registers).
///
/// The driving loop is strictly synchronous: each [`GameBoy::step`] runs
/// one instruction to completion, the bus advances the GPU by the same
/// cycle count, and the next boundary services at most one interrupt.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: SystemBus,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: SystemBus::default(),
        }
    }

    /// Zero all registers, memory, interrupt and timing state, and place
    /// PC at the hardware entry address (0x0100).
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus = SystemBus::default();
    }

    /// Copy a ROM image into the cartridge region. The core assumes a
    /// valid, fully loaded image; reading the file is the caller's job.
    pub fn load_rom(&mut self, rom: &[u8]) {
        self.bus.load_rom(rom);
    }

    /// Execute one instruction and return its cost in T-cycles (0 when the
    /// CPU has locked up on an unrecognized opcode).
    pub fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.bus)
    }

    /// Run approximately one frame's worth of time (70224 T-cycles),
    /// stopping early if the CPU locks.
    pub fn step_frame(&mut self) {
        let mut elapsed = 0u32;
        while elapsed < FRAME_CLOCKS {
            let taken = self.step();
            if taken == 0 {
                break;
            }
            elapsed += taken;
        }
    }

    /// The RGBA framebuffer, one scanline at a time during the frame and
    /// complete once VBlank is reached.
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.gpu.framebuffer()
    }
}
