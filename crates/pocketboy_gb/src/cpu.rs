pub mod alu;
mod cb;
mod exec;
mod interrupts;
mod regs;


pub use regs::{Flag, Registers};

/// Hardware entry address once control is handed to cartridge code.
pub const ENTRY_POINT: u16 = 0x0100;

/// Abstraction over the memory bus seen by the CPU.
///
/// Word accesses compose two byte accesses in little-endian order; `tick`
/// lets a system bus advance its peripherals (the GPU timing machine) by
/// the cycle cost the CPU just reported. Flat test buses leave it a no-op.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr) as u16;
        let hi = self.read8(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn write16(&mut self, addr: u16, value: u16) {
        self.write8(addr, value as u8);
        self.write8(addr.wrapping_add(1), (value >> 8) as u8);
    }

    /// Advance bus-side peripherals by a given number of CPU T-cycles.
    fn tick(&mut self, _cycles: u32) {}
}

/// LR35902 CPU core.
///
/// Holds the register file and the interrupt/halt control state. Memory is
/// reached exclusively through a [`Bus`] passed into [`Cpu::step`].
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable flip-flop.
    pub ime: bool,
    pub halted: bool,
    stopped: bool,
    /// Set after executing one of the undocumented opcode holes. The CPU is
    /// dead until reset; `step` returns 0 cycles so drivers can stop.
    locked: bool,
    ime_enable_pending: bool,
    ime_enable_delay: bool,
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self::default();
        cpu.reset();
        cpu
    }

    /// Reset to the documented post-boot state: all registers, flags and
    /// control state cleared, PC at the cartridge entry point.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.regs.pc = ENTRY_POINT;
        self.ime = false;
        self.halted = false;
        self.stopped = false;
        self.locked = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Execute one instruction (or service one interrupt) and return its
    /// cost in T-cycles.
    ///
    /// The bus is ticked by the same cycle count before returning, so a
    /// system bus sees CPU and peripheral time advance in lockstep.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.locked {
            return 0;
        }

        // STOP is exited when a joypad line goes low. With the joypad
        // register stubbed the lower nibble always reads high, so in
        // practice the core stays stopped; time does not advance.
        if self.stopped {
            let p1 = bus.read8(0xFF00);
            if (p1 & 0x0F) != 0x0F {
                self.stopped = false;
            }
            return 4;
        }

        if let Some(cycles) = self.service_interrupt(bus) {
            bus.tick(cycles);
            return cycles;
        }

        if self.halted {
            // Halted CPU burns NOP-equivalent time until an interrupt
            // becomes pending.
            bus.tick(4);
            return 4;
        }

        let opcode = self.fetch8(bus);
        let cycles = self.exec_opcode(bus, opcode);

        bus.tick(cycles);
        self.apply_ime_delay();
        cycles
    }

    /// Apply the one-instruction delay of EI: IME turns on only after the
    /// instruction following EI has completed.
    fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }

    #[inline]
    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    #[inline]
    fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus) as u16;
        let hi = self.fetch8(bus) as u16;
        (hi << 8) | lo
    }

    #[inline]
    fn push16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        // Stack grows downward: memory[SP] = low, memory[SP+1] = high.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, (value >> 8) as u8);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, value as u8);
    }

    #[inline]
    fn pop16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp) as u16;
        let hi = bus.read8(self.regs.sp.wrapping_add(1)) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(2);
        (hi << 8) | lo
    }

    /// Read an 8-bit operand by table index: 0=B 1=C 2=D 3=E 4=H 5=L
    /// 6=(HL) 7=A.
    #[inline]
    fn read_operand<B: Bus>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write an 8-bit operand by table index; encoding matches
    /// [`Cpu::read_operand`].
    #[inline]
    fn write_operand<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }
}
