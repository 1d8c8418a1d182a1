use super::{Bus, Cpu};

/// Base of the interrupt vector table; vector `i` lives at 0x40 + 8*i.
const VECTOR_BASE: u16 = 0x0040;

impl Cpu {
    /// Service at most one pending interrupt at the instruction boundary.
    ///
    /// Priority is fixed by bit index, lowest first: VBlank, LCD STAT,
    /// Timer, Serial, Joypad. Returns `Some(cycles)` when an interrupt was
    /// dispatched.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let ie = bus.read8(0xFFFF);
        let iflags = bus.read8(0xFF0F);
        let pending = ie & iflags & 0x1F;
        if pending == 0 {
            return None;
        }

        // A pending interrupt wakes a halted CPU even when IME is clear,
        // without being serviced.
        if self.halted && !self.ime {
            self.halted = false;
            return None;
        }

        if !self.ime {
            return None;
        }

        let index = pending.trailing_zeros() as u8;

        // Dispatch: drop IME, acknowledge exactly this one request, push
        // the return address and jump to the fixed vector.
        self.ime = false;
        self.halted = false;
        bus.write8(0xFF0F, iflags & !(1 << index));

        let pc = self.regs.pc;
        self.push16(bus, pc);
        self.regs.pc = VECTOR_BASE + (index as u16) * 8;

        log::debug!(
            "interrupt dispatch: idx={} vector=0x{:04X} from pc=0x{:04X} sp=0x{:04X}",
            index,
            self.regs.pc,
            pc,
            self.regs.sp,
        );

        Some(20)
    }
}
