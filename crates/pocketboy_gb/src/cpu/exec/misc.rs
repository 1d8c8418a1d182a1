use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// HALT: idle until an interrupt is pending. If one is already pending
    /// while IME is clear the CPU does not halt at all.
    pub(super) fn op_halt<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if !self.ime {
            let ie = bus.read8(0xFFFF);
            let iflags = bus.read8(0xFF0F);
            if ie & iflags & 0x1F != 0 {
                return 4;
            }
        }
        self.halted = true;
        4
    }

    /// STOP: a 2-byte instruction (the padding byte is fetched and
    /// discarded) entering a low-power state deeper than HALT.
    pub(super) fn op_stop<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let _padding = self.fetch8(bus);
        self.stopped = true;
        self.halted = false;
        4
    }

    pub(super) fn op_di(&mut self) -> u32 {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        4
    }

    /// EI: IME becomes 1 only after the *next* instruction completes.
    pub(super) fn op_ei(&mut self) -> u32 {
        self.ime_enable_pending = true;
        4
    }
}
