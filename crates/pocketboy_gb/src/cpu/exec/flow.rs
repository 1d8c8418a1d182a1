use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    /// Branch condition by table index: 0=NZ, 1=Z, 2=NC, 3=C.
    #[inline]
    pub(super) fn condition(&self, cc: u8) -> bool {
        match cc {
            0 => !self.regs.flag(Flag::Z),
            1 => self.regs.flag(Flag::Z),
            2 => !self.regs.flag(Flag::C),
            _ => self.regs.flag(Flag::C),
        }
    }

    /// JR / JR cc. The displacement byte is always consumed, so a
    /// not-taken branch still leaves PC past the operand.
    pub(super) fn jump_relative<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        let offset = self.fetch8(bus) as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
            12
        } else {
            8
        }
    }

    /// JP a16 / JP cc,a16.
    pub(super) fn jump_absolute<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        let addr = self.fetch16(bus);
        if taken {
            self.regs.pc = addr;
            16
        } else {
            12
        }
    }

    pub(super) fn op_jp_hl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        4
    }

    /// CALL a16 / CALL cc,a16.
    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        let addr = self.fetch16(bus);
        if taken {
            let ret = self.regs.pc;
            self.push16(bus, ret);
            self.regs.pc = addr;
            24
        } else {
            12
        }
    }

    /// RET cc.
    pub(super) fn return_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        if taken {
            self.regs.pc = self.pop16(bus);
            20
        } else {
            8
        }
    }

    pub(super) fn op_ret<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop16(bus);
        16
    }

    /// RETI: return and re-enable interrupts immediately (no EI delay).
    pub(super) fn op_reti<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop16(bus);
        self.ime = true;
        16
    }

    /// RST nn: push PC and jump to one of the eight fixed vectors encoded
    /// in opcode bits 3-5.
    pub(super) fn op_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(
            opcode,
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF
        ));

        let ret = self.regs.pc;
        self.push16(bus, ret);
        self.regs.pc = (opcode & 0x38) as u16;
        16
    }
}
