use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn op_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));

        let value = self.fetch16(bus);
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
        12
    }

    pub(super) fn op_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));

        let dst = (opcode >> 3) & 0x07;
        let value = self.fetch8(bus);
        self.write_operand(bus, dst, value);

        if dst == 6 {
            12
        } else {
            8
        }
    }

    /// LD r,r' block (0x40-0x7F), with HALT occupying the 0x76 slot.
    pub(super) fn op_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!((0x40..=0x7F).contains(&opcode));

        if opcode == 0x76 {
            return self.op_halt(bus);
        }

        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_operand(bus, src);
        self.write_operand(bus, dst, value);

        if dst == 6 || src == 6 {
            8
        } else {
            4
        }
    }

    /// LD (BC),A / LD (DE),A / LD (HL+),A / LD (HL-),A.
    pub(super) fn op_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));

        let pair = (opcode >> 4) & 0x03;
        let addr = match pair {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            _ => self.regs.hl(),
        };

        bus.write8(addr, self.regs.a);

        match pair {
            2 => self.regs.set_hl(addr.wrapping_add(1)),
            3 => self.regs.set_hl(addr.wrapping_sub(1)),
            _ => {}
        }
        8
    }

    /// LD A,(BC) / LD A,(DE) / LD A,(HL+) / LD A,(HL-).
    pub(super) fn op_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));

        let pair = (opcode >> 4) & 0x03;
        let addr = match pair {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            _ => self.regs.hl(),
        };

        self.regs.a = bus.read8(addr);

        match pair {
            2 => self.regs.set_hl(addr.wrapping_add(1)),
            3 => self.regs.set_hl(addr.wrapping_sub(1)),
            _ => {}
        }
        8
    }

    pub(super) fn op_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        let sp = self.regs.sp;
        bus.write16(addr, sp);
        20
    }

    pub(super) fn op_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));

        let offset = self.fetch8(bus) as u16;
        let addr = 0xFF00u16.wrapping_add(offset);
        if opcode == 0xE0 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        12
    }

    pub(super) fn op_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));

        let addr = 0xFF00u16.wrapping_add(self.regs.c as u16);
        if opcode == 0xE2 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        8
    }

    pub(super) fn op_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));

        let addr = self.fetch16(bus);
        if opcode == 0xEA {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        16
    }

    pub(super) fn op_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        8
    }

    pub(super) fn op_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));

        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.af(),
        };
        self.push16(bus, value);
        16
    }

    pub(super) fn op_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));

        let value = self.pop16(bus);
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            // POP AF masks the low nibble of F via set_af.
            _ => self.regs.set_af(value),
        }
        12
    }
}
