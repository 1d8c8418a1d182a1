use crate::cpu::{alu, Bus, Cpu, Flag};

impl Cpu {
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP with a register or (HL) source
    /// (opcodes 0x80-0xBF). The operation index is bits 3-5.
    pub(super) fn op_alu_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!((0x80..=0xBF).contains(&opcode));

        let src = opcode & 0x07;
        let value = self.read_operand(bus, src);
        self.apply_alu((opcode >> 3) & 0x07, value);

        if src == 6 {
            8
        } else {
            4
        }
    }

    /// Immediate variants: ADD/ADC/SUB/SBC/AND/XOR/OR/CP d8.
    pub(super) fn op_alu_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));

        let value = self.fetch8(bus);
        self.apply_alu((opcode >> 3) & 0x07, value);
        8
    }

    fn apply_alu(&mut self, operation: u8, value: u8) {
        let a = self.regs.a;
        let carry = self.regs.flag(Flag::C);
        let (result, f) = match operation {
            0 => alu::add8(a, value, false),
            1 => alu::add8(a, value, carry),
            2 => alu::sub8(a, value, false),
            3 => alu::sub8(a, value, carry),
            4 => alu::and8(a, value),
            5 => alu::xor8(a, value),
            6 => alu::or8(a, value),
            // CP: flags only, accumulator untouched.
            _ => (a, alu::cp8(a, value)),
        };
        self.regs.a = result;
        self.regs.f = f;
    }

    pub(super) fn op_inc8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(
            opcode,
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C
        ));

        let index = (opcode >> 3) & 0x07;
        let value = self.read_operand(bus, index);
        let (result, f) = alu::inc8(value, self.regs.f);
        self.write_operand(bus, index, result);
        self.regs.f = f;

        if index == 6 {
            12
        } else {
            4
        }
    }

    pub(super) fn op_dec8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(
            opcode,
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D
        ));

        let index = (opcode >> 3) & 0x07;
        let value = self.read_operand(bus, index);
        let (result, f) = alu::dec8(value, self.regs.f);
        self.write_operand(bus, index, result);
        self.regs.f = f;

        if index == 6 {
            12
        } else {
            4
        }
    }

    /// 16-bit INC rr; no flags are touched.
    pub(super) fn op_inc16(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));

        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(self.regs.bc().wrapping_add(1)),
            1 => self.regs.set_de(self.regs.de().wrapping_add(1)),
            2 => self.regs.set_hl(self.regs.hl().wrapping_add(1)),
            _ => self.regs.sp = self.regs.sp.wrapping_add(1),
        }
        8
    }

    /// 16-bit DEC rr; no flags are touched.
    pub(super) fn op_dec16(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));

        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(self.regs.bc().wrapping_sub(1)),
            1 => self.regs.set_de(self.regs.de().wrapping_sub(1)),
            2 => self.regs.set_hl(self.regs.hl().wrapping_sub(1)),
            _ => self.regs.sp = self.regs.sp.wrapping_sub(1),
        }
        8
    }

    /// ADD HL,rr. Z is left alone (hardware quirk).
    pub(super) fn op_add_hl_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));

        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        };
        let (result, f) = alu::add16(self.regs.hl(), value, self.regs.f);
        self.regs.set_hl(result);
        self.regs.f = f;
        8
    }

    pub(super) fn op_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        let (result, f) = alu::add16_signed(self.regs.sp, imm);
        self.regs.sp = result;
        self.regs.f = f;
        16
    }

    pub(super) fn op_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        let (result, f) = alu::add16_signed(self.regs.sp, imm);
        self.regs.set_hl(result);
        self.regs.f = f;
        12
    }

    /// Unprefixed accumulator rotates RLCA/RRCA/RLA/RRA. Unlike the CB
    /// page variants these always clear Z.
    pub(super) fn op_rotate_a(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let a = self.regs.a;
        let carry = self.regs.flag(Flag::C);
        let (result, f) = match opcode {
            0x07 => alu::rlc(a),
            0x0F => alu::rrc(a),
            0x17 => alu::rl(a, carry),
            _ => alu::rr(a, carry),
        };
        self.regs.a = result;
        self.regs.f = f & !Flag::Z.mask();
        4
    }

    pub(super) fn op_daa(&mut self) -> u32 {
        let (result, f) = alu::daa(self.regs.a, self.regs.f);
        self.regs.a = result;
        self.regs.f = f;
        4
    }

    pub(super) fn op_cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.regs.set_flag(Flag::N, true);
        self.regs.set_flag(Flag::H, true);
        4
    }

    pub(super) fn op_scf(&mut self) -> u32 {
        self.regs.set_flag(Flag::C, true);
        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, false);
        4
    }

    pub(super) fn op_ccf(&mut self) -> u32 {
        let carry = self.regs.flag(Flag::C);
        self.regs.set_flag(Flag::C, !carry);
        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, false);
        4
    }
}
