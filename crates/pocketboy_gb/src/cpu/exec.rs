mod arith;
mod flow;
mod load;
mod misc;

use super::{Bus, Cpu};

impl Cpu {
    /// Decode and execute a single primary-page opcode; returns the cost in
    /// T-cycles.
    ///
    /// The page is dispatched by a single exhaustive match (0xCB chains into
    /// the secondary page). Conditional branches report a smaller cost when
    /// the branch is not taken; every other cost is a static property of the
    /// opcode.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        match opcode {
            // NOP
            0x00 => 4,

            // LD rr,d16
            0x01 | 0x11 | 0x21 | 0x31 => self.op_ld_rr_d16(bus, opcode),
            // LD (BC/DE/HL+/HL-),A
            0x02 | 0x12 | 0x22 | 0x32 => self.op_ld_indirect_a(bus, opcode),
            // INC rr / DEC rr
            0x03 | 0x13 | 0x23 | 0x33 => self.op_inc16(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.op_dec16(opcode),
            // INC r / DEC r
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => self.op_inc8(bus, opcode),
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => self.op_dec8(bus, opcode),
            // LD r,d8
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => self.op_ld_r_d8(bus, opcode),
            // RLCA/RRCA/RLA/RRA
            0x07 | 0x0F | 0x17 | 0x1F => self.op_rotate_a(opcode),
            // LD (a16),SP
            0x08 => self.op_ld_a16_sp(bus),
            // ADD HL,rr
            0x09 | 0x19 | 0x29 | 0x39 => self.op_add_hl_rr(opcode),
            // LD A,(BC/DE/HL+/HL-)
            0x0A | 0x1A | 0x2A | 0x3A => self.op_ld_a_indirect(bus, opcode),

            // STOP
            0x10 => self.op_stop(bus),
            // JR r8 / JR cc,r8
            0x18 => self.jump_relative(bus, true),
            0x20 | 0x28 | 0x30 | 0x38 => {
                let taken = self.condition((opcode >> 3) & 0x03);
                self.jump_relative(bus, taken)
            }

            // DAA / CPL / SCF / CCF
            0x27 => self.op_daa(),
            0x2F => self.op_cpl(),
            0x37 => self.op_scf(),
            0x3F => self.op_ccf(),

            // LD r,r' and HALT (0x76)
            0x40..=0x7F => self.op_ld_r_r(bus, opcode),

            // ADD/ADC/SUB/SBC/AND/XOR/OR/CP on A, register/(HL) sources
            0x80..=0xBF => self.op_alu_r(bus, opcode),

            // RET cc / RET / RETI
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                let taken = self.condition((opcode >> 3) & 0x03);
                self.return_cond(bus, taken)
            }
            0xC9 => self.op_ret(bus),
            0xD9 => self.op_reti(bus),

            // POP rr / PUSH rr
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.op_pop_rr(bus, opcode),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.op_push_rr(bus, opcode),

            // JP cc,a16 / JP a16 / JP HL
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let taken = self.condition((opcode >> 3) & 0x03);
                self.jump_absolute(bus, taken)
            }
            0xC3 => self.jump_absolute(bus, true),
            0xE9 => self.op_jp_hl(),

            // CALL cc,a16 / CALL a16
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let taken = self.condition((opcode >> 3) & 0x03);
                self.call_cond(bus, taken)
            }
            0xCD => self.call_cond(bus, true),

            // ALU d8
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => self.op_alu_d8(bus, opcode),

            // RST nn
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.op_rst(bus, opcode),

            // 0xCB prefix: secondary page.
            0xCB => self.exec_cb_opcode(bus),

            // LDH (a8),A / LDH A,(a8) and the (C) variants
            0xE0 | 0xF0 => self.op_ldh_a8(bus, opcode),
            0xE2 | 0xF2 => self.op_ldh_c(bus, opcode),

            // ADD SP,r8 / LD HL,SP+r8 / LD SP,HL
            0xE8 => self.op_add_sp_r8(bus),
            0xF8 => self.op_ld_hl_sp_r8(bus),
            0xF9 => self.op_ld_sp_hl(),

            // LD (a16),A / LD A,(a16)
            0xEA | 0xFA => self.op_ld_a16_a(bus, opcode),

            // DI / EI
            0xF3 => self.op_di(),
            0xFB => self.op_ei(),

            // Opcode holes: D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD.
            // These hard-lock the CPU on real hardware; report and lock.
            _ => {
                let at = self.regs.pc.wrapping_sub(1);
                log::error!(
                    "CPU locked: unrecognized opcode 0x{opcode:02X} at PC=0x{at:04X} \
                     (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                    sp = self.regs.sp,
                    af = self.regs.af(),
                    bc = self.regs.bc(),
                    de = self.regs.de(),
                    hl = self.regs.hl(),
                );
                self.locked = true;
                0
            }
        }
    }
}
