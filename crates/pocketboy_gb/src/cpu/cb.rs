use super::{alu, Bus, Cpu, Flag};

impl Cpu {
    /// Decode and execute one opcode from the 0xCB-prefixed secondary page.
    ///
    /// The page is perfectly regular: bits 6-7 select the group (shift,
    /// BIT, RES, SET), bits 3-5 the sub-operation or bit index, bits 0-2
    /// the operand (register or (HL)).
    pub(super) fn exec_cb_opcode<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let cb = self.fetch8(bus);
        let group = cb >> 6;
        let sel = (cb >> 3) & 0x07;
        let operand = cb & 0x07;

        match group {
            // Rotates, shifts and SWAP.
            0 => {
                let value = self.read_operand(bus, operand);
                let carry = self.regs.flag(Flag::C);
                let (result, f) = match sel {
                    0 => alu::rlc(value),
                    1 => alu::rrc(value),
                    2 => alu::rl(value, carry),
                    3 => alu::rr(value, carry),
                    4 => alu::sla(value),
                    5 => alu::sra(value),
                    6 => alu::swap(value),
                    _ => alu::srl(value),
                };
                self.write_operand(bus, operand, result);
                self.regs.f = f;

                if operand == 6 {
                    16
                } else {
                    8
                }
            }
            // BIT b,r: flags only.
            1 => {
                let value = self.read_operand(bus, operand);
                self.regs.f = alu::bit_test(value, sel, self.regs.f);

                if operand == 6 {
                    12
                } else {
                    8
                }
            }
            // RES b,r.
            2 => {
                let value = self.read_operand(bus, operand);
                let result = alu::bit_clear(value, sel);
                self.write_operand(bus, operand, result);

                if operand == 6 {
                    16
                } else {
                    8
                }
            }
            // SET b,r.
            _ => {
                let value = self.read_operand(bus, operand);
                let result = alu::bit_set(value, sel);
                self.write_operand(bus, operand, result);

                if operand == 6 {
                    16
                } else {
                    8
                }
            }
        }
    }
}
