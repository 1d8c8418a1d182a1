//! Pure arithmetic/logic operations and their flag computations.
//!
//! Every function here takes plain register values and returns the result
//! together with a fully formed F byte (or just the F byte for compare and
//! bit-test). Keeping the flag arithmetic free of CPU state makes the
//! carry/half-carry edge cases directly testable.

use super::Flag;

/// 8-bit add (ADD/ADC). `carry_in` feeds the current carry flag for ADC.
///
/// C: unsigned 8-bit overflow. H: low-nibble sum past 0x0F. Z: wrapped
/// result is zero. N: cleared.
#[inline]
pub fn add8(a: u8, n: u8, carry_in: bool) -> (u8, u8) {
    let c = carry_in as u8;
    let result = a.wrapping_add(n).wrapping_add(c);

    let mut f = 0;
    if result == 0 {
        f |= Flag::Z.mask();
    }
    if (a & 0x0F) + (n & 0x0F) + c > 0x0F {
        f |= Flag::H.mask();
    }
    if (a as u16) + (n as u16) + (c as u16) > 0xFF {
        f |= Flag::C.mask();
    }
    (result, f)
}

/// 8-bit subtract (SUB/SBC). `carry_in` feeds the borrow for SBC.
///
/// N: always set. C: unsigned borrow (minuend < subtrahend). H: low-nibble
/// borrow. Z: result is zero.
#[inline]
pub fn sub8(a: u8, n: u8, carry_in: bool) -> (u8, u8) {
    let c = carry_in as u8;
    let result = a.wrapping_sub(n).wrapping_sub(c);

    let mut f = Flag::N.mask();
    if result == 0 {
        f |= Flag::Z.mask();
    }
    if (a & 0x0F) < (n & 0x0F) + c {
        f |= Flag::H.mask();
    }
    if (a as u16) < (n as u16) + (c as u16) {
        f |= Flag::C.mask();
    }
    (result, f)
}

/// Compare: identical flag computation to `sub8`, result discarded.
#[inline]
pub fn cp8(a: u8, n: u8) -> u8 {
    sub8(a, n, false).1
}

/// Bitwise AND. H is always set; C and N cleared.
#[inline]
pub fn and8(a: u8, n: u8) -> (u8, u8) {
    let result = a & n;
    let mut f = Flag::H.mask();
    if result == 0 {
        f |= Flag::Z.mask();
    }
    (result, f)
}

/// Bitwise OR. Only Z may be set.
#[inline]
pub fn or8(a: u8, n: u8) -> (u8, u8) {
    let result = a | n;
    let f = if result == 0 { Flag::Z.mask() } else { 0 };
    (result, f)
}

/// Bitwise XOR. Only Z may be set.
#[inline]
pub fn xor8(a: u8, n: u8) -> (u8, u8) {
    let result = a ^ n;
    let f = if result == 0 { Flag::Z.mask() } else { 0 };
    (result, f)
}

/// 16-bit add for `ADD HL,rr`.
///
/// Z is carried through from `old_f` untouched (hardware quirk); N is
/// cleared; H is the carry out of bit 11; C the carry out of bit 15.
#[inline]
pub fn add16(hl: u16, n: u16, old_f: u8) -> (u16, u8) {
    let result = hl.wrapping_add(n);

    let mut f = old_f & Flag::Z.mask();
    if (hl & 0x0FFF) + (n & 0x0FFF) > 0x0FFF {
        f |= Flag::H.mask();
    }
    if (hl as u32) + (n as u32) > 0xFFFF {
        f |= Flag::C.mask();
    }
    (result, f)
}

/// Signed-immediate 16-bit add used by ADD SP,r8 and LD HL,SP+r8.
///
/// Z and N are cleared; H and C come from the low byte of the addition.
#[inline]
pub fn add16_signed(base: u16, imm8: u8) -> (u16, u8) {
    let offset = imm8 as i8 as i16 as u16;

    let mut f = 0;
    if (base & 0x000F) + (offset & 0x000F) > 0x000F {
        f |= Flag::H.mask();
    }
    if (base & 0x00FF) + (offset & 0x00FF) > 0x00FF {
        f |= Flag::C.mask();
    }
    (base.wrapping_add(offset), f)
}

/// 8-bit increment for INC r. C is carried through from `old_f`.
#[inline]
pub fn inc8(value: u8, old_f: u8) -> (u8, u8) {
    let result = value.wrapping_add(1);

    let mut f = old_f & Flag::C.mask();
    if result == 0 {
        f |= Flag::Z.mask();
    }
    if (value & 0x0F) == 0x0F {
        f |= Flag::H.mask();
    }
    (result, f)
}

/// 8-bit decrement for DEC r. C is carried through from `old_f`.
#[inline]
pub fn dec8(value: u8, old_f: u8) -> (u8, u8) {
    let result = value.wrapping_sub(1);

    let mut f = (old_f & Flag::C.mask()) | Flag::N.mask();
    if result == 0 {
        f |= Flag::Z.mask();
    }
    if (value & 0x0F) == 0 {
        f |= Flag::H.mask();
    }
    (result, f)
}

/// Shared flag formation for the rotate/shift family: C from the bit
/// shifted out, Z from the result, N and H cleared.
#[inline]
fn shift_flags(result: u8, carry_out: bool) -> u8 {
    let mut f = 0;
    if result == 0 {
        f |= Flag::Z.mask();
    }
    if carry_out {
        f |= Flag::C.mask();
    }
    f
}

/// Rotate left; bit 7 goes to both bit 0 and carry.
#[inline]
pub fn rlc(value: u8) -> (u8, u8) {
    let result = value.rotate_left(1);
    (result, shift_flags(result, value & 0x80 != 0))
}

/// Rotate right; bit 0 goes to both bit 7 and carry.
#[inline]
pub fn rrc(value: u8) -> (u8, u8) {
    let result = value.rotate_right(1);
    (result, shift_flags(result, value & 0x01 != 0))
}

/// Rotate left through carry: carry in to bit 0, bit 7 out to carry.
#[inline]
pub fn rl(value: u8, carry_in: bool) -> (u8, u8) {
    let result = (value << 1) | carry_in as u8;
    (result, shift_flags(result, value & 0x80 != 0))
}

/// Rotate right through carry: carry in to bit 7, bit 0 out to carry.
#[inline]
pub fn rr(value: u8, carry_in: bool) -> (u8, u8) {
    let result = (value >> 1) | if carry_in { 0x80 } else { 0 };
    (result, shift_flags(result, value & 0x01 != 0))
}

/// Shift left arithmetic; bit 0 becomes zero.
#[inline]
pub fn sla(value: u8) -> (u8, u8) {
    let result = value << 1;
    (result, shift_flags(result, value & 0x80 != 0))
}

/// Shift right arithmetic; bit 7 is preserved.
#[inline]
pub fn sra(value: u8) -> (u8, u8) {
    let result = (value >> 1) | (value & 0x80);
    (result, shift_flags(result, value & 0x01 != 0))
}

/// Shift right logical; bit 7 becomes zero.
#[inline]
pub fn srl(value: u8) -> (u8, u8) {
    let result = value >> 1;
    (result, shift_flags(result, value & 0x01 != 0))
}

/// Swap the high and low nibbles. Carry is always cleared.
#[inline]
pub fn swap(value: u8) -> (u8, u8) {
    let result = (value << 4) | (value >> 4);
    (result, shift_flags(result, false))
}

/// BIT b,r flag computation: Z from the tested bit, N cleared, H set,
/// C carried through from `old_f`. The register value is untouched.
#[inline]
pub fn bit_test(value: u8, bit: u8, old_f: u8) -> u8 {
    assert!(bit <= 7, "bit index out of range: {bit}");

    let mut f = (old_f & Flag::C.mask()) | Flag::H.mask();
    if value & (1 << bit) == 0 {
        f |= Flag::Z.mask();
    }
    f
}

/// SET b,r. Flags are unaffected.
#[inline]
pub fn bit_set(value: u8, bit: u8) -> u8 {
    assert!(bit <= 7, "bit index out of range: {bit}");
    value | (1 << bit)
}

/// RES b,r. Flags are unaffected.
#[inline]
pub fn bit_clear(value: u8, bit: u8) -> u8 {
    assert!(bit <= 7, "bit index out of range: {bit}");
    value & !(1 << bit)
}

/// Decimal adjust after BCD addition/subtraction.
///
/// Uses C, H and N from `old_f` to compute the correction; updates A, Z,
/// H (cleared) and C; N is preserved.
pub fn daa(a: u8, old_f: u8) -> (u8, u8) {
    let n = old_f & Flag::N.mask() != 0;
    let mut adjust: u8 = if old_f & Flag::C.mask() != 0 { 0x60 } else { 0 };
    if old_f & Flag::H.mask() != 0 {
        adjust |= 0x06;
    }

    let result = if !n {
        if (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if a > 0x99 {
            adjust |= 0x60;
        }
        a.wrapping_add(adjust)
    } else {
        a.wrapping_sub(adjust)
    };

    let mut f = old_f & Flag::N.mask();
    if result == 0 {
        f |= Flag::Z.mask();
    }
    if adjust >= 0x60 {
        f |= Flag::C.mask();
    }
    (result, f)
}
