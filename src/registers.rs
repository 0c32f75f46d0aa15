//! # Register File
//!
//! This module contains the SM83 register file: eight 8-bit registers, the
//! program counter and stack pointer, the flags register and the arithmetic,
//! logic and bit primitives the instruction set is built from.
//!
//! ## Layout
//!
//! - **8-bit registers**: A, B, C, D, E, F, H, L (see [`Reg8`])
//! - **16-bit registers**: PC, SP (see [`Reg16`])
//! - **Pairs**: any two 8-bit registers combine into a 16-bit view
//!   (high × 256 + low); the pair is not separate storage
//!
//! ## Flags
//!
//! Only the upper nibble of F is defined:
//!
//! - Bit 7: Z (Zero)
//! - Bit 6: N (Subtract)
//! - Bit 5: H (Half-Carry)
//! - Bit 4: C (Carry)
//!
//! The lower nibble is unused. A direct write through [`Registers::set8`]
//! reads back exactly as written.
//!
//! ## Result contracts
//!
//! Every arithmetic primitive returns an [`AluOutcome`] and every rotate,
//! shift or swap returns a [`ShiftOutcome`], so callers drive flag updates
//! without recomputing anything.

/// 8-bit register identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    F,
    H,
    L,
}

impl Reg8 {
    /// All eight registers in storage order.
    pub const ALL: [Reg8; 8] = [
        Reg8::A,
        Reg8::B,
        Reg8::C,
        Reg8::D,
        Reg8::E,
        Reg8::F,
        Reg8::H,
        Reg8::L,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter register name.
    pub fn name(self) -> &'static str {
        match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::F => "F",
            Reg8::H => "H",
            Reg8::L => "L",
        }
    }
}

/// 16-bit register identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg16 {
    /// Program counter
    Pc,
    /// Stack pointer
    Sp,
}

/// Flags held in the upper nibble of F.
///
/// The discriminant is the bit position inside F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Zero = 7,
    Subtract = 6,
    HalfCarry = 5,
    Carry = 4,
}

impl Flag {
    /// Bit mask of this flag inside F.
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Carry, half-carry and zero reported by an arithmetic or logic primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AluOutcome {
    /// Carry out of bit 7 (bit 15 for 16-bit adds), or borrow for subtraction
    pub carry: bool,
    /// Carry out of bit 3 (bit 11 for 16-bit adds), or borrow from bit 4
    pub half_carry: bool,
    /// Truncated result equals zero
    pub zero: bool,
}

/// Carry-relevant bit and zero test reported by a rotate, shift or swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftOutcome {
    /// Bit shifted out of the value (always false for SWAP)
    pub carry: bool,
    /// Result equals zero
    pub zero: bool,
}

/// Operand of a register arithmetic helper: another register or a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Reg(Reg8),
    Imm(u8),
}

impl From<Reg8> for Source {
    fn from(reg: Reg8) -> Self {
        Source::Reg(reg)
    }
}

impl From<u8> for Source {
    fn from(value: u8) -> Self {
        Source::Imm(value)
    }
}

/// Rotate, shift and swap operations of the extended instruction space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    /// Rotate left circular
    Rlc,
    /// Rotate right circular
    Rrc,
    /// Rotate left through carry
    Rl,
    /// Rotate right through carry
    Rr,
    /// Shift left arithmetic
    Sla,
    /// Shift right arithmetic (bit 7 preserved)
    Sra,
    /// Swap nibbles
    Swap,
    /// Shift right logical
    Srl,
}

impl ShiftOp {
    /// Applies the operation to `value`; `carry_in` only matters for RL/RR.
    pub fn apply(self, value: u8, carry_in: bool) -> (u8, ShiftOutcome) {
        let cin = carry_in as u8;
        let (result, carry) = match self {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | cin, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (cin << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        (
            result,
            ShiftOutcome {
                carry,
                zero: result == 0,
            },
        )
    }
}

/// Adds `b` and the carry-in to `a` in a single pass.
///
/// Carry and half-carry are computed over the combined three-input sum.
///
/// # Examples
///
/// ```
/// use libsm83::registers::add_bytes;
///
/// let (result, outcome) = add_bytes(0x0F, 0x01, false);
/// assert_eq!(result, 0x10);
/// assert!(outcome.half_carry);
/// assert!(!outcome.carry);
/// ```
pub fn add_bytes(a: u8, b: u8, carry_in: bool) -> (u8, AluOutcome) {
    let cin = carry_in as u16;
    let sum = a as u16 + b as u16 + cin;
    let result = sum as u8;
    (
        result,
        AluOutcome {
            carry: sum > 0xFF,
            half_carry: (a as u16 & 0x0F) + (b as u16 & 0x0F) + cin > 0x0F,
            zero: result == 0,
        },
    )
}

/// Subtracts `b` and the carry-in (borrow) from `a` in a single pass.
pub fn sub_bytes(a: u8, b: u8, carry_in: bool) -> (u8, AluOutcome) {
    let cin = carry_in as u16;
    let result = (a as u16).wrapping_sub(b as u16).wrapping_sub(cin) as u8;
    (
        result,
        AluOutcome {
            carry: (a as u16) < b as u16 + cin,
            half_carry: (a as u16 & 0x0F) < (b as u16 & 0x0F) + cin,
            zero: result == 0,
        },
    )
}

/// 16-bit add as performed by `ADD HL,rr`.
///
/// Half-carry is the carry out of bit 11, carry the carry out of bit 15.
pub fn add_words(a: u16, b: u16) -> (u16, AluOutcome) {
    let result = a.wrapping_add(b);
    (
        result,
        AluOutcome {
            carry: a as u32 + b as u32 > 0xFFFF,
            half_carry: (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF,
            zero: result == 0,
        },
    )
}

/// Adds a signed 8-bit offset to a 16-bit value (`ADD SP,e8`, `LD HL,SP+e8`).
///
/// The offset is sign-extended for the result while H and C come from the
/// unsigned addition of the low byte, which is how the hardware sets them.
pub fn add_signed_offset(base: u16, offset: u8) -> (u16, AluOutcome) {
    let result = base.wrapping_add(offset as i8 as i16 as u16);
    (
        result,
        AluOutcome {
            carry: (base & 0x00FF) + offset as u16 > 0x00FF,
            half_carry: (base & 0x000F) + (offset as u16 & 0x0F) > 0x0F,
            zero: result == 0,
        },
    )
}

/// SM83 register file.
///
/// Besides the architectural registers it carries the processor control
/// latches the instruction set manipulates: the interrupt master enable,
/// the delayed-enable countdown armed by `EI`, and the HALT/STOP states.
///
/// # Examples
///
/// ```
/// use libsm83::{Flag, Reg16, Reg8, Registers};
///
/// let mut regs = Registers::new();
/// regs.split_into(0x1234, Reg8::H, Reg8::L);
/// assert_eq!(regs.get8(Reg8::H), 0x12);
/// assert_eq!(regs.combine(Reg8::H, Reg8::L).value(), 0x1234);
///
/// regs.set16(Reg16::Pc, 0xFFFF);
/// assert_eq!(regs.word(Reg16::Pc).inc().value(), 0x0000);
///
/// let outcome = regs.add8(Reg8::A, 0xFFu8, true);
/// assert!(outcome.carry);
/// regs.set_flag(Flag::Carry, outcome.carry);
/// assert!(regs.flag(Flag::Carry));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registers {
    r8: [u8; 8],
    pc: u16,
    sp: u16,
    ime: bool,
    ei_delay: u8,
    halted: bool,
    stopped: bool,
}

impl Registers {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Direct Access ==========

    pub fn get8(&self, reg: Reg8) -> u8 {
        self.r8[reg.index()]
    }

    pub fn set8(&mut self, reg: Reg8, value: u8) {
        self.r8[reg.index()] = value;
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::Pc => self.pc,
            Reg16::Sp => self.sp,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        *self.word_slot(reg) = value;
    }

    fn word_slot(&mut self, reg: Reg16) -> &mut u16 {
        match reg {
            Reg16::Pc => &mut self.pc,
            Reg16::Sp => &mut self.sp,
        }
    }

    /// Returns a chainable view over PC or SP.
    pub fn word(&mut self, reg: Reg16) -> WordView<'_> {
        WordView {
            slot: self.word_slot(reg),
        }
    }

    /// Returns the high and low bytes of PC or SP.
    pub fn split16(&self, reg: Reg16) -> (u8, u8) {
        let [high, low] = self.get16(reg).to_be_bytes();
        (high, low)
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    // ========== Register Pairs ==========

    /// Returns a chainable 16-bit view over `high` × 256 + `low`.
    pub fn combine(&mut self, high: Reg8, low: Reg8) -> PairView<'_> {
        PairView {
            regs: self,
            high,
            low,
        }
    }

    /// Reads `high` × 256 + `low` without borrowing mutably.
    pub fn pair(&self, high: Reg8, low: Reg8) -> u16 {
        u16::from_be_bytes([self.get8(high), self.get8(low)])
    }

    /// Writes a 16-bit value into a register pair as two 8-bit writes.
    pub fn split_into(&mut self, value: u16, high: Reg8, low: Reg8) {
        let [h, l] = value.to_be_bytes();
        self.set8(high, h);
        self.set8(low, l);
    }

    pub fn af(&self) -> u16 {
        self.pair(Reg8::A, Reg8::F)
    }

    pub fn bc(&self) -> u16 {
        self.pair(Reg8::B, Reg8::C)
    }

    pub fn de(&self) -> u16 {
        self.pair(Reg8::D, Reg8::E)
    }

    pub fn hl(&self) -> u16 {
        self.pair(Reg8::H, Reg8::L)
    }

    pub fn set_hl(&mut self, value: u16) {
        self.split_into(value, Reg8::H, Reg8::L);
    }

    // ========== Flags ==========

    pub fn flag(&self, flag: Flag) -> bool {
        self.get8(Reg8::F) & flag.mask() != 0
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let f = self.get8(Reg8::F);
        let f = if value { f | flag.mask() } else { f & !flag.mask() };
        self.set8(Reg8::F, f);
    }

    /// Applies several flag updates with a single write to F.
    pub fn set_flags(&mut self, updates: &[(Flag, bool)]) {
        let mut f = self.get8(Reg8::F);
        for &(flag, value) in updates {
            if value {
                f |= flag.mask();
            } else {
                f &= !flag.mask();
            }
        }
        self.set8(Reg8::F, f);
    }

    /// Writes all four flags from an arithmetic outcome.
    pub(crate) fn apply_alu(&mut self, outcome: AluOutcome, subtract: bool) {
        self.set_flags(&[
            (Flag::Zero, outcome.zero),
            (Flag::Subtract, subtract),
            (Flag::HalfCarry, outcome.half_carry),
            (Flag::Carry, outcome.carry),
        ]);
    }

    /// Writes all four flags from a rotate/shift outcome (N and H cleared).
    pub(crate) fn apply_shift(&mut self, outcome: ShiftOutcome) {
        self.set_flags(&[
            (Flag::Zero, outcome.zero),
            (Flag::Subtract, false),
            (Flag::HalfCarry, false),
            (Flag::Carry, outcome.carry),
        ]);
    }

    // ========== Arithmetic Helpers ==========

    fn resolve(&self, source: Source) -> u8 {
        match source {
            Source::Reg(reg) => self.get8(reg),
            Source::Imm(value) => value,
        }
    }

    /// `reg += source (+ carry_in)`.
    pub fn add8(&mut self, reg: Reg8, source: impl Into<Source>, carry_in: bool) -> AluOutcome {
        let operand = self.resolve(source.into());
        let (result, outcome) = add_bytes(self.get8(reg), operand, carry_in);
        self.set8(reg, result);
        outcome
    }

    /// `reg -= source (+ carry_in)`.
    pub fn sub8(&mut self, reg: Reg8, source: impl Into<Source>, carry_in: bool) -> AluOutcome {
        let operand = self.resolve(source.into());
        let (result, outcome) = sub_bytes(self.get8(reg), operand, carry_in);
        self.set8(reg, result);
        outcome
    }

    /// `reg &= source`. Half-carry is reported set, as the hardware does.
    pub fn and8(&mut self, reg: Reg8, source: impl Into<Source>) -> AluOutcome {
        let result = self.get8(reg) & self.resolve(source.into());
        self.set8(reg, result);
        AluOutcome {
            carry: false,
            half_carry: true,
            zero: result == 0,
        }
    }

    /// `reg |= source`.
    pub fn or8(&mut self, reg: Reg8, source: impl Into<Source>) -> AluOutcome {
        let result = self.get8(reg) | self.resolve(source.into());
        self.set8(reg, result);
        AluOutcome {
            zero: result == 0,
            ..AluOutcome::default()
        }
    }

    /// `reg ^= source`.
    pub fn xor8(&mut self, reg: Reg8, source: impl Into<Source>) -> AluOutcome {
        let result = self.get8(reg) ^ self.resolve(source.into());
        self.set8(reg, result);
        AluOutcome {
            zero: result == 0,
            ..AluOutcome::default()
        }
    }

    /// Subtraction outcome of `reg - source` without storing the result.
    pub fn compare8(&self, reg: Reg8, source: impl Into<Source>) -> AluOutcome {
        sub_bytes(self.get8(reg), self.resolve(source.into()), false).1
    }

    // ========== Bit Helpers ==========

    pub fn test_bit(&self, reg: Reg8, bit: u8) -> bool {
        self.get8(reg) & (1 << (bit & 7)) != 0
    }

    pub fn set_bit(&mut self, reg: Reg8, bit: u8) {
        let value = self.get8(reg) | (1 << (bit & 7));
        self.set8(reg, value);
    }

    pub fn clear_bit(&mut self, reg: Reg8, bit: u8) {
        let value = self.get8(reg) & !(1 << (bit & 7));
        self.set8(reg, value);
    }

    /// Applies a rotate/shift/swap to `reg`, feeding the current Carry flag.
    pub fn shift(&mut self, reg: Reg8, op: ShiftOp) -> ShiftOutcome {
        let (result, outcome) = op.apply(self.get8(reg), self.flag(Flag::Carry));
        self.set8(reg, result);
        outcome
    }

    pub fn rotate_left_circular(&mut self, reg: Reg8) -> ShiftOutcome {
        self.shift(reg, ShiftOp::Rlc)
    }

    pub fn rotate_right_circular(&mut self, reg: Reg8) -> ShiftOutcome {
        self.shift(reg, ShiftOp::Rrc)
    }

    pub fn shift_left(&mut self, reg: Reg8) -> ShiftOutcome {
        self.shift(reg, ShiftOp::Sla)
    }

    pub fn shift_right_logical(&mut self, reg: Reg8) -> ShiftOutcome {
        self.shift(reg, ShiftOp::Srl)
    }

    pub fn swap_nibbles(&mut self, reg: Reg8) -> ShiftOutcome {
        self.shift(reg, ShiftOp::Swap)
    }

    // ========== Control Latches ==========

    /// Interrupt master enable.
    pub fn ime(&self) -> bool {
        self.ime
    }

    pub fn set_ime(&mut self, enabled: bool) {
        self.ime = enabled;
        if !enabled {
            self.ei_delay = 0;
        }
    }

    /// Arms IME to turn on after the instruction following `EI`.
    pub(crate) fn schedule_ime(&mut self) {
        self.ei_delay = 2;
    }

    /// Advances the `EI` countdown; called once per instruction boundary.
    pub(crate) fn tick_ime_delay(&mut self) {
        if self.ei_delay > 0 {
            self.ei_delay -= 1;
            if self.ei_delay == 0 {
                self.ime = true;
            }
        }
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }
}

/// Chainable view over PC or SP.
///
/// Every mutator wraps modulo 2^16 and returns the view, so
/// `regs.word(Reg16::Sp).dec().value()` reads the decremented value.
pub struct WordView<'a> {
    slot: &'a mut u16,
}

impl<'a> WordView<'a> {
    pub fn value(&self) -> u16 {
        *self.slot
    }

    pub fn set(self, value: u16) -> Self {
        *self.slot = value;
        self
    }

    pub fn inc(self) -> Self {
        self.add(1)
    }

    pub fn dec(self) -> Self {
        self.sub(1)
    }

    pub fn add(self, delta: u16) -> Self {
        *self.slot = self.slot.wrapping_add(delta);
        self
    }

    pub fn sub(self, delta: u16) -> Self {
        *self.slot = self.slot.wrapping_sub(delta);
        self
    }
}

/// Chainable 16-bit view over two 8-bit registers.
///
/// Writes are decomposed back into the backing registers.
pub struct PairView<'a> {
    regs: &'a mut Registers,
    high: Reg8,
    low: Reg8,
}

impl<'a> PairView<'a> {
    pub fn value(&self) -> u16 {
        self.regs.pair(self.high, self.low)
    }

    pub fn set(self, value: u16) -> Self {
        self.regs.split_into(value, self.high, self.low);
        self
    }

    pub fn inc(self) -> Self {
        self.add(1)
    }

    pub fn dec(self) -> Self {
        self.sub(1)
    }

    pub fn add(self, delta: u16) -> Self {
        let value = self.value().wrapping_add(delta);
        self.set(value)
    }

    pub fn sub(self, delta: u16) -> Self {
        let value = self.value().wrapping_sub(delta);
        self.set(value)
    }
}
