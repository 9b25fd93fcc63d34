use crate::asm::error::EncodingViolation;

/// Condition codes, in hardware encoding order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Cond {
    EQ,
    NE,
    /// Carry set, unsigned higher or same.
    HS,
    /// Carry clear, unsigned lower.
    LO,
    MI,
    PL,
    VS,
    VC,
    HI,
    LS,
    GE,
    LT,
    GT,
    LE,
    AL,
    NV,
}

impl Cond {
    pub const ALL: [Cond; 16] = [
        Cond::EQ,
        Cond::NE,
        Cond::HS,
        Cond::LO,
        Cond::MI,
        Cond::PL,
        Cond::VS,
        Cond::VC,
        Cond::HI,
        Cond::LS,
        Cond::GE,
        Cond::LT,
        Cond::GT,
        Cond::LE,
        Cond::AL,
        Cond::NV,
    ];

    /// The condition that holds exactly when `self` does not.
    ///
    /// `AL` and `NV` both mean "always" to the hardware; they are still paired
    /// so that the mapping stays an involution without fixed points.
    #[must_use]
    pub fn invert(self) -> Cond {
        match self {
            Cond::EQ => Cond::NE,
            Cond::NE => Cond::EQ,
            Cond::HS => Cond::LO,
            Cond::LO => Cond::HS,
            Cond::MI => Cond::PL,
            Cond::PL => Cond::MI,
            Cond::VS => Cond::VC,
            Cond::VC => Cond::VS,
            Cond::HI => Cond::LS,
            Cond::LS => Cond::HI,
            Cond::GE => Cond::LT,
            Cond::LT => Cond::GE,
            Cond::GT => Cond::LE,
            Cond::LE => Cond::GT,
            Cond::AL => Cond::NV,
            Cond::NV => Cond::AL,
        }
    }

    #[must_use]
    pub fn encoding(self) -> u32 {
        match self {
            Cond::EQ => 0b0000,
            Cond::NE => 0b0001,
            Cond::HS => 0b0010,
            Cond::LO => 0b0011,
            Cond::MI => 0b0100,
            Cond::PL => 0b0101,
            Cond::VS => 0b0110,
            Cond::VC => 0b0111,
            Cond::HI => 0b1000,
            Cond::LS => 0b1001,
            Cond::GE => 0b1010,
            Cond::LT => 0b1011,
            Cond::GT => 0b1100,
            Cond::LE => 0b1101,
            Cond::AL => 0b1110,
            Cond::NV => 0b1111,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Shift {
    LSL,
    LSR,
    ASR,
    ROR,
}

impl Shift {
    #[must_use]
    pub fn encoding(self) -> u32 {
        match self {
            Shift::LSL => 0b00,
            Shift::LSR => 0b01,
            Shift::ASR => 0b10,
            Shift::ROR => 0b11,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Extend {
    UXTB,
    UXTH,
    UXTW,
    UXTX,
    SXTB,
    SXTH,
    SXTW,
    SXTX,
}

impl Extend {
    /// `option` field of the add/sub (extended register) class.
    #[must_use]
    pub fn encoding(self) -> u32 {
        match self {
            Extend::UXTB => 0b000,
            Extend::UXTH => 0b001,
            Extend::UXTW => 0b010,
            Extend::UXTX => 0b011,
            Extend::SXTB => 0b100,
            Extend::SXTH => 0b101,
            Extend::SXTW => 0b110,
            Extend::SXTX => 0b111,
        }
    }

    /// `option` field of register-offset loads and stores. Only word and
    /// doubleword index registers can be addressed; `UXTX` is spelled `LSL`.
    pub fn encoding_ldst(self) -> Result<u32, EncodingViolation> {
        match self {
            Extend::UXTW => Ok(0b010),
            Extend::UXTX => Ok(0b011),
            Extend::SXTW => Ok(0b110),
            Extend::SXTX => Ok(0b111),
            Extend::UXTB | Extend::UXTH | Extend::SXTB | Extend::SXTH => {
                Err(EncodingViolation::ExtendNotAddressable(self))
            }
        }
    }
}

/// Operand width of an integer instruction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Width {
    W32,
    X64,
}

impl Width {
    /// The `sf` bit.
    #[must_use]
    pub fn sf(self) -> bool {
        self == Width::X64
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Width::W32 => 32,
            Width::X64 => 64,
        }
    }
}

/// Precision of a floating-point load or store.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FloatWidth {
    F32,
    F64,
}
