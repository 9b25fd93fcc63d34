use crate::asm::error::{EncodingViolation, RegisterRole};
use std::fmt;

/// Hardware code 31, read as either the zero register or the stack pointer
/// depending on the instruction field.
const REG31: u32 = 31;

/// A general-purpose register, the zero register or the stack pointer.
///
/// Ids 0..=30 are general-purpose. The zero register and the stack pointer
/// share hardware code 31 and are kept apart as ids 32 and 33, so every
/// instruction field has to pick the accessor matching its semantics.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Register(u8);

impl Register {
    pub const ZERO_ID: u8 = 32;
    pub const SP_ID: u8 = 33;

    pub fn new(id: u8) -> Result<Self, EncodingViolation> {
        match id {
            0..=30 | Self::ZERO_ID | Self::SP_ID => Ok(Self(id)),
            _ => Err(EncodingViolation::InvalidRegisterId(id)),
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_gpr(self) -> bool {
        self.0 <= 30
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == Self::ZERO_ID
    }

    #[must_use]
    pub const fn is_sp(self) -> bool {
        self.0 == Self::SP_ID
    }

    pub fn encoding(self) -> Result<u32, EncodingViolation> {
        if self.is_gpr() {
            Ok(u32::from(self.0))
        } else {
            Err(self.violates(RegisterRole::General))
        }
    }

    pub fn encoding_zero(self) -> Result<u32, EncodingViolation> {
        if self.is_zero() {
            Ok(REG31)
        } else if self.is_gpr() {
            Ok(u32::from(self.0))
        } else {
            Err(self.violates(RegisterRole::GeneralOrZero))
        }
    }

    pub fn encoding_sp(self) -> Result<u32, EncodingViolation> {
        if self.is_sp() {
            Ok(REG31)
        } else if self.is_gpr() {
            Ok(u32::from(self.0))
        } else {
            Err(self.violates(RegisterRole::GeneralOrSp))
        }
    }

    pub fn encoding_zero_or_sp(self) -> Result<u32, EncodingViolation> {
        if self.is_zero() || self.is_sp() {
            Ok(REG31)
        } else {
            Err(self.violates(RegisterRole::ZeroOrSp))
        }
    }

    fn violates(self, role: RegisterRole) -> EncodingViolation {
        EncodingViolation::InvalidRegisterRole { reg: self, role }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Self::ZERO_ID => f.write_str("zr"),
            Self::SP_ID => f.write_str("sp"),
            id => write!(f, "r{id}"),
        }
    }
}

/// A floating-point/SIMD register. All 32 codes are plain registers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NeonRegister(u8);

impl NeonRegister {
    pub fn new(id: u8) -> Result<Self, EncodingViolation> {
        if id < 32 {
            Ok(Self(id))
        } else {
            Err(EncodingViolation::InvalidRegisterId(id))
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn encoding(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for NeonRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

macro_rules! registers {
    ($ty:ident: $($name:ident = $id:expr),+ $(,)?) => {
        $(pub const $name: $ty = $ty($id);)+
    };
}

registers! { Register:
    R0 = 0, R1 = 1, R2 = 2, R3 = 3, R4 = 4, R5 = 5, R6 = 6, R7 = 7,
    R8 = 8, R9 = 9, R10 = 10, R11 = 11, R12 = 12, R13 = 13, R14 = 14, R15 = 15,
    R16 = 16, R17 = 17, R18 = 18, R19 = 19, R20 = 20, R21 = 21, R22 = 22, R23 = 23,
    R24 = 24, R25 = 25, R26 = 26, R27 = 27, R28 = 28, R29 = 29, R30 = 30,
    REG_ZERO = Register::ZERO_ID,
    REG_SP = Register::SP_ID,
}

pub const REG_FP: Register = R29;
pub const REG_LR: Register = R30;

registers! { NeonRegister:
    F0 = 0, F1 = 1, F2 = 2, F3 = 3, F4 = 4, F5 = 5, F6 = 6, F7 = 7,
    F8 = 8, F9 = 9, F10 = 10, F11 = 11, F12 = 12, F13 = 13, F14 = 14, F15 = 15,
    F16 = 16, F17 = 17, F18 = 18, F19 = 19, F20 = 20, F21 = 21, F22 = 22, F23 = 23,
    F24 = 24, F25 = 25, F26 = 26, F27 = 27, F28 = 28, F29 = 29, F30 = 30, F31 = 31,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accessors() {
        assert_eq!(R7.encoding(), Ok(7));
        assert_eq!(R7.encoding_zero(), Ok(7));
        assert_eq!(R7.encoding_sp(), Ok(7));
        assert!(R7.encoding_zero_or_sp().is_err());

        assert_eq!(REG_ZERO.encoding_zero(), Ok(31));
        assert_eq!(REG_ZERO.encoding_zero_or_sp(), Ok(31));
        assert_eq!(REG_SP.encoding_sp(), Ok(31));
        assert_eq!(REG_SP.encoding_zero_or_sp(), Ok(31));
    }

    #[test]
    fn reg31_aliases_are_not_interchangeable() {
        assert_eq!(
            REG_ZERO.encoding(),
            Err(EncodingViolation::InvalidRegisterRole {
                reg: REG_ZERO,
                role: RegisterRole::General
            })
        );
        assert!(REG_ZERO.encoding_sp().is_err());
        assert!(REG_SP.encoding_zero().is_err());
        assert!(REG_SP.encoding().is_err());
    }

    #[test]
    fn constructors() {
        assert_eq!(Register::new(30), Ok(R30));
        assert_eq!(Register::new(32), Ok(REG_ZERO));
        assert_eq!(
            Register::new(31),
            Err(EncodingViolation::InvalidRegisterId(31))
        );
        assert_eq!(
            Register::new(34),
            Err(EncodingViolation::InvalidRegisterId(34))
        );
        assert_eq!(NeonRegister::new(31).map(NeonRegister::encoding), Ok(31));
        assert!(NeonRegister::new(32).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(R3.to_string(), "r3");
        assert_eq!(REG_ZERO.to_string(), "zr");
        assert_eq!(REG_SP.to_string(), "sp");
        assert_eq!(F9.to_string(), "v9");
    }
}
