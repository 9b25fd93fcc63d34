use crate::asm::{Extend, Register};
use std::fmt;
use thiserror::Error;

/// Breach of an encoding contract by the code generator.
///
/// These never come from untrusted input; they abort the compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingViolation {
    #[error("{value} does not fit a {bits}-bit {} immediate", signedness(.signed))]
    ImmediateOutOfRange { bits: u32, signed: bool, value: i64 },
    #[error("{reg} cannot be used as {role}")]
    InvalidRegisterRole { reg: Register, role: RegisterRole },
    #[error("{0} is not a register id")]
    InvalidRegisterId(u8),
    #[error("invalid {what}: {value}")]
    InvalidOperand { what: &'static str, value: i64 },
    #[error("{0:?} is not a load/store addressing extend")]
    ExtendNotAddressable(Extend),
    #[error("label does not belong to this assembler")]
    UnknownLabel,
    #[error("label is already bound")]
    LabelAlreadyBound,
    #[error("{0} forward jumps still reference unbound labels")]
    UnresolvedJumps(usize),
}

/// Register kinds an instruction field accepts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RegisterRole {
    General,
    GeneralOrZero,
    GeneralOrSp,
    ZeroOrSp,
}

impl fmt::Display for RegisterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::General => "a general-purpose register",
            Self::GeneralOrZero => "a general-purpose or zero register",
            Self::GeneralOrSp => "a general-purpose register or the stack pointer",
            Self::ZeroOrSp => "the zero register or the stack pointer",
        })
    }
}

fn signedness(signed: &bool) -> &'static str {
    if *signed {
        "signed"
    } else {
        "unsigned"
    }
}
