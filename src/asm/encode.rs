//! Bit-level encoders, one per AArch64 instruction class.
//!
//! Every function validates its fields before packing them and has no state,
//! so each can be checked directly against reference instruction words.

use crate::asm::{
    error::EncodingViolation,
    imm::{field, flag, SignedImm},
    Cond, Extend, Register, Shift,
};

/// Unconditional branch (register): `br`, `blr`, `ret`.
pub fn cls_uncond_branch_reg(
    opc: u32,
    op2: u32,
    op3: u32,
    rn: Register,
    op4: u32,
) -> Result<u32, EncodingViolation> {
    Ok(0b1101011 << 25
        | field::<4>(opc)? << 21
        | field::<5>(op2)? << 16
        | field::<6>(op3)? << 10
        | rn.encoding()? << 5
        | field::<5>(op4)?)
}

/// Unconditional branch (immediate): `b`, `bl`. `imm26` counts instructions.
pub fn cls_uncond_branch_imm(op: u32, imm26: i32) -> Result<u32, EncodingViolation> {
    let imm26 = SignedImm::<26>::new(imm26)?;
    Ok(field::<1>(op)? << 31 | 0b00101 << 26 | imm26.bits())
}

/// Conditional branch (immediate): `b.cond`. `imm19` counts instructions.
pub fn cls_cond_branch_imm(
    o1: u32,
    imm19: i32,
    o0: u32,
    cond: Cond,
) -> Result<u32, EncodingViolation> {
    let imm19 = SignedImm::<19>::new(imm19)?;
    Ok(0b0101010 << 25
        | field::<1>(o1)? << 24
        | imm19.bits() << 5
        | field::<1>(o0)? << 4
        | cond.encoding())
}

/// Compare and branch (immediate): `cbz` (`op` 0) and `cbnz` (`op` 1).
pub fn cls_cmp_branch_imm(
    sf: bool,
    op: u32,
    rt: Register,
    imm19: i32,
) -> Result<u32, EncodingViolation> {
    let imm19 = SignedImm::<19>::new(imm19)?;
    Ok(flag(sf) << 31
        | 0b011010 << 25
        | field::<1>(op)? << 24
        | imm19.bits() << 5
        | rt.encoding_zero()?)
}

/// Add/subtract (extended register). `rn` may be the stack pointer, and so
/// may `rd` unless the instruction sets flags, in which case code 31 of `rd`
/// is the zero register.
#[allow(clippy::too_many_arguments)]
pub fn cls_addsub_extreg(
    sf: bool,
    op: u32,
    s: u32,
    opt: u32,
    rm: Register,
    option: Extend,
    imm3: u32,
    rn: Register,
    rd: Register,
) -> Result<u32, EncodingViolation> {
    if imm3 > 4 {
        return Err(EncodingViolation::InvalidOperand {
            what: "extended register shift",
            value: i64::from(imm3),
        });
    }
    let s = field::<1>(s)?;
    let rd = if s == 1 {
        rd.encoding_zero()?
    } else {
        rd.encoding_sp()?
    };
    Ok(flag(sf) << 31
        | field::<1>(op)? << 30
        | s << 29
        | 0b01011 << 24
        | field::<2>(opt)? << 22
        | 1 << 21
        | rm.encoding_zero()? << 16
        | option.encoding() << 13
        | imm3 << 10
        | rn.encoding_sp()? << 5
        | rd)
}

/// Add/subtract (shifted register). Code 31 is the zero register everywhere.
#[allow(clippy::too_many_arguments)]
pub fn cls_addsub_shreg(
    sf: bool,
    op: u32,
    s: u32,
    shift: Shift,
    rm: Register,
    imm6: u32,
    rn: Register,
    rd: Register,
) -> Result<u32, EncodingViolation> {
    if shift == Shift::ROR {
        return Err(EncodingViolation::InvalidOperand {
            what: "add/sub shift",
            value: i64::from(shift.encoding()),
        });
    }
    let imm6 = field::<6>(imm6)?;
    if !sf && imm6 >= 32 {
        return Err(EncodingViolation::InvalidOperand {
            what: "32-bit shift amount",
            value: i64::from(imm6),
        });
    }
    Ok(flag(sf) << 31
        | field::<1>(op)? << 30
        | field::<1>(s)? << 29
        | 0b01011 << 24
        | shift.encoding() << 22
        | rm.encoding_zero()? << 16
        | imm6 << 10
        | rn.encoding_zero()? << 5
        | rd.encoding_zero()?)
}

/// Atomic memory operations: `ldadd`, `ldclr`, `ldeor`, `ldset`, `swp` and
/// their acquire/release forms.
#[allow(clippy::too_many_arguments)]
pub fn cls_atomic(
    size: u32,
    v: u32,
    a: u32,
    r: u32,
    rs: Register,
    o3: u32,
    opc: u32,
    rn: Register,
    rt: Register,
) -> Result<u32, EncodingViolation> {
    Ok(field::<2>(size)? << 30
        | 0b111 << 27
        | field::<1>(v)? << 26
        | field::<1>(a)? << 23
        | field::<1>(r)? << 22
        | 1 << 21
        | rs.encoding_zero()? << 16
        | field::<1>(o3)? << 15
        | field::<3>(opc)? << 12
        | rn.encoding_sp()? << 5
        | rt.encoding_zero()?)
}

/// Bitfield moves: `sbfm` (`opc` 0), `bfm` (1), `ubfm` (2).
pub fn cls_bitfield(
    sf: bool,
    opc: u32,
    n: u32,
    immr: u32,
    imms: u32,
    rn: Register,
    rd: Register,
) -> Result<u32, EncodingViolation> {
    let opc = field::<2>(opc)?;
    if opc == 0b11 {
        return Err(EncodingViolation::InvalidOperand {
            what: "bitfield opc",
            value: i64::from(opc),
        });
    }
    let n = field::<1>(n)?;
    if n != flag(sf) {
        return Err(EncodingViolation::InvalidOperand {
            what: "bitfield N bit",
            value: i64::from(n),
        });
    }
    let immr = field::<6>(immr)?;
    let imms = field::<6>(imms)?;
    if !sf && (immr >= 32 || imms >= 32) {
        return Err(EncodingViolation::InvalidOperand {
            what: "32-bit bitfield position",
            value: i64::from(immr.max(imms)),
        });
    }
    Ok(flag(sf) << 31
        | opc << 29
        | 0b100110 << 23
        | n << 22
        | immr << 16
        | imms << 10
        | rn.encoding_zero()? << 5
        | rd.encoding_zero()?)
}

/// Load/store (register offset). `rt` is already encoded because it names a
/// general-purpose or a SIMD register depending on `v`.
#[allow(clippy::too_many_arguments)]
pub fn cls_ldst_regoffset(
    size: u32,
    v: u32,
    opc: u32,
    rm: Register,
    option: Extend,
    s: u32,
    rn: Register,
    rt: u32,
) -> Result<u32, EncodingViolation> {
    Ok(field::<2>(size)? << 30
        | 0b111 << 27
        | field::<1>(v)? << 26
        | field::<2>(opc)? << 22
        | 1 << 21
        | rm.encoding_zero()? << 16
        | option.encoding_ldst()? << 13
        | field::<1>(s)? << 12
        | 0b10 << 10
        | rn.encoding_sp()? << 5
        | field::<5>(rt)?)
}
