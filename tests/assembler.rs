mod utils;

use boots_asm::asm::{
    encode, Assembler, AtomicOrder, Cond, EncodingViolation, Extend, FloatWidth, Register,
    RegisterRole, Shift, Width, F0, R0, R1, R10, R2, R3, REG_SP, REG_ZERO,
};
use boots_asm::Error;
use utils::words;

#[test]
fn known_vectors() {
    let mut asm = Assembler::new();
    asm.ret().unwrap();
    asm.ret_reg(R0).unwrap();
    asm.ret_reg(R10).unwrap();
    asm.br(Register::new(16).unwrap()).unwrap();
    asm.cmp(Width::X64, R0, R1).unwrap();
    asm.neg(Width::X64, R0, R1).unwrap();
    asm.add_ext(Width::X64, R0, REG_SP, R1, Extend::UXTX, 0).unwrap();
    asm.ldaddal(Width::X64, R1, R2, R3).unwrap();
    asm.swpal(Width::X64, R1, R2, R3).unwrap();
    asm.sxtw(R0, R1).unwrap();
    asm.uxtb(R0, R1).unwrap();
    asm.ldr_reg(Width::X64, R0, R1, R2, Extend::UXTX, false).unwrap();
    asm.ldr_freg(FloatWidth::F64, F0, R1, R2, Extend::UXTX, true).unwrap();
    asm.str_reg(Width::W32, R0, R1, R2, Extend::UXTB, false).unwrap_err();
    assert_eq!(
        words(&asm.finalize().unwrap()),
        [
            0xd65f_03c0,
            0xd65f_0000,
            0xd65f_0140,
            0xd61f_0200,
            0xeb01_001f,
            0xcb01_03e0,
            0x8b21_63e0,
            0xf8e1_0062,
            0xf8e1_8062,
            0x9340_7c20,
            0x5300_1c20,
            0xf862_6820,
            0xfc62_7820,
            // padding
            0xd65f_03c0,
            0xd65f_03c0,
            0xd65f_03c0,
        ]
    );
}

#[test]
fn condition_inversion_is_an_involution_without_fixed_points() {
    for cond in Cond::ALL {
        assert_eq!(cond.invert().invert(), cond);
        assert_ne!(cond.invert(), cond);
    }
}

#[test]
fn branch_immediate_range() {
    assert!(encode::cls_cond_branch_imm(0, (1 << 18) - 1, 0, Cond::EQ).is_ok());
    assert!(encode::cls_cond_branch_imm(0, -(1 << 18), 0, Cond::EQ).is_ok());
    assert_eq!(
        encode::cls_cond_branch_imm(0, 1 << 18, 0, Cond::EQ),
        Err(EncodingViolation::ImmediateOutOfRange {
            bits: 19,
            signed: true,
            value: 1 << 18
        })
    );
}

#[test]
fn zero_register_in_general_purpose_field() {
    assert_eq!(
        encode::cls_uncond_branch_reg(0b0010, 0b11111, 0, REG_ZERO, 0),
        Err(EncodingViolation::InvalidRegisterRole {
            reg: REG_ZERO,
            role: RegisterRole::General
        })
    );
}

/// Emits a loop header, a conditional exit and a back edge, binding `exit`
/// either before or after the branches that reference it.
fn branchy(bind_exit_first: bool) -> Vec<u32> {
    let mut asm = Assembler::new();
    let exit = asm.create_label();
    let top = asm.create_label();
    if bind_exit_first {
        asm.bind_label(exit).unwrap();
        asm.ret().unwrap();
    } else {
        asm.b(top).unwrap();
    }
    asm.bind_label(top).unwrap();
    asm.cmp(Width::W32, R0, R1).unwrap();
    asm.bc(Cond::GE, exit).unwrap();
    asm.cbz(Width::X64, R2, exit).unwrap();
    asm.add_sh(Width::X64, R0, R0, R3, Shift::LSL, 2).unwrap();
    asm.b(top).unwrap();
    if !bind_exit_first {
        asm.bind_label(exit).unwrap();
        asm.ret().unwrap();
    }
    words(&asm.finalize().unwrap())
}

#[test]
fn branches_are_patched() {
    assert_eq!(
        branchy(false),
        [
            0x1400_0001, // b top
            0x6b01_001f, // cmp w0, w1
            0x5400_008a, // b.ge exit
            0xb400_0062, // cbz x2, exit
            0x8b03_0800, // add x0, x0, x3, lsl #2
            0x17ff_fffc, // b top
            0xd65f_03c0, // exit: ret
            0xd65f_03c0,
        ]
    );
    assert_eq!(
        branchy(true),
        [
            0xd65f_03c0, // exit: ret
            0x6b01_001f,
            0x54ff_ffca, // b.ge exit
            0xb4ff_ffa2, // cbz x2, exit
            0x8b03_0800,
            0x17ff_fffc,
            0xd65f_03c0,
            0xd65f_03c0,
        ]
    );
}

#[test]
fn binding_before_or_after_gives_identical_code() {
    let forward = {
        let mut asm = Assembler::new();
        let label = asm.create_label();
        asm.bc(Cond::LO, label).unwrap();
        asm.cbnz(Width::W32, R1, label).unwrap();
        asm.bind_label(label).unwrap();
        asm.finalize().unwrap()
    };
    let backward = {
        let mut asm = Assembler::new();
        let label = asm.create_label();
        asm.bind_label(label).unwrap();
        asm.bc(Cond::LO, label).unwrap();
        asm.cbnz(Width::W32, R1, label).unwrap();
        asm.finalize().unwrap()
    };
    let forward = words(&forward);
    let backward = words(&backward);
    assert_eq!(
        forward,
        [0x5400_0043, 0x3500_0021, 0xd65f_03c0, 0xd65f_03c0]
    );
    assert_eq!(
        backward,
        [0x5400_0003, 0x35ff_ffe1, 0xd65f_03c0, 0xd65f_03c0]
    );

    // a patched placeholder matches the direct encoding of the same distance
    assert_eq!(
        Ok(forward[0]),
        encode::cls_cond_branch_imm(0, 2, 0, Cond::LO)
    );
    assert_eq!(Ok(forward[1]), encode::cls_cmp_branch_imm(false, 1, R1, 1));
    assert_eq!(
        Ok(backward[1]),
        encode::cls_cmp_branch_imm(false, 1, R1, -1)
    );
}

#[test]
fn finalized_length_is_a_multiple_of_sixteen() {
    for count in 0..=9 {
        let mut asm = Assembler::new();
        for _ in 0..count {
            asm.ldadd(Width::W32, AtomicOrder::Relaxed, R0, R1, REG_SP).unwrap();
        }
        let code = asm.finalize().unwrap();
        assert!(!code.is_empty());
        assert_eq!(code.len() % 16, 0);
        assert!(code.len() >= count * 4);
    }
}

#[test]
fn label_misuse() {
    let mut other = Assembler::new();
    other.create_label();
    let foreign = other.create_label();

    let mut asm = Assembler::new();
    assert_eq!(asm.b(foreign), Err(EncodingViolation::UnknownLabel));
    assert_eq!(asm.is_bound(foreign), Err(EncodingViolation::UnknownLabel));

    let label = asm.create_label();
    asm.cbnz(Width::X64, R0, label).unwrap();
    let err: Error = asm.finalize().unwrap_err().into();
    assert_eq!(
        err.to_string(),
        "1 forward jumps still reference unbound labels"
    );
}

#[test]
fn failed_bind_leaves_branches_pending() {
    let mut asm = Assembler::new();
    let far = asm.create_label();
    asm.bc(Cond::EQ, far).unwrap();
    for _ in 0..1 << 18 {
        asm.add(Width::X64, R0, R0, R1).unwrap();
    }

    assert_eq!(
        asm.bind_label(far),
        Err(EncodingViolation::ImmediateOutOfRange {
            bits: 19,
            signed: true,
            value: (1 << 18) + 1
        })
    );
    assert_eq!(asm.is_bound(far), Ok(false));
    assert_eq!(words(&asm.code()[..4]), [0x5400_0000]);
    assert_eq!(asm.finalize(), Err(EncodingViolation::UnresolvedJumps(1)));
}
