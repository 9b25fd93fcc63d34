use crate::asm::{
    buffer::AssemblerBuffer,
    encode::{
        cls_addsub_extreg, cls_addsub_shreg, cls_atomic, cls_bitfield, cls_cmp_branch_imm,
        cls_cond_branch_imm, cls_ldst_regoffset, cls_uncond_branch_imm, cls_uncond_branch_reg,
    },
    error::EncodingViolation,
    label::{ForwardJump, JumpKind, Label, LabelTracker},
    Cond, Extend, FloatWidth, NeonRegister, Register, Shift, Width, REG_LR, REG_ZERO,
};
use crate::common::List;

pub type AsmResult<T = ()> = Result<T, EncodingViolation>;

/// Finalized code is padded to a multiple of this many bytes.
pub const CODE_ALIGNMENT: usize = 16;

const INSTRUCTION_SIZE: usize = 4;

/// Memory ordering of an atomic read-modify-write.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AtomicOrder {
    Relaxed,
    Acquire,
    Release,
    AcqRel,
}

impl AtomicOrder {
    fn bits(self) -> (u32, u32) {
        match self {
            AtomicOrder::Relaxed => (0, 0),
            AtomicOrder::Acquire => (1, 0),
            AtomicOrder::Release => (0, 1),
            AtomicOrder::AcqRel => (1, 1),
        }
    }
}

/// AArch64 assembler for one function.
///
/// Every instruction is four bytes. Branches to unbound labels emit a
/// placeholder that is patched as soon as the label is bound.
#[derive(Debug, Default)]
pub struct Assembler {
    buffer: AssemblerBuffer,
    labels: LabelTracker,
}

impl Assembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset the next instruction will be emitted at.
    #[must_use]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn code(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn create_label(&mut self) -> Label {
        self.labels.create_label()
    }

    pub fn is_bound(&self, label: Label) -> AsmResult<bool> {
        Ok(self.labels.offset(label)?.is_some())
    }

    /// Binds `label` to the current position and patches every branch
    /// already emitted against it.
    ///
    /// Nothing changes if any of those branches cannot reach the label; the
    /// label stays unbound and its branches stay pending.
    pub fn bind_label(&mut self, label: Label) -> AsmResult {
        let target = self.position();
        let patches = self
            .labels
            .pending(label)
            .iter()
            .map(|jump| {
                encode_jump(jump.kind, distance(jump.at, target)).map(|word| (jump.at, word))
            })
            .collect::<AsmResult<List<_>>>()?;
        self.labels.bind(label, target)?;
        tracing::trace!(?label, target, fixups = patches.len(), "bind label");
        for (at, word) in patches {
            self.buffer.patch_u32(at, word);
        }
        Ok(())
    }

    /// Pads the code with `ret` to a non-empty multiple of [`CODE_ALIGNMENT`]
    /// bytes and returns it.
    pub fn finalize(mut self) -> AsmResult<Box<[u8]>> {
        let unresolved = self.labels.unresolved();
        if unresolved > 0 {
            return Err(EncodingViolation::UnresolvedJumps(unresolved));
        }
        let code_size = self.buffer.len();
        while self.buffer.is_empty() || self.buffer.len() % CODE_ALIGNMENT != 0 {
            self.ret()?;
        }
        tracing::debug!(code_size, size = self.buffer.len(), "finalized machine code");
        Ok(self.buffer.into_bytes())
    }

    fn emit(&mut self, word: u32) -> usize {
        let offset = self.buffer.emit_u32(word);
        tracing::trace!("{offset:06x}: {word:08x}");
        offset
    }

    fn jump_to(&mut self, label: Label, kind: JumpKind) -> AsmResult {
        let at = self.position();
        match self.labels.offset(label)? {
            Some(target) => {
                let word = encode_jump(kind, distance(at, target))?;
                self.emit(word);
            }
            None => {
                // validates the non-offset operands before anything is recorded
                let placeholder = encode_jump(kind, 0)?;
                self.labels.record(ForwardJump { at, label, kind })?;
                self.emit(placeholder);
            }
        }
        Ok(())
    }

    // ---- Branches ----

    pub fn ret(&mut self) -> AsmResult {
        self.ret_reg(REG_LR)
    }

    pub fn ret_reg(&mut self, rn: Register) -> AsmResult {
        let word = cls_uncond_branch_reg(0b0010, 0b11111, 0, rn, 0)?;
        self.emit(word);
        Ok(())
    }

    pub fn br(&mut self, rn: Register) -> AsmResult {
        let word = cls_uncond_branch_reg(0b0000, 0b11111, 0, rn, 0)?;
        self.emit(word);
        Ok(())
    }

    pub fn blr(&mut self, rn: Register) -> AsmResult {
        let word = cls_uncond_branch_reg(0b0001, 0b11111, 0, rn, 0)?;
        self.emit(word);
        Ok(())
    }

    pub fn b(&mut self, label: Label) -> AsmResult {
        self.jump_to(label, JumpKind::Unconditional)
    }

    pub fn bc(&mut self, cond: Cond, label: Label) -> AsmResult {
        self.jump_to(label, JumpKind::Conditional(cond))
    }

    pub fn cbz(&mut self, width: Width, rt: Register, label: Label) -> AsmResult {
        self.jump_to(label, JumpKind::Zero { sf: width.sf(), rt })
    }

    pub fn cbnz(&mut self, width: Width, rt: Register, label: Label) -> AsmResult {
        self.jump_to(label, JumpKind::NonZero { sf: width.sf(), rt })
    }

    // ---- Add/subtract (shifted register) ----

    pub fn add(&mut self, width: Width, rd: Register, rn: Register, rm: Register) -> AsmResult {
        self.add_sh(width, rd, rn, rm, Shift::LSL, 0)
    }

    pub fn adds(&mut self, width: Width, rd: Register, rn: Register, rm: Register) -> AsmResult {
        self.addsub_sh(width, 0, 1, rd, rn, rm, Shift::LSL, 0)
    }

    pub fn sub(&mut self, width: Width, rd: Register, rn: Register, rm: Register) -> AsmResult {
        self.sub_sh(width, rd, rn, rm, Shift::LSL, 0)
    }

    pub fn subs(&mut self, width: Width, rd: Register, rn: Register, rm: Register) -> AsmResult {
        self.addsub_sh(width, 1, 1, rd, rn, rm, Shift::LSL, 0)
    }

    pub fn add_sh(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        rm: Register,
        shift: Shift,
        amount: u32,
    ) -> AsmResult {
        self.addsub_sh(width, 0, 0, rd, rn, rm, shift, amount)
    }

    pub fn sub_sh(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        rm: Register,
        shift: Shift,
        amount: u32,
    ) -> AsmResult {
        self.addsub_sh(width, 1, 0, rd, rn, rm, shift, amount)
    }

    pub fn cmp(&mut self, width: Width, rn: Register, rm: Register) -> AsmResult {
        self.subs(width, REG_ZERO, rn, rm)
    }

    pub fn cmn(&mut self, width: Width, rn: Register, rm: Register) -> AsmResult {
        self.adds(width, REG_ZERO, rn, rm)
    }

    pub fn neg(&mut self, width: Width, rd: Register, rm: Register) -> AsmResult {
        self.sub(width, rd, REG_ZERO, rm)
    }

    #[allow(clippy::too_many_arguments)]
    fn addsub_sh(
        &mut self,
        width: Width,
        op: u32,
        s: u32,
        rd: Register,
        rn: Register,
        rm: Register,
        shift: Shift,
        amount: u32,
    ) -> AsmResult {
        let word = cls_addsub_shreg(width.sf(), op, s, shift, rm, amount, rn, rd)?;
        self.emit(word);
        Ok(())
    }

    // ---- Add/subtract (extended register) ----

    pub fn add_ext(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        rm: Register,
        extend: Extend,
        amount: u32,
    ) -> AsmResult {
        let word = cls_addsub_extreg(width.sf(), 0, 0, 0, rm, extend, amount, rn, rd)?;
        self.emit(word);
        Ok(())
    }

    pub fn sub_ext(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        rm: Register,
        extend: Extend,
        amount: u32,
    ) -> AsmResult {
        let word = cls_addsub_extreg(width.sf(), 1, 0, 0, rm, extend, amount, rn, rd)?;
        self.emit(word);
        Ok(())
    }

    pub fn cmp_ext(
        &mut self,
        width: Width,
        rn: Register,
        rm: Register,
        extend: Extend,
        amount: u32,
    ) -> AsmResult {
        let word = cls_addsub_extreg(width.sf(), 1, 1, 0, rm, extend, amount, rn, REG_ZERO)?;
        self.emit(word);
        Ok(())
    }

    // ---- Atomic memory operations ----

    pub fn ldadd(
        &mut self,
        width: Width,
        order: AtomicOrder,
        rs: Register,
        rt: Register,
        rn: Register,
    ) -> AsmResult {
        self.atomic(width, order, 0, 0b000, rs, rt, rn)
    }

    pub fn ldclr(
        &mut self,
        width: Width,
        order: AtomicOrder,
        rs: Register,
        rt: Register,
        rn: Register,
    ) -> AsmResult {
        self.atomic(width, order, 0, 0b001, rs, rt, rn)
    }

    pub fn ldeor(
        &mut self,
        width: Width,
        order: AtomicOrder,
        rs: Register,
        rt: Register,
        rn: Register,
    ) -> AsmResult {
        self.atomic(width, order, 0, 0b010, rs, rt, rn)
    }

    pub fn ldset(
        &mut self,
        width: Width,
        order: AtomicOrder,
        rs: Register,
        rt: Register,
        rn: Register,
    ) -> AsmResult {
        self.atomic(width, order, 0, 0b011, rs, rt, rn)
    }

    pub fn swp(
        &mut self,
        width: Width,
        order: AtomicOrder,
        rs: Register,
        rt: Register,
        rn: Register,
    ) -> AsmResult {
        self.atomic(width, order, 1, 0b000, rs, rt, rn)
    }

    pub fn ldaddal(&mut self, width: Width, rs: Register, rt: Register, rn: Register) -> AsmResult {
        self.ldadd(width, AtomicOrder::AcqRel, rs, rt, rn)
    }

    pub fn swpal(&mut self, width: Width, rs: Register, rt: Register, rn: Register) -> AsmResult {
        self.swp(width, AtomicOrder::AcqRel, rs, rt, rn)
    }

    #[allow(clippy::too_many_arguments)]
    fn atomic(
        &mut self,
        width: Width,
        order: AtomicOrder,
        o3: u32,
        opc: u32,
        rs: Register,
        rt: Register,
        rn: Register,
    ) -> AsmResult {
        let size = match width {
            Width::W32 => 0b10,
            Width::X64 => 0b11,
        };
        let (a, r) = order.bits();
        let word = cls_atomic(size, 0, a, r, rs, o3, opc, rn, rt)?;
        self.emit(word);
        Ok(())
    }

    // ---- Bitfield moves ----

    pub fn sbfm(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        immr: u32,
        imms: u32,
    ) -> AsmResult {
        self.bitfield(width, 0b00, rd, rn, immr, imms)
    }

    pub fn bfm(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        immr: u32,
        imms: u32,
    ) -> AsmResult {
        self.bitfield(width, 0b01, rd, rn, immr, imms)
    }

    pub fn ubfm(
        &mut self,
        width: Width,
        rd: Register,
        rn: Register,
        immr: u32,
        imms: u32,
    ) -> AsmResult {
        self.bitfield(width, 0b10, rd, rn, immr, imms)
    }

    pub fn lsl_imm(&mut self, width: Width, rd: Register, rn: Register, shift: u32) -> AsmResult {
        let bits = width.bits();
        check_shift(width, shift)?;
        self.ubfm(width, rd, rn, (bits - shift) % bits, bits - 1 - shift)
    }

    pub fn lsr_imm(&mut self, width: Width, rd: Register, rn: Register, shift: u32) -> AsmResult {
        check_shift(width, shift)?;
        self.ubfm(width, rd, rn, shift, width.bits() - 1)
    }

    pub fn asr_imm(&mut self, width: Width, rd: Register, rn: Register, shift: u32) -> AsmResult {
        check_shift(width, shift)?;
        self.sbfm(width, rd, rn, shift, width.bits() - 1)
    }

    pub fn uxtb(&mut self, rd: Register, rn: Register) -> AsmResult {
        self.ubfm(Width::W32, rd, rn, 0, 7)
    }

    pub fn uxth(&mut self, rd: Register, rn: Register) -> AsmResult {
        self.ubfm(Width::W32, rd, rn, 0, 15)
    }

    pub fn sxtb(&mut self, width: Width, rd: Register, rn: Register) -> AsmResult {
        self.sbfm(width, rd, rn, 0, 7)
    }

    pub fn sxth(&mut self, width: Width, rd: Register, rn: Register) -> AsmResult {
        self.sbfm(width, rd, rn, 0, 15)
    }

    pub fn sxtw(&mut self, rd: Register, rn: Register) -> AsmResult {
        self.sbfm(Width::X64, rd, rn, 0, 31)
    }

    fn bitfield(
        &mut self,
        width: Width,
        opc: u32,
        rd: Register,
        rn: Register,
        immr: u32,
        imms: u32,
    ) -> AsmResult {
        let sf = width.sf();
        let word = cls_bitfield(sf, opc, u32::from(sf), immr, imms, rn, rd)?;
        self.emit(word);
        Ok(())
    }

    // ---- Load/store (register offset) ----

    /// `ldr rt, [rn, rm, extend #amount]`, where `scaled` shifts the index by
    /// the access size.
    pub fn ldr_reg(
        &mut self,
        width: Width,
        rt: Register,
        rn: Register,
        rm: Register,
        extend: Extend,
        scaled: bool,
    ) -> AsmResult {
        self.ldst_reg(gpr_size(width), 0, 0b01, rt.encoding_zero()?, rn, rm, extend, scaled)
    }

    pub fn str_reg(
        &mut self,
        width: Width,
        rt: Register,
        rn: Register,
        rm: Register,
        extend: Extend,
        scaled: bool,
    ) -> AsmResult {
        self.ldst_reg(gpr_size(width), 0, 0b00, rt.encoding_zero()?, rn, rm, extend, scaled)
    }

    pub fn ldr_freg(
        &mut self,
        width: FloatWidth,
        rt: NeonRegister,
        rn: Register,
        rm: Register,
        extend: Extend,
        scaled: bool,
    ) -> AsmResult {
        self.ldst_reg(fpr_size(width), 1, 0b01, rt.encoding(), rn, rm, extend, scaled)
    }

    pub fn str_freg(
        &mut self,
        width: FloatWidth,
        rt: NeonRegister,
        rn: Register,
        rm: Register,
        extend: Extend,
        scaled: bool,
    ) -> AsmResult {
        self.ldst_reg(fpr_size(width), 1, 0b00, rt.encoding(), rn, rm, extend, scaled)
    }

    #[allow(clippy::too_many_arguments)]
    fn ldst_reg(
        &mut self,
        size: u32,
        v: u32,
        opc: u32,
        rt: u32,
        rn: Register,
        rm: Register,
        extend: Extend,
        scaled: bool,
    ) -> AsmResult {
        let word = cls_ldst_regoffset(size, v, opc, rm, extend, u32::from(scaled), rn, rt)?;
        self.emit(word);
        Ok(())
    }
}

fn gpr_size(width: Width) -> u32 {
    match width {
        Width::W32 => 0b10,
        Width::X64 => 0b11,
    }
}

fn fpr_size(width: FloatWidth) -> u32 {
    match width {
        FloatWidth::F32 => 0b10,
        FloatWidth::F64 => 0b11,
    }
}

fn check_shift(width: Width, shift: u32) -> AsmResult {
    if shift < width.bits() {
        Ok(())
    } else {
        Err(EncodingViolation::InvalidOperand {
            what: "shift amount",
            value: i64::from(shift),
        })
    }
}

/// Signed distance from `from` to `to`, in instructions.
#[allow(clippy::cast_possible_wrap)]
fn distance(from: usize, to: usize) -> i64 {
    (to as i64 - from as i64) / INSTRUCTION_SIZE as i64
}

fn encode_jump(kind: JumpKind, distance: i64) -> AsmResult<u32> {
    let bits = match kind {
        JumpKind::Unconditional => 26,
        JumpKind::Conditional(_) | JumpKind::NonZero { .. } | JumpKind::Zero { .. } => 19,
    };
    let imm = i32::try_from(distance).map_err(|_| EncodingViolation::ImmediateOutOfRange {
        bits,
        signed: true,
        value: distance,
    })?;
    match kind {
        JumpKind::Unconditional => cls_uncond_branch_imm(0, imm),
        JumpKind::Conditional(cond) => cls_cond_branch_imm(0, imm, 0, cond),
        JumpKind::NonZero { sf, rt } => cls_cmp_branch_imm(sf, 1, rt, imm),
        JumpKind::Zero { sf, rt } => cls_cmp_branch_imm(sf, 0, rt, imm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{R0, R1, R10, R2, R3, REG_SP};

    fn words(code: &[u8]) -> Vec<u32> {
        code.chunks_exact(4)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect()
    }

    fn assemble(f: impl FnOnce(&mut Assembler) -> AsmResult) -> Vec<u32> {
        let mut asm = Assembler::new();
        f(&mut asm).unwrap();
        words(asm.code())
    }

    #[test]
    fn ret_vectors() {
        assert_eq!(assemble(Assembler::ret), [0xd65f_03c0]);
        assert_eq!(assemble(|asm| asm.ret_reg(R0)), [0xd65f_0000]);
        assert_eq!(assemble(|asm| asm.ret_reg(R10)), [0xd65f_0140]);
        assert!(Assembler::new().ret_reg(REG_SP).is_err());
    }

    #[test]
    fn backward_branch() {
        let code = assemble(|asm| {
            let top = asm.create_label();
            asm.bind_label(top)?;
            asm.add(Width::X64, R0, R0, R1)?;
            asm.cbnz(Width::X64, R2, top)?;
            asm.bc(Cond::NE, top)?;
            asm.b(top)
        });
        assert_eq!(code, [0x8b01_0000, 0xb5ff_ffe2, 0x54ff_ffc1, 0x17ff_fffd]);
    }

    #[test]
    fn forward_branch_is_patched_on_bind() {
        let mut asm = Assembler::new();
        let done = asm.create_label();
        asm.cbz(Width::W32, R3, done).unwrap();
        asm.b(done).unwrap();
        asm.ret().unwrap();
        assert!(!asm.is_bound(done).unwrap());
        asm.bind_label(done).unwrap();
        assert!(asm.is_bound(done).unwrap());
        assert_eq!(words(asm.code()), [0x3400_0063, 0x1400_0002, 0xd65f_03c0]);
    }

    #[test]
    fn double_bind() {
        let mut asm = Assembler::new();
        let label = asm.create_label();
        asm.bind_label(label).unwrap();
        assert_eq!(
            asm.bind_label(label),
            Err(EncodingViolation::LabelAlreadyBound)
        );
    }

    #[test]
    fn finalize_rejects_unresolved_jumps() {
        let mut asm = Assembler::new();
        let label = asm.create_label();
        asm.b(label).unwrap();
        asm.bc(Cond::EQ, label).unwrap();
        assert_eq!(asm.finalize(), Err(EncodingViolation::UnresolvedJumps(2)));
    }

    #[test]
    fn finalize_pads_with_ret() {
        let code = Assembler::new().finalize().unwrap();
        assert_eq!(words(&code), [0xd65f_03c0; 4]);

        let mut asm = Assembler::new();
        asm.blr(R1).unwrap();
        let code = asm.finalize().unwrap();
        assert_eq!(
            words(&code),
            [0xd63f_0020, 0xd65f_03c0, 0xd65f_03c0, 0xd65f_03c0]
        );
    }

    #[test]
    fn shift_aliases() {
        let code = assemble(|asm| {
            asm.lsl_imm(Width::X64, R0, R1, 4)?;
            asm.lsr_imm(Width::X64, R0, R1, 4)?;
            asm.asr_imm(Width::X64, R0, R1, 4)?;
            asm.lsl_imm(Width::W32, R2, R3, 31)?;
            asm.lsl_imm(Width::X64, R0, R1, 0)
        });
        assert_eq!(
            code,
            [0xd37c_ec20, 0xd344_fc20, 0x9344_fc20, 0x5301_0062, 0xd340_fc20]
        );
        assert!(Assembler::new().lsl_imm(Width::W32, R0, R1, 32).is_err());
    }
}
