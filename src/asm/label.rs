use crate::{
    asm::{error::EncodingViolation, Cond, Register},
    common::List,
};
use rustc_hash::FxHashMap;

/// Handle to a code offset that may not be known yet.
///
/// Labels index into the table of the assembler that created them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Label(usize);

/// Which instruction a pending fixup re-encodes once its target is known.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum JumpKind {
    /// `b`, 26-bit word offset.
    Unconditional,
    /// `b.cond`, 19-bit word offset.
    Conditional(Cond),
    /// `cbnz`, 19-bit word offset.
    NonZero { sf: bool, rt: Register },
    /// `cbz`, 19-bit word offset.
    Zero { sf: bool, rt: Register },
}

/// A placeholder branch waiting for its label to be bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ForwardJump {
    /// Byte offset of the placeholder instruction.
    pub at: usize,
    pub label: Label,
    pub kind: JumpKind,
}

/// Label offsets plus the fixups still waiting on unbound labels.
#[derive(Debug, Default)]
pub struct LabelTracker {
    offsets: Vec<Option<usize>>,
    pending: FxHashMap<Label, List<ForwardJump>>,
}

impl LabelTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_label(&mut self) -> Label {
        self.offsets.push(None);
        Label(self.offsets.len() - 1)
    }

    /// The bound offset of `label`, or `None` while it is unbound.
    pub fn offset(&self, label: Label) -> Result<Option<usize>, EncodingViolation> {
        self.offsets
            .get(label.0)
            .copied()
            .ok_or(EncodingViolation::UnknownLabel)
    }

    pub fn record(&mut self, jump: ForwardJump) -> Result<(), EncodingViolation> {
        if self.offset(jump.label)?.is_some() {
            return Err(EncodingViolation::LabelAlreadyBound);
        }
        self.pending.entry(jump.label).or_default().push(jump);
        Ok(())
    }

    /// Fixups still waiting on `label`.
    #[must_use]
    pub fn pending(&self, label: Label) -> &[ForwardJump] {
        self.pending.get(&label).map_or(&[], |jumps| jumps.as_slice())
    }

    /// Binds `label` to `offset` and hands back the fixups that referenced it.
    pub fn bind(
        &mut self,
        label: Label,
        offset: usize,
    ) -> Result<List<ForwardJump>, EncodingViolation> {
        let slot = self
            .offsets
            .get_mut(label.0)
            .ok_or(EncodingViolation::UnknownLabel)?;
        if slot.is_some() {
            return Err(EncodingViolation::LabelAlreadyBound);
        }
        *slot = Some(offset);
        Ok(self.pending.remove(&label).unwrap_or_default())
    }

    /// Number of fixups whose label is still unbound.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.pending.values().map(|jumps| jumps.len()).sum()
    }
}
