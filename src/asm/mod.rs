mod assembler;
mod buffer;
mod cond;
pub mod encode;
mod error;
mod imm;
mod label;
mod reg;

pub use assembler::{Assembler, AsmResult, AtomicOrder, CODE_ALIGNMENT};
pub use buffer::AssemblerBuffer;
pub use cond::{Cond, Extend, FloatWidth, Shift, Width};
pub use error::{EncodingViolation, RegisterRole};
pub use imm::{SignedImm, UnsignedImm};
pub use label::{ForwardJump, JumpKind, Label, LabelTracker};
pub use reg::*;
