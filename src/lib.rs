#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::match_same_arms,
    clippy::enum_glob_use,
    clippy::upper_case_acronyms
)]

pub mod asm;
pub mod bytecode;
mod common;

pub use asm::{Assembler, EncodingViolation};
pub use bytecode::{
    decode_compilation_info, decode_compilation_info_with, dump_compilation_info,
    serialize_compilation_info, CompilationInfo,
};
pub use common::config::{self, DecodeConfig, Diagnostic, FileId, ToDiagnostic};
pub use common::{ByteReader, ByteWriter, DecodeError, DecodeErrorKind, FromBytes, ToBytes};

use thiserror::Error;

/// Any failure of the decode/encode core, for pipeline callers that handle
/// both halves with one `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encoding(#[from] EncodingViolation),
}

impl ToDiagnostic for Error {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Decode(err) => err.to_diagnostic(),
            Error::Encoding(err) => Diagnostic::error().with_message(err.to_string()),
        }
    }
}
