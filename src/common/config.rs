pub type FileId = usize;
pub type Diagnostic = codespan_reporting::diagnostic::Diagnostic<FileId>;

pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

/// Limits applied while decoding a serialized compilation unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodeConfig {
    /// Deepest allowed nesting of struct and tuple type arguments.
    pub max_type_depth: usize,
    /// Largest element count or byte length accepted for any prefixed array.
    pub max_length: usize,
    /// Reject input that continues past the architecture tag.
    pub strict: bool,
}

impl DecodeConfig {
    pub const DEFAULT_MAX_TYPE_DEPTH: usize = 64;
    pub const DEFAULT_MAX_LENGTH: usize = 1 << 28;
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_type_depth: Self::DEFAULT_MAX_TYPE_DEPTH,
            max_length: Self::DEFAULT_MAX_LENGTH,
            strict: false,
        }
    }
}
