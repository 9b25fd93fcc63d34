#![allow(dead_code)]

use boots_asm::{decode_compilation_info, Diagnostic, ToDiagnostic};
use expect_test::Expect;

/// Splits finalized machine code into little-endian instruction words.
pub fn words(code: &[u8]) -> Vec<u32> {
    assert_eq!(
        code.len() % 4,
        0,
        "code is not a whole number of instructions"
    );
    code.chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect()
}

/// Decodes `bytes`, which must be malformed, and checks the diagnostic text.
pub fn check_decode_error(bytes: &[u8], expected: Expect) {
    let err = decode_compilation_info(bytes).expect_err("input decoded successfully");
    expected.assert_eq(&describe(&err.to_diagnostic()));
}

pub fn describe(diagnostic: &Diagnostic) -> String {
    let mut buf = format!("{:?}: {}", diagnostic.severity, diagnostic.message);
    for note in &diagnostic.notes {
        buf.push_str("\n  = ");
        buf.push_str(note);
    }
    buf
}
