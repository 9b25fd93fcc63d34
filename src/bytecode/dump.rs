use crate::bytecode::{BytecodeType, CompilationInfo, ConstPoolEntry};
use std::fmt::Write;

const BYTES_PER_ROW: usize = 16;

/// Renders a stable, human-readable listing of a decoded compilation unit.
#[must_use]
pub fn dump_compilation_info(info: &CompilationInfo) -> String {
    let mut buf = String::new();
    let function = info.function();

    writeln!(buf, "arch:        {}", info.arch().as_str()).unwrap();
    writeln!(buf, "type params: [{}]", join(info.type_params())).unwrap();
    writeln!(buf, "arguments:   {}", function.arguments()).unwrap();

    writeln!(buf, "registers:").unwrap();
    for (idx, ty) in function.registers().iter().enumerate() {
        writeln!(buf, "  r{idx:<3} {ty}").unwrap();
    }

    writeln!(buf, "const pool:").unwrap();
    for (idx, entry) in function.const_pool().iter().enumerate() {
        write!(buf, "  #{idx:<3} ").unwrap();
        match entry {
            ConstPoolEntry::Int32(value) => writeln!(buf, "int32   {value}"),
            ConstPoolEntry::Int64(value) => writeln!(buf, "int64   {value}"),
            ConstPoolEntry::Float32(value) => {
                writeln!(buf, "float32 {value:?} ({:#010x})", value.to_bits())
            }
            ConstPoolEntry::Float64(value) => {
                writeln!(buf, "float64 {value:?} ({:#018x})", value.to_bits())
            }
            ConstPoolEntry::Char(ch) => writeln!(buf, "char    {ch:?}"),
            ConstPoolEntry::String(value) => writeln!(buf, "string  {value:?}"),
        }
        .unwrap();
    }

    write!(buf, "code ({} bytes):", function.code().len()).unwrap();
    if !function.code().is_empty() {
        buf.push('\n');
        buf.push_str(&dump_code(function.code()));
    }
    buf
}

/// Hex listing of an opcode stream, sixteen bytes per row.
#[must_use]
pub fn dump_code(code: &[u8]) -> String {
    let mut buf = String::new();
    for (row, chunk) in code.chunks(BYTES_PER_ROW).enumerate() {
        write!(buf, "  {:04x} |", row * BYTES_PER_ROW).unwrap();
        for byte in chunk {
            write!(buf, " {byte:02x}").unwrap();
        }
        buf.push('\n');
    }
    buf.pop();
    buf
}

fn join(types: &[BytecodeType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
