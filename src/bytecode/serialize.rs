use crate::{
    bytecode::{BytecodeFunction, BytecodeType, CompilationInfo, ConstPoolEntry},
    common::ByteWriter,
};

/// Encodes `info` in the layout read back by [`decode_compilation_info`].
///
/// [`decode_compilation_info`]: crate::decode_compilation_info
#[must_use]
pub fn serialize_compilation_info(info: &CompilationInfo) -> Box<[u8]> {
    let mut writer = ByteWriter::new();
    write_bytecode_function(&mut writer, info.function());
    write_type_array(&mut writer, info.type_params());
    writer.push(info.arch() as u8);
    writer.into_inner()
}

#[must_use]
pub fn serialize_bytecode_function(function: &BytecodeFunction) -> Box<[u8]> {
    let mut writer = ByteWriter::new();
    write_bytecode_function(&mut writer, function);
    writer.into_inner()
}

pub fn write_bytecode_function(writer: &mut ByteWriter, function: &BytecodeFunction) {
    write_len(writer, function.code().len());
    writer.push_bytes(function.code());
    write_len(writer, function.const_pool().len());
    for entry in function.const_pool() {
        write_const_pool_entry(writer, entry);
    }
    write_type_array(writer, function.registers());
    writer.push(function.arguments());
}

pub fn write_type_array(writer: &mut ByteWriter, types: &[BytecodeType]) {
    write_len(writer, types.len());
    for ty in types {
        write_bytecode_type(writer, ty);
    }
}

pub fn write_bytecode_type(writer: &mut ByteWriter, ty: &BytecodeType) {
    writer.push(ty.tag() as u8);
    match ty {
        BytecodeType::Struct(id, type_args) => {
            writer.push(id.0);
            write_type_array(writer, type_args);
        }
        BytecodeType::Tuple(type_args) => write_type_array(writer, type_args),
        BytecodeType::TypeParam(idx) => writer.push(*idx),
        BytecodeType::Unit
        | BytecodeType::Bool
        | BytecodeType::UInt8
        | BytecodeType::Char
        | BytecodeType::Int32
        | BytecodeType::Int64
        | BytecodeType::Float32
        | BytecodeType::Float64
        | BytecodeType::Ptr => {}
    }
}

pub fn write_const_pool_entry(writer: &mut ByteWriter, entry: &ConstPoolEntry) {
    writer.push(entry.tag() as u8);
    match entry {
        ConstPoolEntry::Int32(value) => writer.push(*value),
        ConstPoolEntry::Int64(value) => writer.push(*value),
        ConstPoolEntry::Float32(value) => writer.push(value.to_bits()),
        ConstPoolEntry::Float64(value) => writer.push(value.to_bits()),
        ConstPoolEntry::Char(ch) => writer.push(u32::from(*ch)),
        ConstPoolEntry::String(value) => {
            write_len(writer, value.len());
            writer.push_bytes(value.as_bytes());
        }
    }
}

fn write_len(writer: &mut ByteWriter, len: usize) {
    let len = i32::try_from(len)
        .unwrap_or_else(|_| panic!("length {len} does not fit a 32-bit length prefix"));
    writer.push(len);
}
