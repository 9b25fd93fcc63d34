mod utils;

use boots_asm::{
    bytecode::{
        decode_bytecode_function, Architecture, BytecodeFunction, BytecodeType, CompilationInfo,
        ConstPoolEntry, StructId,
    },
    decode_compilation_info, decode_compilation_info_with, serialize_compilation_info,
    ByteReader, ByteWriter, DecodeConfig, DecodeErrorKind, Error,
};
use expect_test::expect;

fn float_function() -> BytecodeFunction {
    BytecodeFunction::new(
        vec![0x2a, 0x00, 0x01],
        vec![
            ConstPoolEntry::Float32(f32::from_bits(0x7fc0_0001)),
            ConstPoolEntry::Float32(-0.0),
            ConstPoolEntry::Float64(f64::from_bits(0xfff8_0000_dead_beef)),
            ConstPoolEntry::Float64(0.0),
        ],
        vec![BytecodeType::Float32, BytecodeType::Float64],
        1,
    )
}

#[test]
fn float_constants_keep_their_bits() {
    let info = CompilationInfo::new(float_function(), vec![], Architecture::Arm64);
    let bytes = serialize_compilation_info(&info);
    let decoded = decode_compilation_info(&bytes).unwrap();

    let bits: Vec<u64> = decoded
        .function()
        .const_pool()
        .iter()
        .map(|entry| match entry {
            ConstPoolEntry::Float32(value) => u64::from(value.to_bits()),
            ConstPoolEntry::Float64(value) => value.to_bits(),
            other => panic!("unexpected entry {other:?}"),
        })
        .collect();
    assert_eq!(bits, [0x7fc0_0001, 0x8000_0000, 0xfff8_0000_dead_beef, 0]);
    assert_eq!(decoded, info);
}

#[test]
fn nested_types_roundtrip() {
    let pair = BytecodeType::Tuple(vec![BytecodeType::Bool, BytecodeType::TypeParam(1)]);
    let function = BytecodeFunction::new(
        vec![],
        vec![ConstPoolEntry::String("ünïcode".to_string()), ConstPoolEntry::Char('\u{1f980}')],
        vec![
            BytecodeType::Struct(StructId(-3), vec![pair.clone(), BytecodeType::Tuple(vec![])]),
            pair,
        ],
        0,
    );
    let info = CompilationInfo::new(
        function,
        vec![BytecodeType::Int64, BytecodeType::Ptr],
        Architecture::X64,
    );
    let bytes = serialize_compilation_info(&info);
    assert_eq!(decode_compilation_info(&bytes), Ok(info));
}

#[test]
fn type_param_indices_use_the_full_unsigned_range() {
    let function = BytecodeFunction::new(
        vec![],
        vec![],
        vec![BytecodeType::TypeParam(1 << 31), BytecodeType::TypeParam(u32::MAX)],
        0,
    );
    let info = CompilationInfo::new(
        function,
        vec![BytecodeType::Tuple(vec![BytecodeType::TypeParam((1 << 31) - 1)])],
        Architecture::Arm64,
    );
    let bytes = serialize_compilation_info(&info);
    assert_eq!(decode_compilation_info(&bytes), Ok(info));
}

#[test]
fn read_i64_uses_full_width() {
    let bytes = [0xff; 8];
    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_i64(), Ok(-1));
    assert!(reader.is_at_end());

    let bytes = [0, 0, 0, 0, 0, 0, 0, 0x80];
    assert_eq!(ByteReader::new(&bytes).read_i64(), Ok(i64::MIN));
}

#[test]
fn truncated_code() {
    utils::check_decode_error(
        &[5, 0, 0, 0, 1, 2],
        expect![[r#"
            Error: failed to decode compilation info: unexpected end of input: needed 5 bytes but only 2 remain
              = at byte offset 4
              = the input was truncated or produced by a different serializer revision"#]],
    );
}

#[test]
fn unknown_const_pool_tag() {
    let mut writer = ByteWriter::new();
    writer.push(0i32);
    writer.push(1i32);
    writer.push(9u8);
    utils::check_decode_error(
        writer.as_slice(),
        expect![[r#"
            Error: failed to decode compilation info: invalid const pool tag 9
              = at byte offset 8
              = the serialized compilation unit is malformed"#]],
    );
}

#[test]
fn negative_length() {
    utils::check_decode_error(
        &(-1i32).to_le_bytes(),
        expect![[r#"
            Error: failed to decode compilation info: negative length -1
              = at byte offset 0
              = the serialized compilation unit is malformed"#]],
    );
}

#[test]
fn invalid_utf8_string() {
    let mut writer = ByteWriter::new();
    writer.push(0i32);
    writer.push(1i32);
    writer.push(0u8);
    writer.push(2i32);
    writer.push_bytes(&[0xc3, 0x28]);
    let err = decode_compilation_info(writer.as_slice()).unwrap_err();
    assert_eq!(err.offset, 13);
    assert_eq!(err.kind, DecodeErrorKind::InvalidUtf8);
}

#[test]
fn strict_mode_rejects_trailing_bytes() {
    let info = CompilationInfo::new(float_function(), vec![], Architecture::X64);
    let mut bytes = serialize_compilation_info(&info).into_vec();
    bytes.push(0);
    let len = bytes.len();

    assert_eq!(decode_compilation_info(&bytes), Ok(info));

    let config = DecodeConfig {
        strict: true,
        ..DecodeConfig::default()
    };
    let err = decode_compilation_info_with(&bytes, &config).unwrap_err();
    assert_eq!(err.offset, len - 1);
    assert_eq!(err.kind, DecodeErrorKind::TrailingBytes(1));

    let err = decode_bytecode_function(&bytes, &config).unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::TrailingBytes(_)));
}

#[test]
fn crate_error_wraps_decode_errors() {
    fn decode(bytes: &[u8]) -> Result<CompilationInfo, Error> {
        Ok(decode_compilation_info(bytes)?)
    }

    let err = decode(&[]).unwrap_err();
    expect![[r#"unexpected end of input: needed 4 bytes but only 0 remain (at byte offset 0)"#]]
        .assert_eq(&err.to_string());
}
