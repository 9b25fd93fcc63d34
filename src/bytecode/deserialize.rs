use crate::{
    bytecode::{
        Architecture, BytecodeFunction, BytecodeType, BytecodeTypeArray, BytecodeTypeTag,
        CompilationInfo, ConstPoolEntry, ConstPoolTag, StructId,
    },
    common::{config::DecodeConfig, ByteReader, DecodeError, DecodeErrorKind},
};

/// Decodes a serialized compilation unit with the default [`DecodeConfig`].
pub fn decode_compilation_info(bytes: &[u8]) -> Result<CompilationInfo, DecodeError> {
    decode_compilation_info_with(bytes, &DecodeConfig::default())
}

pub fn decode_compilation_info_with(
    bytes: &[u8],
    config: &DecodeConfig,
) -> Result<CompilationInfo, DecodeError> {
    let info = Deserializer::new(bytes, config).decode_compilation_info()?;
    tracing::debug!(
        bytes = bytes.len(),
        code = info.function().code().len(),
        const_pool = info.function().const_pool().len(),
        registers = info.function().registers().len(),
        type_params = info.type_params().len(),
        arch = info.arch().as_str(),
        "decoded compilation info"
    );
    Ok(info)
}

/// Decodes a single serialized bytecode function; the input must hold nothing else.
pub fn decode_bytecode_function(
    bytes: &[u8],
    config: &DecodeConfig,
) -> Result<BytecodeFunction, DecodeError> {
    let mut de = Deserializer::new(bytes, config);
    let function = de.decode_bytecode_function()?;
    de.finish()?;
    Ok(function)
}

/// Recursive-descent decoder over the fixed field order of the wire format.
pub struct Deserializer<'a, 'c> {
    reader: ByteReader<'a>,
    config: &'c DecodeConfig,
}

impl<'a, 'c> Deserializer<'a, 'c> {
    #[must_use]
    pub fn new(bytes: &'a [u8], config: &'c DecodeConfig) -> Self {
        Self {
            reader: ByteReader::new(bytes),
            config,
        }
    }

    pub fn decode_compilation_info(mut self) -> Result<CompilationInfo, DecodeError> {
        let function = self.decode_bytecode_function()?;
        let type_params = self.decode_type_array(0)?;
        let arch = self.decode_architecture()?;
        if self.config.strict {
            self.finish()?;
        }
        Ok(CompilationInfo::new(function, type_params, arch))
    }

    pub fn decode_bytecode_function(&mut self) -> Result<BytecodeFunction, DecodeError> {
        let code = self.decode_byte_array()?;
        let const_pool = self.decode_const_pool()?;
        let registers = self.decode_type_array(0)?;
        let arguments = self.reader.take::<u32>()?;
        Ok(BytecodeFunction::new(code, const_pool, registers, arguments))
    }

    pub fn decode_bytecode_type(&mut self, depth: usize) -> Result<BytecodeType, DecodeError> {
        let offset = self.reader.position();
        if depth >= self.config.max_type_depth {
            return Err(DecodeError::new(
                offset,
                DecodeErrorKind::NestingTooDeep {
                    limit: self.config.max_type_depth,
                },
            ));
        }

        let raw = self.reader.read_u8()?;
        let tag = BytecodeTypeTag::from_raw(raw).ok_or_else(|| invalid_tag(offset, "type", raw))?;
        Ok(match tag {
            BytecodeTypeTag::Unit => BytecodeType::Unit,
            BytecodeTypeTag::Bool => BytecodeType::Bool,
            BytecodeTypeTag::UInt8 => BytecodeType::UInt8,
            BytecodeTypeTag::Char => BytecodeType::Char,
            BytecodeTypeTag::Int32 => BytecodeType::Int32,
            BytecodeTypeTag::Int64 => BytecodeType::Int64,
            BytecodeTypeTag::Float32 => BytecodeType::Float32,
            BytecodeTypeTag::Float64 => BytecodeType::Float64,
            BytecodeTypeTag::Ptr => BytecodeType::Ptr,
            BytecodeTypeTag::Struct => {
                let id = StructId(self.reader.read_id()?);
                let type_args = self.decode_type_array(depth + 1)?;
                BytecodeType::Struct(id, type_args)
            }
            BytecodeTypeTag::Tuple => BytecodeType::Tuple(self.decode_type_array(depth + 1)?),
            BytecodeTypeTag::TypeParam => BytecodeType::TypeParam(self.reader.take::<u32>()?),
        })
    }

    pub fn decode_type_array(&mut self, depth: usize) -> Result<BytecodeTypeArray, DecodeError> {
        let len = self.decode_len()?;
        let mut types = Vec::with_capacity(len.min(self.reader.remaining()));
        for _ in 0..len {
            types.push(self.decode_bytecode_type(depth)?);
        }
        Ok(types)
    }

    pub fn decode_const_pool(&mut self) -> Result<Vec<ConstPoolEntry>, DecodeError> {
        let len = self.decode_len()?;
        let mut entries = Vec::with_capacity(len.min(self.reader.remaining()));
        for _ in 0..len {
            entries.push(self.decode_const_pool_entry()?);
        }
        Ok(entries)
    }

    #[allow(clippy::cast_sign_loss)]
    pub fn decode_const_pool_entry(&mut self) -> Result<ConstPoolEntry, DecodeError> {
        let offset = self.reader.position();
        let raw = self.reader.read_u8()?;
        let tag =
            ConstPoolTag::from_raw(raw).ok_or_else(|| invalid_tag(offset, "const pool", raw))?;
        Ok(match tag {
            ConstPoolTag::Int32 => ConstPoolEntry::Int32(self.reader.read_i32()?),
            ConstPoolTag::Int64 => ConstPoolEntry::Int64(self.reader.read_i64()?),
            ConstPoolTag::Float32 => {
                ConstPoolEntry::Float32(f32::from_bits(self.reader.read_i32()? as u32))
            }
            ConstPoolTag::Float64 => {
                ConstPoolEntry::Float64(f64::from_bits(self.reader.read_i64()? as u64))
            }
            ConstPoolTag::Char => {
                let offset = self.reader.position();
                let value = self.reader.read_i32()? as u32;
                let ch = char::from_u32(value)
                    .ok_or_else(|| DecodeError::new(offset, DecodeErrorKind::InvalidChar(value)))?;
                ConstPoolEntry::Char(ch)
            }
            ConstPoolTag::String => {
                let len = self.decode_len()?;
                ConstPoolEntry::String(self.reader.read_string_content(len)?)
            }
        })
    }

    pub fn decode_architecture(&mut self) -> Result<Architecture, DecodeError> {
        let offset = self.reader.position();
        let raw = self.reader.read_u8()?;
        Architecture::from_raw(raw).ok_or_else(|| invalid_tag(offset, "architecture", raw))
    }

    fn decode_byte_array(&mut self) -> Result<Vec<u8>, DecodeError> {
        let offset = self.reader.position();
        let len = self.reader.at_checkpoint(ByteReader::read_len)?;
        self.check_len(offset, len)?;
        self.reader.read_byte_array()
    }

    fn decode_len(&mut self) -> Result<usize, DecodeError> {
        let offset = self.reader.position();
        let len = self.reader.read_len()?;
        self.check_len(offset, len)?;
        Ok(len)
    }

    fn check_len(&self, offset: usize, len: usize) -> Result<(), DecodeError> {
        if len > self.config.max_length {
            return Err(DecodeError::new(
                offset,
                DecodeErrorKind::LengthTooLarge {
                    len,
                    limit: self.config.max_length,
                },
            ));
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), DecodeError> {
        match self.reader.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::new(
                self.reader.position(),
                DecodeErrorKind::TrailingBytes(n),
            )),
        }
    }
}

fn invalid_tag(offset: usize, what: &'static str, tag: u8) -> DecodeError {
    DecodeError::new(offset, DecodeErrorKind::InvalidTag { what, tag })
}
