use std::fmt;

pub type BytecodeTypeArray = Vec<BytecodeType>;

/// Opaque struct identifier, resolved by the symbol table of the producer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StructId(pub i32);

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum BytecodeType {
    Unit,
    Bool,
    UInt8,
    Char,
    Int32,
    Int64,
    Float32,
    Float64,
    Ptr,
    Struct(StructId, BytecodeTypeArray),
    Tuple(BytecodeTypeArray),
    TypeParam(u32),
}

impl BytecodeType {
    #[must_use]
    pub fn tag(&self) -> BytecodeTypeTag {
        match self {
            Self::Unit => BytecodeTypeTag::Unit,
            Self::Bool => BytecodeTypeTag::Bool,
            Self::UInt8 => BytecodeTypeTag::UInt8,
            Self::Char => BytecodeTypeTag::Char,
            Self::Int32 => BytecodeTypeTag::Int32,
            Self::Int64 => BytecodeTypeTag::Int64,
            Self::Float32 => BytecodeTypeTag::Float32,
            Self::Float64 => BytecodeTypeTag::Float64,
            Self::Ptr => BytecodeTypeTag::Ptr,
            Self::Struct(..) => BytecodeTypeTag::Struct,
            Self::Tuple(_) => BytecodeTypeTag::Tuple,
            Self::TypeParam(_) => BytecodeTypeTag::TypeParam,
        }
    }

    #[must_use]
    pub fn is_any_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    #[must_use]
    pub fn is_type_param(&self) -> bool {
        matches!(self, Self::TypeParam(_))
    }

    /// Type arguments of a struct, or element types of a tuple.
    #[must_use]
    pub fn type_args(&self) -> &[BytecodeType] {
        match self {
            Self::Struct(_, args) | Self::Tuple(args) => args,
            _ => &[],
        }
    }
}

impl fmt::Display for BytecodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, types: &[BytecodeType]) -> fmt::Result {
            for (i, ty) in types.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{ty}")?;
            }
            Ok(())
        }

        match self {
            Self::Unit => f.write_str("Unit"),
            Self::Bool => f.write_str("Bool"),
            Self::UInt8 => f.write_str("UInt8"),
            Self::Char => f.write_str("Char"),
            Self::Int32 => f.write_str("Int32"),
            Self::Int64 => f.write_str("Int64"),
            Self::Float32 => f.write_str("Float32"),
            Self::Float64 => f.write_str("Float64"),
            Self::Ptr => f.write_str("Ptr"),
            Self::Struct(id, args) => {
                write!(f, "Struct#{}", id.0)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    list(f, args)?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            Self::Tuple(args) => {
                f.write_str("(")?;
                list(f, args)?;
                f.write_str(")")
            }
            Self::TypeParam(idx) => write!(f, "T{idx}"),
        }
    }
}

/// Wire tag of a [`BytecodeType`].
///
/// Tags 11 and 13..=15 name type kinds the producer knows about but that never
/// reach this decoder; they are rejected like any unknown tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum BytecodeTypeTag {
    Unit = 0,
    Bool = 1,
    UInt8 = 2,
    Char = 3,
    Int32 = 4,
    Int64 = 5,
    Float32 = 6,
    Float64 = 7,
    Ptr = 8,
    Tuple = 9,
    TypeParam = 10,
    Struct = 12,
}

impl BytecodeTypeTag {
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Unit,
            1 => Self::Bool,
            2 => Self::UInt8,
            3 => Self::Char,
            4 => Self::Int32,
            5 => Self::Int64,
            6 => Self::Float32,
            7 => Self::Float64,
            8 => Self::Ptr,
            9 => Self::Tuple,
            10 => Self::TypeParam,
            12 => Self::Struct,
            _ => return None,
        })
    }
}

/// A literal addressed by index from the opcode stream.
///
/// Equality on the float variants compares bit patterns, so NaN payloads and
/// signed zeros are distinguished.
#[derive(Debug, Clone)]
pub enum ConstPoolEntry {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Char(char),
    String(String),
}

impl ConstPoolEntry {
    #[must_use]
    pub fn tag(&self) -> ConstPoolTag {
        match self {
            Self::String(_) => ConstPoolTag::String,
            Self::Float32(_) => ConstPoolTag::Float32,
            Self::Float64(_) => ConstPoolTag::Float64,
            Self::Int32(_) => ConstPoolTag::Int32,
            Self::Int64(_) => ConstPoolTag::Int64,
            Self::Char(_) => ConstPoolTag::Char,
        }
    }
}

impl PartialEq for ConstPoolEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            (Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConstPoolEntry {}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum ConstPoolTag {
    String = 0,
    Float32 = 1,
    Float64 = 2,
    Int32 = 3,
    Int64 = 4,
    Char = 5,
}

impl ConstPoolTag {
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::String,
            1 => Self::Float32,
            2 => Self::Float64,
            3 => Self::Int32,
            4 => Self::Int64,
            5 => Self::Char,
            _ => return None,
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Architecture {
    X64 = 0,
    Arm64 = 1,
}

impl Architecture {
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::X64),
            1 => Some(Self::Arm64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }
}

/// Platform-independent compiled form of one method.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BytecodeFunction {
    code: Vec<u8>,
    const_pool: Vec<ConstPoolEntry>,
    registers: BytecodeTypeArray,
    arguments: u32,
}

impl BytecodeFunction {
    #[must_use]
    pub fn new(
        code: Vec<u8>,
        const_pool: Vec<ConstPoolEntry>,
        registers: BytecodeTypeArray,
        arguments: u32,
    ) -> Self {
        Self {
            code,
            const_pool,
            registers,
            arguments,
        }
    }

    #[must_use]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    #[must_use]
    pub fn const_pool(&self) -> &[ConstPoolEntry] {
        &self.const_pool
    }

    #[must_use]
    pub fn const_pool_entry(&self, idx: usize) -> Option<&ConstPoolEntry> {
        self.const_pool.get(idx)
    }

    #[must_use]
    pub fn registers(&self) -> &[BytecodeType] {
        &self.registers
    }

    #[must_use]
    pub fn register_type(&self, reg: usize) -> Option<&BytecodeType> {
        self.registers.get(reg)
    }

    #[must_use]
    pub fn arguments(&self) -> u32 {
        self.arguments
    }
}

/// Everything the code generator needs to compile one function instance.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompilationInfo {
    function: BytecodeFunction,
    type_params: BytecodeTypeArray,
    arch: Architecture,
}

impl CompilationInfo {
    #[must_use]
    pub fn new(
        function: BytecodeFunction,
        type_params: BytecodeTypeArray,
        arch: Architecture,
    ) -> Self {
        Self {
            function,
            type_params,
            arch,
        }
    }

    #[must_use]
    pub fn function(&self) -> &BytecodeFunction {
        &self.function
    }

    #[must_use]
    pub fn type_params(&self) -> &[BytecodeType] {
        &self.type_params
    }

    #[must_use]
    pub fn arch(&self) -> Architecture {
        self.arch
    }
}
