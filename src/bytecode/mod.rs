mod data;
mod deserialize;
mod dump;
mod serialize;

pub use data::{
    Architecture, BytecodeFunction, BytecodeType, BytecodeTypeArray, BytecodeTypeTag,
    CompilationInfo, ConstPoolEntry, ConstPoolTag, StructId,
};
pub use deserialize::{
    decode_bytecode_function, decode_compilation_info, decode_compilation_info_with,
    Deserializer,
};
pub use dump::{dump_code, dump_compilation_info};
pub use serialize::{
    serialize_bytecode_function, serialize_compilation_info, write_bytecode_function,
    write_bytecode_type, write_const_pool_entry, write_type_array,
};
