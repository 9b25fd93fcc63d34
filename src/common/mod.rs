mod bytes;
pub mod config;
pub mod error;

pub use bytes::{ByteReader, ByteWriter, FromBytes, ToBytes};
pub use error::{DecodeError, DecodeErrorKind};

pub type List<T> = smallvec::SmallVec<[T; 3]>;
