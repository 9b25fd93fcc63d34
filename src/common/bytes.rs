use crate::common::error::{DecodeError, DecodeErrorKind};
use std::mem::size_of;

/// A fixed-width integer that can be decoded from little-endian bytes.
pub trait FromBytes: Sized {
    /// `bytes` is always exactly `size_of::<Self>()` long.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

/// A fixed-width integer that can be encoded as little-endian bytes.
pub trait ToBytes: Copy {
    fn to_le_slice(self, buf: &mut [u8]);
}

macro_rules! impl_bytes {
    ($($ty:ty)+) => {
        $(
        impl FromBytes for $ty {
            #[inline]
            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0; size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }

        impl ToBytes for $ty {
            #[inline]
            fn to_le_slice(self, buf: &mut [u8]) {
                buf.copy_from_slice(&self.to_le_bytes());
            }
        }
        )+
    };
}

impl_bytes![
    i8 i16 i32 i64
    u8 u16 u32 u64
];

/// Forward-only cursor over a borrowed byte buffer.
///
/// Every read is bounds checked; running past the end of the buffer yields
/// [`DecodeErrorKind::UnexpectedEnd`] and leaves the cursor where it was.
#[derive(Copy, Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    pub fn skip_bytes(&mut self, n: usize) -> Result<(), DecodeError> {
        self.take_slice(n).map(|_| ())
    }

    #[inline]
    pub fn take<T: FromBytes>(&mut self) -> Result<T, DecodeError> {
        self.take_slice(size_of::<T>()).map(T::from_le_slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.take()
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.take()
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.take()
    }

    /// Reads an opaque 32-bit identifier. The value is not interpreted here.
    pub fn read_id(&mut self) -> Result<i32, DecodeError> {
        self.read_i32()
    }

    /// Reads a 32-bit length prefix, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset;
        let len = self.read_i32()?;
        usize::try_from(len)
            .map_err(|_| DecodeError::new(offset, DecodeErrorKind::NegativeLength(len)))
    }

    pub fn read_byte_array(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_len()?;
        self.take_slice(len).map(<[u8]>::to_vec)
    }

    pub fn read_string_content(&mut self, len: usize) -> Result<String, DecodeError> {
        let offset = self.offset;
        let bytes = self.take_slice(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::new(offset, DecodeErrorKind::InvalidUtf8))
    }

    /// Runs `f` and rewinds the cursor afterwards.
    pub fn at_checkpoint<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = self.offset;
        let ret = f(self);
        self.offset = prev;
        ret
    }

    fn take_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if len > available {
            return Err(DecodeError::new(
                self.offset,
                DecodeErrorKind::UnexpectedEnd {
                    needed: len,
                    available,
                },
            ));
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }
}

/// Append-only byte buffer with in-place patching of earlier writes.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(&self.buf)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn push<T: ToBytes>(&mut self, value: T) {
        let len = self.buf.len();
        self.buf.resize(len + size_of::<T>(), 0);
        value.to_le_slice(&mut self.buf[len..]);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites a value written earlier. `index + size_of::<T>()` must not
    /// exceed the current length.
    pub fn write_at<T: ToBytes>(&mut self, index: usize, value: T) {
        let end = index + size_of::<T>();
        assert!(
            end <= self.buf.len(),
            "write_at {index}..{end} is past the end of a {} byte buffer",
            self.buf.len()
        );
        value.to_le_slice(&mut self.buf[index..end]);
    }

    #[must_use]
    pub fn into_inner(self) -> Box<[u8]> {
        self.buf.into_boxed_slice()
    }
}
