use crate::common::{ByteWriter, FromBytes};

/// Growing machine-code buffer. Instructions are stored little-endian.
#[derive(Debug, Default)]
pub struct AssemblerBuffer {
    code: ByteWriter,
}

impl AssemblerBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Appends one instruction word and returns the offset it was placed at.
    pub fn emit_u32(&mut self, word: u32) -> usize {
        let offset = self.code.len();
        self.code.push(word);
        offset
    }

    /// Overwrites the instruction previously emitted at `offset`.
    pub fn patch_u32(&mut self, offset: usize, word: u32) {
        self.code.write_at(offset, word);
    }

    #[must_use]
    pub fn read_u32(&self, offset: usize) -> Option<u32> {
        self.code
            .as_slice()
            .get(offset..offset + 4)
            .map(u32::from_le_slice)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.code.as_slice()
    }

    #[must_use]
    pub fn into_bytes(self) -> Box<[u8]> {
        self.code.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_returns_offsets() {
        let mut buf = AssemblerBuffer::new();
        assert_eq!(buf.emit_u32(0xd65f_03c0), 0);
        assert_eq!(buf.emit_u32(0x1111_1111), 4);
        assert_eq!(buf.len(), 8);
        assert_eq!(&buf.as_slice()[..4], &[0xc0, 0x03, 0x5f, 0xd6]);
    }

    #[test]
    fn patch_in_place() {
        let mut buf = AssemblerBuffer::new();
        buf.emit_u32(0);
        buf.emit_u32(0x1111_1111);
        buf.patch_u32(0, 0xffff_ffff);
        assert_eq!(buf.read_u32(0), Some(0xffff_ffff));
        assert_eq!(buf.read_u32(4), Some(0x1111_1111));
        assert_eq!(buf.read_u32(8), None);
    }
}
