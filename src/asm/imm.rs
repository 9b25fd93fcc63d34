use crate::asm::error::EncodingViolation;

/// An immediate known to fit `BITS` bits as a two's complement value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SignedImm<const BITS: u32>(i32);

impl<const BITS: u32> SignedImm<BITS> {
    pub const MIN: i32 = -(1 << (BITS - 1));
    pub const MAX: i32 = (1 << (BITS - 1)) - 1;

    pub fn new(value: i32) -> Result<Self, EncodingViolation> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EncodingViolation::ImmediateOutOfRange {
                bits: BITS,
                signed: true,
                value: i64::from(value),
            })
        }
    }

    #[must_use]
    pub fn value(self) -> i32 {
        self.0
    }

    /// The low `BITS` bits, ready to be shifted into place.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn bits(self) -> u32 {
        (self.0 as u32) & mask(BITS)
    }
}

/// An immediate known to fit `BITS` bits unsigned.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UnsignedImm<const BITS: u32>(u32);

impl<const BITS: u32> UnsignedImm<BITS> {
    pub const MAX: u32 = mask(BITS);

    pub fn new(value: u32) -> Result<Self, EncodingViolation> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(EncodingViolation::ImmediateOutOfRange {
                bits: BITS,
                signed: false,
                value: i64::from(value),
            })
        }
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn mask(bits: u32) -> u32 {
    ((1u64 << bits) - 1) as u32
}

/// Validates a raw field value against its width and returns it unchanged.
pub(crate) fn field<const BITS: u32>(value: u32) -> Result<u32, EncodingViolation> {
    UnsignedImm::<BITS>::new(value).map(UnsignedImm::bits)
}

pub(crate) fn flag(value: bool) -> u32 {
    u32::from(value)
}
