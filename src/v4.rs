//! Random UUID (version 4)

use std::{fmt, str};

use crate::{Context, Error, Uuid};

/// A UUID version 4: sixteen random bytes with the version nibble and variant
/// bits overwritten in place.
///
/// # Examples
///
/// ```rust
/// use idkit::UuidV4;
///
/// let uuid = UuidV4::generate();
/// println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV4(Uuid);

impl UuidV4 {
    /// The version nibble carried in byte 6.
    pub const VERSION: u8 = 4;

    pub(crate) const fn new_unchecked(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a UUIDv4 from the system CSPRNG.
    pub fn generate() -> Self {
        Self::from_random(rand::random())
    }

    /// Generates a UUIDv4 from the given context's randomness.
    pub fn generate_with<C: Context>(context: &mut C) -> Result<Self, Error> {
        let drawn = context.random_bytes(16)?;
        let random = <[u8; 16]>::try_from(drawn.as_slice()).map_err(|_| Error::Length {
            expected: 16,
            actual: drawn.len(),
        })?;
        Ok(Self::from_random(random))
    }

    fn from_random(mut bytes: [u8; 16]) -> Self {
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(Uuid::from(bytes))
    }

    /// Wraps a UUID whose version nibble must be 4.
    pub fn from_uuid(uuid: Uuid) -> Result<Self, Error> {
        if uuid.version() == Self::VERSION {
            Ok(Self(uuid))
        } else {
            Err(Error::VersionMismatch {
                expected: Self::VERSION,
                actual: uuid.version(),
            })
        }
    }

    /// Creates a UUIDv4 from a 16-byte slice, checking the version nibble.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).and_then(Self::from_uuid)
    }

    /// Creates a UUIDv4 from the undashed hexadecimal form, checking the
    /// version nibble.
    pub fn from_hex(src: &str) -> Result<Self, Error> {
        Uuid::from_hex(src).and_then(Self::from_uuid)
    }

    /// Returns the untyped UUID value.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the untyped UUID value by copy.
    pub const fn to_uuid(self) -> Uuid {
        self.0
    }

    /// Returns all 16 bytes as stored, version and variant bits included.
    pub const fn random_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Returns the 16 bytes with the version nibble and variant bits masked
    /// back to zero, i.e. the random input minus the overwritten tag bits.
    pub fn pure_random_bytes(&self) -> [u8; 16] {
        let mut bytes = self.0.to_bytes();
        bytes[6] &= 0x0f;
        bytes[8] &= 0x3f;
        bytes
    }
}

impl fmt::Display for UuidV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl str::FromStr for UuidV4 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().and_then(Self::from_uuid)
    }
}

impl From<UuidV4> for Uuid {
    fn from(src: UuidV4) -> Self {
        src.0
    }
}
