//! SHA-1 name-based UUID (version 5)

use sha1::{Digest, Sha1};
use std::{fmt, str};

use crate::{Error, Uuid};

/// A UUID version 5: the SHA-1 digest of a namespace UUID concatenated with a
/// name, truncated to 16 bytes, with the version and variant bits overwritten.
///
/// Like [`UuidV3`](crate::UuidV3) this is a pure function of its inputs; v5 is
/// the preferred name-based version since SHA-1 replaces MD5.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV5(Uuid);

impl UuidV5 {
    /// The version nibble carried in byte 6.
    pub const VERSION: u8 = 5;

    pub(crate) const fn new_unchecked(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Derives a UUIDv5 from a namespace UUID and a name.
    pub fn new(namespace: Uuid, name: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(namespace.as_bytes());
        hasher.update(name);
        let digest = hasher.finalize();

        // SHA-1 yields 20 bytes; the UUID keeps the first 16.
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        bytes[6] = (bytes[6] & 0x0f) | 0x50;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(Uuid::from(bytes))
    }

    /// Wraps a UUID whose version nibble must be 5.
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

    /// Creates a UUIDv5 from a 16-byte slice, checking the version nibble.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).and_then(Self::from_uuid)
    }

    /// Creates a UUIDv5 from the undashed hexadecimal form, checking the
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
}

impl fmt::Display for UuidV5 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl str::FromStr for UuidV5 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().and_then(Self::from_uuid)
    }
}

impl From<UuidV5> for Uuid {
    fn from(src: UuidV5) -> Self {
        src.0
    }
}
