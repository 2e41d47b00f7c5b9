//! MD5 name-based UUID (version 3)

use md5::{Digest, Md5};
use std::{fmt, str};

use crate::{Error, Uuid};

/// A UUID version 3: the MD5 digest of a namespace UUID concatenated with a
/// name, with the version and variant bits overwritten.
///
/// Derivation is a pure function; the same namespace and name always yield
/// the same UUID.
///
/// # Examples
///
/// ```rust
/// use idkit::{Uuid, UuidV3};
///
/// let a = UuidV3::new(Uuid::NAMESPACE_DNS, b"example.com");
/// let b = UuidV3::new(Uuid::NAMESPACE_DNS, b"example.com");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV3(Uuid);

impl UuidV3 {
    /// The version nibble carried in byte 6.
    pub const VERSION: u8 = 3;

    pub(crate) const fn new_unchecked(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Derives a UUIDv3 from a namespace UUID and a name.
    pub fn new(namespace: Uuid, name: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(namespace.as_bytes());
        hasher.update(name);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest);
        bytes[6] = (bytes[6] & 0x0f) | 0x30;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(Uuid::from(bytes))
    }

    /// Wraps a UUID whose version nibble must be 3.
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

    /// Creates a UUIDv3 from a 16-byte slice, checking the version nibble.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).and_then(Self::from_uuid)
    }

    /// Creates a UUIDv3 from the undashed hexadecimal form, checking the
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

impl fmt::Display for UuidV3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl str::FromStr for UuidV3 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().and_then(Self::from_uuid)
    }
}

impl From<UuidV3> for Uuid {
    fn from(src: UuidV3) -> Self {
        src.0
    }
}

#[cfg(test)]
mod tests {
    use super::UuidV3;
    use crate::{Error, Uuid};

    /// Derives the RFC 4122 sample value for the DNS namespace
    #[test]
    fn derives_the_rfc_4122_sample_value_for_the_dns_namespace() {
        let e = UuidV3::new(Uuid::NAMESPACE_DNS, b"python.org");
        assert_eq!(e.to_string(), "6fa459ea-ee8a-3ca4-894e-db77e160355e");
        assert_eq!(e.as_uuid().version(), 3);
        assert_eq!(e.as_uuid().variant(), 2);
    }

    /// Derives identical values for identical inputs
    #[test]
    fn derives_identical_values_for_identical_inputs() {
        let a = UuidV3::new(Uuid::NAMESPACE_DNS, b"example.com");
        let b = UuidV3::new(Uuid::NAMESPACE_DNS, b"example.com");
        assert_eq!(a, b);
    }

    /// Derives distinct values for distinct namespaces or names
    #[test]
    fn derives_distinct_values_for_distinct_namespaces_or_names() {
        let base = UuidV3::new(Uuid::NAMESPACE_DNS, b"example.com");
        assert_ne!(base, UuidV3::new(Uuid::NAMESPACE_DNS, b"example.org"));
        assert_ne!(base, UuidV3::new(Uuid::NAMESPACE_URL, b"example.com"));
        assert_ne!(base, UuidV3::new(Uuid::NAMESPACE_DNS, b""));
    }

    /// Round-trips through the canonical string form
    #[test]
    fn round_trips_through_the_canonical_string_form() {
        let e = UuidV3::new(Uuid::NAMESPACE_OID, b"1.3.6.1");
        assert_eq!(e.to_string().parse::<UuidV3>(), Ok(e));
        assert_eq!(UuidV3::from_bytes(e.as_uuid().as_bytes()), Ok(e));
        assert_eq!(UuidV3::from_hex(&e.as_uuid().to_hex()), Ok(e));
    }

    /// Rejects values of other versions
    #[test]
    fn rejects_values_of_other_versions() {
        assert_eq!(
            "886313e1-3b8a-5372-9b90-0c9aee199e5d".parse::<UuidV3>(),
            Err(Error::VersionMismatch {
                expected: 3,
                actual: 5
            })
        );
    }
}
