//! Base UUID type, version/variant extraction, and version dispatch

use std::{fmt, str};

use crate::{Bit128, Error, UuidV1, UuidV3, UuidV4, UuidV5, UuidV6, UuidV7};

/// Represents a Universally Unique IDentifier.
///
/// This is the version-agnostic 128-bit value: it carries the RFC 4122 byte
/// layout, the canonical 8-4-4-4-12 string form, and the version/variant tag
/// bits, but no version-specific field logic. Use [`AnyUuid`] or the typed
/// wrappers ([`UuidV1`], [`UuidV4`], ...) when the version matters.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid(Bit128);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self(Bit128::new([0x00; 16]));

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self(Bit128::new([0xff; 16]));

    /// RFC 4122 namespace for fully-qualified domain names.
    pub const NAMESPACE_DNS: Self = Self::from_u128(0x6ba7b810_9dad_11d1_80b4_00c04fd430c8);

    /// RFC 4122 namespace for URLs.
    pub const NAMESPACE_URL: Self = Self::from_u128(0x6ba7b811_9dad_11d1_80b4_00c04fd430c8);

    /// RFC 4122 namespace for ISO OIDs.
    pub const NAMESPACE_OID: Self = Self::from_u128(0x6ba7b812_9dad_11d1_80b4_00c04fd430c8);

    /// RFC 4122 namespace for X.500 distinguished names.
    pub const NAMESPACE_X500: Self = Self::from_u128(0x6ba7b814_9dad_11d1_80b4_00c04fd430c8);

    const fn from_u128(src: u128) -> Self {
        Self(Bit128::new(src.to_be_bytes()))
    }

    /// Returns the nil UUID, whose 16 bytes are all zero.
    pub const fn nil() -> Self {
        Self::NIL
    }

    /// Returns the max UUID, whose 16 bytes are all `0xff`.
    pub const fn max() -> Self {
        Self::MAX
    }

    /// Returns true if every byte is zero.
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Returns true if every byte is `0xff`.
    pub fn is_max(&self) -> bool {
        *self == Self::MAX
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Creates a UUID from a byte slice that must be exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Bit128::from_bytes(bytes).map(Self)
    }

    /// Creates a UUID from a 32-character hexadecimal string without dashes.
    pub fn from_hex(src: &str) -> Result<Self, Error> {
        Bit128::from_hex(src).map(Self)
    }

    /// Returns the 32-character lowercase hexadecimal form without dashes.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Returns the version number encoded in the upper nibble of byte 6.
    pub const fn version(&self) -> u8 {
        self.as_bytes()[6] >> 4
    }

    /// Returns the variant encoded in the top two bits of byte 8.
    ///
    /// All UUIDs produced by this crate use the RFC 4122 variant, value `2`
    /// (binary `10`).
    pub const fn variant(&self) -> u8 {
        self.as_bytes()[8] >> 6
    }

    /// Returns the underlying plain 128-bit value.
    pub const fn as_bit128(&self) -> Bit128 {
        self.0
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        let mut buffer = [0u8; 36];
        let mut buffer_iter = buffer.iter_mut();
        for (i, e) in self.as_bytes().iter().enumerate() {
            *buffer_iter.next().unwrap() = DIGITS[(e >> 4) as usize];
            *buffer_iter.next().unwrap() = DIGITS[(e & 15) as usize];
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buffer_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        f.write_str(unsafe { str::from_utf8_unchecked(&buffer) })
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates a UUID from the 8-4-4-4-12 hexadecimal string representation.
    ///
    /// Parsing is case-insensitive, but the length and the dash positions at
    /// offsets 8, 13, 18, and 23 are enforced strictly.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: Error = Error::Format("expected the 8-4-4-4-12 hexadecimal form");
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(Bit128::new(dst)))
        } else {
            Err(ERR)
        }
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(Bit128::new(src))
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.to_bytes()
    }
}

impl From<Bit128> for Uuid {
    fn from(src: Bit128) -> Self {
        Self(src)
    }
}

impl From<Uuid> for Bit128 {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        src.0.into()
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.into())
    }
}

/// A UUID tagged with its decoded version.
///
/// Construction inspects the version nibble and wraps the value in the
/// matching typed variant; nibbles other than 1, 3, 4, 5, 6, and 7 yield
/// [`Unknown`](AnyUuid::Unknown) with the plain [`Uuid`] payload.
///
/// # Examples
///
/// ```rust
/// use idkit::AnyUuid;
///
/// let parsed = "017f22e2-79b0-7cc3-98c4-dc0c0c07398f".parse::<AnyUuid>().unwrap();
/// assert!(matches!(parsed, AnyUuid::Version7(_)));
/// assert_eq!(parsed.version(), 7);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AnyUuid {
    /// Gregorian-time UUID (version 1).
    Version1(UuidV1),
    /// MD5 name-based UUID (version 3).
    Version3(UuidV3),
    /// Random UUID (version 4).
    Version4(UuidV4),
    /// SHA-1 name-based UUID (version 5).
    Version5(UuidV5),
    /// Reordered Gregorian-time UUID (version 6).
    Version6(UuidV6),
    /// Unix-millisecond time UUID (version 7).
    Version7(UuidV7),
    /// Any other version nibble, kept as an untyped value.
    Unknown(Uuid),
}

impl AnyUuid {
    /// Tags a UUID with its decoded version.
    pub fn from_uuid(uuid: Uuid) -> Self {
        match uuid.version() {
            1 => Self::Version1(UuidV1::new_unchecked(uuid)),
            3 => Self::Version3(UuidV3::new_unchecked(uuid)),
            4 => Self::Version4(UuidV4::new_unchecked(uuid)),
            5 => Self::Version5(UuidV5::new_unchecked(uuid)),
            6 => Self::Version6(UuidV6::new_unchecked(uuid)),
            7 => Self::Version7(UuidV7::new_unchecked(uuid)),
            _ => Self::Unknown(uuid),
        }
    }

    /// Creates a tagged UUID from a 16-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).map(Self::from_uuid)
    }

    /// Creates a tagged UUID from the undashed hexadecimal form.
    pub fn from_hex(src: &str) -> Result<Self, Error> {
        Uuid::from_hex(src).map(Self::from_uuid)
    }

    /// Returns the untyped UUID value.
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Version1(e) => e.to_uuid(),
            Self::Version3(e) => e.to_uuid(),
            Self::Version4(e) => e.to_uuid(),
            Self::Version5(e) => e.to_uuid(),
            Self::Version6(e) => e.to_uuid(),
            Self::Version7(e) => e.to_uuid(),
            Self::Unknown(e) => *e,
        }
    }

    /// Returns the version nibble of the underlying value.
    pub fn version(&self) -> u8 {
        self.uuid().version()
    }
}

impl str::FromStr for AnyUuid {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().map(Self::from_uuid)
    }
}

impl fmt::Display for AnyUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uuid().fmt(f)
    }
}

impl From<AnyUuid> for Uuid {
    fn from(src: AnyUuid) -> Self {
        src.uuid()
    }
}
