//! Unix-millisecond time UUID (version 7)

use rand::{rngs::OsRng, RngCore};
use std::{fmt, str};

use crate::{Context, Error, SystemContext, Uuid};

/// A UUID version 7: a 48-bit big-endian Unix millisecond timestamp followed
/// by 74 random bits.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          unix_ts_ms                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          unix_ts_ms           |  ver  |        rand_a         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |var|                        rand_b                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            rand_b                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Ten fresh random bytes fill bytes 6 through 15 on every call; there is no
/// per-millisecond counter, so byte order sorts by creation time only at
/// millisecond granularity.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV7(Uuid);

impl UuidV7 {
    /// The version nibble carried in byte 6.
    pub const VERSION: u8 = 7;

    pub(crate) const fn new_unchecked(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a UUIDv7 from the system clock and CSPRNG.
    pub fn generate() -> Self {
        let mut random = [0u8; 10];
        OsRng.fill_bytes(&mut random);
        let mut ctx = SystemContext::new();
        Self::from_parts(ctx.timestamp_ms(), random)
    }

    /// Generates a UUIDv7 from the given context's clock and randomness.
    pub fn generate_with<C: Context>(context: &mut C) -> Result<Self, Error> {
        let timestamp = context.timestamp_ms();
        let drawn = context.random_bytes(10)?;
        let random = <[u8; 10]>::try_from(drawn.as_slice()).map_err(|_| Error::Length {
            expected: 10,
            actual: drawn.len(),
        })?;
        Ok(Self::from_parts(timestamp, random))
    }

    fn from_parts(timestamp_ms: u64, random: [u8; 10]) -> Self {
        let ts = timestamp_ms;
        Self(Uuid::from([
            (ts >> 40) as u8,
            (ts >> 32) as u8,
            (ts >> 24) as u8,
            (ts >> 16) as u8,
            (ts >> 8) as u8,
            ts as u8,
            (random[0] & 0x0f) | 0x70,
            random[1],
            (random[2] & 0x3f) | 0x80,
            random[3],
            random[4],
            random[5],
            random[6],
            random[7],
            random[8],
            random[9],
        ]))
    }

    /// Wraps a UUID whose version nibble must be 7.
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

    /// Creates a UUIDv7 from a 16-byte slice, checking the version nibble.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).and_then(Self::from_uuid)
    }

    /// Creates a UUIDv7 from the undashed hexadecimal form, checking the
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

    /// Returns the embedded timestamp as milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> u64 {
        let b = self.0.as_bytes();
        u64::from(b[0]) << 40
            | u64::from(b[1]) << 32
            | u64::from(b[2]) << 24
            | u64::from(b[3]) << 16
            | u64::from(b[4]) << 8
            | u64::from(b[5])
    }

    /// Returns bytes 6 through 15 with the version nibble and variant bits
    /// masked back to zero.
    pub fn random_bytes(&self) -> [u8; 10] {
        let b = self.0.as_bytes();
        let mut random = [b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]];
        random[0] &= 0x0f;
        random[2] &= 0x3f;
        random
    }

    /// Returns the 12-bit `rand_a` field from bytes 6 and 7.
    pub fn random_a(&self) -> u16 {
        let b = self.0.as_bytes();
        u16::from(b[6] & 0x0f) << 8 | u16::from(b[7])
    }

    /// Returns the 62-bit `rand_b` field from bytes 8 through 15.
    pub fn random_b(&self) -> u64 {
        let b = self.0.as_bytes();
        let mut value = u64::from(b[8] & 0x3f) << 56;
        for (i, &byte) in b[9..16].iter().enumerate() {
            value |= u64::from(byte) << (8 * (6 - i));
        }
        value
    }
}

impl fmt::Display for UuidV7 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl str::FromStr for UuidV7 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().and_then(Self::from_uuid)
    }
}

impl From<UuidV7> for Uuid {
    fn from(src: UuidV7) -> Self {
        src.0
    }
}
