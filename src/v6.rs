//! Reordered Gregorian-time UUID (version 6)

use rand::{rngs::OsRng, RngCore};
use std::{fmt, str};

use crate::context::GREGORIAN_EPOCH_OFFSET;
use crate::{Context, Error, SystemContext, Uuid};

/// A UUID version 6: the v1 timestamp fields rearranged from most to least
/// significant so that lexicographic byte order follows creation time at
/// millisecond granularity.
///
/// The clock sequence and node occupy the same byte positions as in
/// [`UuidV1`](crate::UuidV1) and follow the same derivation rules.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV6(Uuid);

impl UuidV6 {
    /// The version nibble carried in byte 6.
    pub const VERSION: u8 = 6;

    pub(crate) const fn new_unchecked(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a UUIDv6 from the system clock and CSPRNG.
    pub fn generate() -> Self {
        let mut random = [0u8; 8];
        OsRng.fill_bytes(&mut random);
        let mut ctx = SystemContext::new();
        Self::from_parts(ctx.gregorian_epoch_time(), random)
    }

    /// Generates a UUIDv6 from the given context's clock and randomness.
    pub fn generate_with<C: Context>(context: &mut C) -> Result<Self, Error> {
        let timestamp = context.gregorian_epoch_time();
        let drawn = context.random_bytes(8)?;
        let random = <[u8; 8]>::try_from(drawn.as_slice()).map_err(|_| Error::Length {
            expected: 8,
            actual: drawn.len(),
        })?;
        Ok(Self::from_parts(timestamp, random))
    }

    /// Packs the v1 field values and then shuffles the timestamp bytes into
    /// the high-to-low ordering.
    ///
    /// Timestamp bits 12 through 15 have no slot in this layout and are not
    /// encoded; [`timestamp_ms`](UuidV6::timestamp_ms) reads them back as
    /// zero.
    fn from_parts(timestamp_100ns: u64, random: [u8; 8]) -> Self {
        let ts = timestamp_100ns;
        let clock_seq = (u16::from(random[0]) << 8 | u16::from(random[1])) & 0x3fff;
        let mut node = [random[2], random[3], random[4], random[5], random[6], random[7]];
        node[0] |= 0x01; // multicast bit marks the node as not a MAC address

        Self(Uuid::from([
            (ts >> 56) as u8 & 0x0f,
            (ts >> 48) as u8,
            (ts >> 40) as u8,
            (ts >> 32) as u8,
            (ts >> 24) as u8,
            (ts >> 16) as u8,
            ((ts >> 8) as u8 & 0x0f) | 0x60,
            ts as u8,
            ((clock_seq >> 8) as u8 & 0x3f) | 0x80,
            clock_seq as u8,
            node[0],
            node[1],
            node[2],
            node[3],
            node[4],
            node[5],
        ]))
    }

    /// Wraps a UUID whose version nibble must be 6.
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

    /// Creates a UUIDv6 from a 16-byte slice, checking the version nibble.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).and_then(Self::from_uuid)
    }

    /// Creates a UUIDv6 from the undashed hexadecimal form, checking the
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

    /// Recovers the embedded timestamp as milliseconds since the Unix epoch.
    ///
    /// The four timestamp bits the layout does not encode read back as zero,
    /// so the recovered value can precede the generating timestamp by a few
    /// milliseconds.
    pub fn timestamp_ms(&self) -> u64 {
        let b = self.0.as_bytes();
        let time_hi = u64::from(b[0]) << 8 | u64::from(b[1]);
        let time_mid = u64::from(b[2]) << 8 | u64::from(b[3]);
        let time_low = u64::from(b[4]) << 24
            | u64::from(b[5]) << 16
            | u64::from(b[6] & 0x0f) << 8
            | u64::from(b[7]);
        let timestamp_100ns = (time_hi << 48) | (time_mid << 32) | time_low;
        (timestamp_100ns - GREGORIAN_EPOCH_OFFSET) / 10_000
    }

    /// Returns the 48-bit node from bytes 10 through 15.
    pub fn node(&self) -> [u8; 6] {
        let b = self.0.as_bytes();
        [b[10], b[11], b[12], b[13], b[14], b[15]]
    }

    /// Returns the 14-bit clock sequence from bytes 8 and 9.
    pub fn clock_sequence(&self) -> u16 {
        let b = self.0.as_bytes();
        u16::from(b[8] & 0x3f) << 8 | u16::from(b[9])
    }
}

impl fmt::Display for UuidV6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl str::FromStr for UuidV6 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().and_then(Self::from_uuid)
    }
}

impl From<UuidV6> for Uuid {
    fn from(src: UuidV6) -> Self {
        src.0
    }
}
