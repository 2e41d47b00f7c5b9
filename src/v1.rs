//! Gregorian-time UUID (version 1)

use rand::{rngs::OsRng, RngCore};
use std::{fmt, str};

use crate::context::GREGORIAN_EPOCH_OFFSET;
use crate::{Context, Error, SystemContext, Uuid};

/// A UUID version 1: a 60-bit Gregorian timestamp in the classic
/// time_low/time_mid/time_hi field order, a 14-bit clock sequence, and a
/// 48-bit node.
///
/// The clock sequence and node are derived from eight random bytes rather than
/// a MAC address; the node's multicast bit is forced on, as RFC 4122 requires
/// for random nodes.
///
/// # Examples
///
/// ```rust
/// use idkit::UuidV1;
///
/// let uuid = UuidV1::generate();
/// assert_eq!(uuid.as_uuid().version(), 1);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV1(Uuid);

impl UuidV1 {
    /// The version nibble carried in byte 6.
    pub const VERSION: u8 = 1;

    pub(crate) const fn new_unchecked(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a UUIDv1 from the system clock and CSPRNG.
    pub fn generate() -> Self {
        let mut random = [0u8; 8];
        OsRng.fill_bytes(&mut random);
        let mut ctx = SystemContext::new();
        Self::from_parts(ctx.gregorian_epoch_time(), random)
    }

    /// Generates a UUIDv1 from the given context's clock and randomness.
    pub fn generate_with<C: Context>(context: &mut C) -> Result<Self, Error> {
        let timestamp = context.gregorian_epoch_time();
        let drawn = context.random_bytes(8)?;
        let random = <[u8; 8]>::try_from(drawn.as_slice()).map_err(|_| Error::Length {
            expected: 8,
            actual: drawn.len(),
        })?;
        Ok(Self::from_parts(timestamp, random))
    }

    /// Packs a 100-nanosecond Gregorian timestamp and eight random bytes
    /// (two for the clock sequence, six for the node) into the v1 layout.
    fn from_parts(timestamp_100ns: u64, random: [u8; 8]) -> Self {
        let ts = timestamp_100ns;
        let clock_seq = (u16::from(random[0]) << 8 | u16::from(random[1])) & 0x3fff;
        let mut node = [random[2], random[3], random[4], random[5], random[6], random[7]];
        node[0] |= 0x01; // multicast bit marks the node as not a MAC address

        Self(Uuid::from([
            (ts >> 24) as u8,
            (ts >> 16) as u8,
            (ts >> 8) as u8,
            ts as u8,
            (ts >> 40) as u8,
            (ts >> 32) as u8,
            ((ts >> 56) as u8 & 0x0f) | 0x10,
            (ts >> 48) as u8,
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

    /// Wraps a UUID whose version nibble must be 1.
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

    /// Creates a UUIDv1 from a 16-byte slice, checking the version nibble.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Uuid::from_bytes(bytes).and_then(Self::from_uuid)
    }

    /// Creates a UUIDv1 from the undashed hexadecimal form, checking the
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
    pub fn timestamp_ms(&self) -> u64 {
        let b = self.0.as_bytes();
        let time_low = u64::from(b[0]) << 24
            | u64::from(b[1]) << 16
            | u64::from(b[2]) << 8
            | u64::from(b[3]);
        let time_mid = u64::from(b[4]) << 8 | u64::from(b[5]);
        let time_hi = u64::from(b[6] & 0x0f) << 8 | u64::from(b[7]);
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

impl fmt::Display for UuidV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl str::FromStr for UuidV1 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Uuid>().and_then(Self::from_uuid)
    }
}

impl From<UuidV1> for Uuid {
    fn from(src: UuidV1) -> Self {
        src.0
    }
}

#[cfg(test)]
mod tests {
    use super::UuidV1;
    use crate::{Error, FixedContext};

    const TS: u64 = 1_640_995_200_000;

    /// Sets correct version and variant bits
    #[test]
    fn sets_correct_version_and_variant_bits() {
        for _ in 0..1_000 {
            let e = UuidV1::generate();
            assert_eq!(e.as_uuid().version(), 1);
            assert_eq!(e.as_uuid().variant(), 2);
        }
    }

    /// Recovers the millisecond timestamp exactly
    #[test]
    fn recovers_the_millisecond_timestamp_exactly() {
        let mut ctx = FixedContext::new(TS, 12345);
        let e = UuidV1::generate_with(&mut ctx).unwrap();
        assert_eq!(e.timestamp_ms(), TS);

        ctx.advance_time_secs(3600);
        let e = UuidV1::generate_with(&mut ctx).unwrap();
        assert_eq!(e.timestamp_ms(), TS + 3_600_000);
    }

    /// Forces the multicast bit on the random node
    #[test]
    fn forces_the_multicast_bit_on_the_random_node() {
        for _ in 0..100 {
            assert_eq!(UuidV1::generate().node()[0] & 0x01, 0x01);
        }
        let e = UuidV1::generate_with(&mut FixedContext::new(TS, 7)).unwrap();
        assert_eq!(e.node()[0] & 0x01, 0x01);
    }

    /// Keeps the clock sequence within 14 bits
    #[test]
    fn keeps_the_clock_sequence_within_14_bits() {
        for seed in 0..100u32 {
            let e = UuidV1::generate_with(&mut FixedContext::new(TS, seed)).unwrap();
            assert!(e.clock_sequence() <= 0x3fff);
        }
    }

    /// Reproduces identical values from identically seeded contexts
    #[test]
    fn reproduces_identical_values_from_identically_seeded_contexts() {
        let a = UuidV1::generate_with(&mut FixedContext::new(TS, 99)).unwrap();
        let b = UuidV1::generate_with(&mut FixedContext::new(TS, 99)).unwrap();
        assert_eq!(a, b);

        let c = UuidV1::generate_with(&mut FixedContext::new(TS, 100)).unwrap();
        assert_ne!(a, c);
    }

    /// Round-trips through the canonical string form
    #[test]
    fn round_trips_through_the_canonical_string_form() {
        let e = UuidV1::generate();
        assert_eq!(e.to_string().parse::<UuidV1>(), Ok(e));
        assert_eq!(UuidV1::from_bytes(e.as_uuid().as_bytes()), Ok(e));
        assert_eq!(UuidV1::from_hex(&e.as_uuid().to_hex()), Ok(e));
    }

    /// Rejects values of other versions
    #[test]
    fn rejects_values_of_other_versions() {
        assert_eq!(
            "017f22e2-79b0-7cc3-98c4-dc0c0c07398f".parse::<UuidV1>(),
            Err(Error::VersionMismatch {
                expected: 1,
                actual: 7
            })
        );
    }
}
