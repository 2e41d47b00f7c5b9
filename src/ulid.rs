//! ULID generation, monotonic state, and the 26-character Crockford form

use std::{fmt, str, sync};

use crate::codec::BASE32_CROCKFORD;
use crate::{Bit128, Context, Error, SystemContext};

const TIMESTAMP_BYTES: usize = 6;
const RANDOMNESS_BYTES: usize = 10;
const STRING_LENGTH: usize = 26;

/// Represents a Universally Unique Lexicographically Sortable IDentifier.
///
/// A ULID packs a 48-bit big-endian millisecond timestamp into bytes 0
/// through 5 and 80 bits of randomness into bytes 6 through 15. Its canonical
/// text form is 26 Crockford Base32 characters, uppercase on encode and
/// case-insensitive on decode, and both the byte and the string orderings
/// follow creation time.
///
/// # Examples
///
/// ```rust
/// use idkit::Ulid;
///
/// let ulid = Ulid::generate();
/// let text = ulid.to_string(); // e.g. "01ARZ3NDEKTSV4RRFFQ69G5FAV"
/// assert_eq!(text.parse::<Ulid>(), Ok(ulid));
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Ulid(Bit128);

impl Ulid {
    /// Generates a ULID from the system clock and CSPRNG.
    ///
    /// This routes through the process-wide monotonic state: repeated calls
    /// within one millisecond reuse the previous randomness incremented by
    /// one, so identifiers generated by one process always sort in creation
    /// order within a timestamp.
    pub fn generate() -> Self {
        lock_global_gen()
            .generate(&mut SystemContext::new())
            .expect("idkit: could not draw system randomness")
    }

    /// Generates a ULID from the given context's clock and randomness.
    ///
    /// The process-wide monotonic state is shared with [`Ulid::generate`];
    /// use a private [`UlidGenerator`] to keep test sequences isolated.
    pub fn generate_with<C: Context>(context: &mut C) -> Result<Self, Error> {
        lock_global_gen().generate(context)
    }

    /// Packs a millisecond timestamp and ten random bytes into a ULID.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp_ms` does not fit in 48 bits.
    pub const fn from_parts(timestamp_ms: u64, randomness: [u8; 10]) -> Self {
        if timestamp_ms >= 1 << 48 {
            panic!("`timestamp_ms` must fit in 48 bits");
        }

        let ts = timestamp_ms;
        Self(Bit128::new([
            (ts >> 40) as u8,
            (ts >> 32) as u8,
            (ts >> 24) as u8,
            (ts >> 16) as u8,
            (ts >> 8) as u8,
            ts as u8,
            randomness[0],
            randomness[1],
            randomness[2],
            randomness[3],
            randomness[4],
            randomness[5],
            randomness[6],
            randomness[7],
            randomness[8],
            randomness[9],
        ]))
    }

    /// Creates a ULID from a byte slice that must be exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Bit128::from_bytes(bytes).map(Self)
    }

    /// Creates a ULID from a 32-digit hexadecimal string, ignoring dashes.
    pub fn from_hex(src: &str) -> Result<Self, Error> {
        let undashed: String = src.chars().filter(|&c| c != '-').collect();
        Bit128::from_hex(&undashed).map(Self)
    }

    /// Returns the 32-character lowercase hexadecimal form without dashes.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Returns the embedded timestamp as milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> u64 {
        let b = self.0.as_bytes();
        let mut timestamp = 0u64;
        for &byte in &b[..TIMESTAMP_BYTES] {
            timestamp = timestamp << 8 | u64::from(byte);
        }
        timestamp
    }

    /// Returns the 80-bit randomness from bytes 6 through 15.
    pub fn randomness(&self) -> [u8; 10] {
        let b = self.0.as_bytes();
        let mut randomness = [0u8; RANDOMNESS_BYTES];
        randomness.copy_from_slice(&b[TIMESTAMP_BYTES..]);
        randomness
    }

    /// Returns the underlying plain 128-bit value.
    pub const fn as_bit128(&self) -> Bit128 {
        self.0
    }
}

impl fmt::Display for Ulid {
    /// Returns the canonical 26-character Crockford Base32 representation.
    ///
    /// The 128 bits are sliced directly into 26 five-bit groups (the top two
    /// bits of the first symbol are zero); this fixed-width packing is
    /// deliberately separate from the arbitrary-precision
    /// [`Codec`](crate::Codec) algorithm, since 128 is not a multiple of 5.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alphabet = BASE32_CROCKFORD.as_bytes();
        let value = u128::from_be_bytes(self.0.to_bytes());

        let mut buffer = [0u8; STRING_LENGTH];
        for (i, e) in buffer.iter_mut().enumerate() {
            let shift = 5 * (STRING_LENGTH - 1 - i);
            *e = alphabet[(value >> shift & 0x1f) as usize];
        }
        debug_assert!(buffer.is_ascii());
        f.write_str(unsafe { str::from_utf8_unchecked(&buffer) })
    }
}

impl str::FromStr for Ulid {
    type Err = Error;

    /// Creates a ULID from its 26-character Crockford Base32 representation.
    ///
    /// Decoding accepts lower- and uppercase symbols.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if src.len() != STRING_LENGTH {
            return Err(Error::Format("ULID form must be exactly 26 characters"));
        }

        let mut lookup = [-1i16; 256];
        for (value, &symbol) in BASE32_CROCKFORD.as_bytes().iter().enumerate() {
            lookup[symbol as usize] = value as i16;
            lookup[symbol.to_ascii_lowercase() as usize] = value as i16;
        }

        let mut value = 0u128;
        for &symbol in src.as_bytes() {
            let digit = lookup[symbol as usize];
            if digit < 0 {
                return Err(Error::Format("invalid character in ULID"));
            }
            value = value << 5 | digit as u128;
        }
        Ok(Self(Bit128::new(value.to_be_bytes())))
    }
}

impl From<Ulid> for String {
    fn from(src: Ulid) -> Self {
        src.to_string()
    }
}

impl From<[u8; 16]> for Ulid {
    fn from(src: [u8; 16]) -> Self {
        Self(Bit128::new(src))
    }
}

impl From<Ulid> for [u8; 16] {
    fn from(src: Ulid) -> Self {
        src.to_bytes()
    }
}

impl From<Bit128> for Ulid {
    fn from(src: Bit128) -> Self {
        Self(src)
    }
}

impl From<Ulid> for Bit128 {
    fn from(src: Ulid) -> Self {
        src.0
    }
}

impl AsRef<[u8]> for Ulid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encapsulates the monotonic state of a ULID sequence: the timestamp and
/// randomness of the most recent identifier.
///
/// A process-wide instance backs [`Ulid::generate`] and
/// [`Ulid::generate_with`]; a private instance gives a test its own isolated
/// sequence.
///
/// # Examples
///
/// ```rust
/// use idkit::{FixedContext, UlidGenerator};
///
/// let mut g = UlidGenerator::new();
/// let mut ctx = FixedContext::new(1_640_995_200_000, 42);
/// let first = g.generate(&mut ctx).unwrap();
/// let second = g.generate(&mut ctx).unwrap();
/// assert!(first.to_string() < second.to_string());
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct UlidGenerator {
    last_timestamp: u64,
    last_randomness: [u8; RANDOMNESS_BYTES],
    initialized: bool,
}

impl UlidGenerator {
    /// Creates a generator with no recorded state.
    pub const fn new() -> Self {
        Self {
            last_timestamp: 0,
            last_randomness: [0; RANDOMNESS_BYTES],
            initialized: false,
        }
    }

    /// Generates a ULID from the given context, maintaining the monotonic
    /// order of identifiers generated within the same millisecond.
    ///
    /// When the context reports the same millisecond as the previous call,
    /// the previous randomness is reused and incremented as an 80-bit
    /// big-endian counter (an all-`0xff` field silently wraps to zero);
    /// otherwise ten fresh random bytes are drawn. The recorded state is
    /// updated on every call.
    pub fn generate<C: Context>(&mut self, context: &mut C) -> Result<Ulid, Error> {
        let timestamp = context.timestamp_ms();

        let randomness = if self.initialized && timestamp == self.last_timestamp {
            increment_randomness(self.last_randomness)
        } else {
            let drawn = context.random_bytes(RANDOMNESS_BYTES)?;
            <[u8; RANDOMNESS_BYTES]>::try_from(drawn.as_slice()).map_err(|_| Error::Length {
                expected: RANDOMNESS_BYTES,
                actual: drawn.len(),
            })?
        };

        self.last_timestamp = timestamp;
        self.last_randomness = randomness;
        self.initialized = true;

        Ok(Ulid::from_parts(timestamp, randomness))
    }
}

/// Treats the 80-bit randomness as a big-endian counter and adds one, letting
/// the carry propagate leftward.
fn increment_randomness(mut randomness: [u8; 10]) -> [u8; 10] {
    for byte in randomness.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
    randomness
}

/// Returns the lock handle of the process-wide generator, creating one if
/// none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, UlidGenerator> {
    static G: sync::OnceLock<sync::Mutex<UlidGenerator>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("idkit: could not lock global ULID generator")
}

/// Generates a ULID object.
///
/// This function employs a process-wide generator and guarantees the
/// monotonic order of ULIDs generated within the same millisecond.
///
/// # Examples
///
/// ```rust
/// let ulid = idkit::ulid();
/// println!("{}", ulid); // e.g. "01ARZ3NDEKTSV4RRFFQ69G5FAV"
/// println!("{:?}", ulid.as_bytes()); // as 16-byte big-endian array
/// ```
pub fn ulid() -> Ulid {
    Ulid::generate()
}

#[cfg(test)]
mod tests {
    use super::{increment_randomness, Ulid, UlidGenerator};
    use crate::{Context, Error, FixedContext};

    const TS: u64 = 1_640_995_200_000;

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        let cases: &[([u8; 16], &str)] = &[
            ([0; 16], "00000000000000000000000000"),
            ([0xff; 16], "7ZZZZZZZZZZZZZZZZZZZZZZZZZ"),
            (
                [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
                "00041061050R3GG28A1C60T3GF",
            ),
        ];

        for (bytes, text) in cases {
            let e = Ulid::from(*bytes);
            assert_eq!(&e.to_string(), text);
            assert_eq!(text.parse::<Ulid>(), Ok(e));
            assert_eq!(text.to_lowercase().parse::<Ulid>(), Ok(e));
        }
    }

    /// Round-trips strings, bytes, and hex forms
    #[test]
    fn round_trips_strings_bytes_and_hex_forms() {
        let e = Ulid::generate();
        assert_eq!(e.to_string().parse::<Ulid>(), Ok(e));
        assert_eq!(Ulid::from_bytes(e.as_bytes()), Ok(e));
        assert_eq!(Ulid::from_hex(&e.to_hex()), Ok(e));
        assert_eq!(e.to_string().len(), 26);
    }

    /// Accepts dashed hex input
    #[test]
    fn accepts_dashed_hex_input() {
        let e = Ulid::from_hex("017f22e2-79b0-7cc3-98c4-dc0c0c07398f").unwrap();
        assert_eq!(e.to_hex(), "017f22e279b07cc398c4dc0c0c07398f");
        assert!(Ulid::from_hex("017f22e2-79b0").is_err());
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            "0123456789",
            "01ARZ3NDEKTSV4RRFFQ69G5FA",
            "01ARZ3NDEKTSV4RRFFQ69G5FAVX",
            "01ARZ3NDEKTSV4RRFFQ69G5FAU",
            "01ARZ3NDEKTSV4RRFFQ69G5FA!",
            "-1ARZ3NDEKTSV4RRFFQ69G5FAV",
        ];

        for e in cases {
            assert!(e.parse::<Ulid>().is_err(), "{:?}", e);
        }
    }

    /// Slices the timestamp and randomness fields
    #[test]
    fn slices_the_timestamp_and_randomness_fields() {
        let randomness = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let e = Ulid::from_parts(TS, randomness);
        assert_eq!(e.timestamp_ms(), TS);
        assert_eq!(e.randomness(), randomness);
        assert_eq!(&e.as_bytes()[..6], &TS.to_be_bytes()[2..]);
    }

    /// Increments the randomness within the same millisecond
    #[test]
    fn increments_the_randomness_within_the_same_millisecond() {
        let mut g = UlidGenerator::new();
        let mut ctx = FixedContext::new(TS, 12345);

        let first = g.generate(&mut ctx).unwrap();
        let second = g.generate(&mut ctx).unwrap();
        let third = g.generate(&mut ctx).unwrap();

        assert_eq!(second.randomness(), increment_randomness(first.randomness()));
        assert_eq!(third.randomness(), increment_randomness(second.randomness()));
        assert_eq!(first.timestamp_ms(), second.timestamp_ms());
        assert!(first.to_string() < second.to_string());
        assert!(second.to_string() < third.to_string());
        assert!(first < second && second < third);
    }

    /// Draws fresh randomness when the timestamp advances
    #[test]
    fn draws_fresh_randomness_when_the_timestamp_advances() {
        let mut g = UlidGenerator::new();
        let mut ctx = FixedContext::new(TS, 12345);

        let first = g.generate(&mut ctx).unwrap();
        ctx.advance_time(1);
        let second = g.generate(&mut ctx).unwrap();

        // The fresh draw is the context's next deterministic draw, not an
        // increment of the previous randomness.
        let mut replay = FixedContext::new(TS, 12345 + 10);
        let expected: [u8; 10] = replay.random_bytes(10).unwrap().try_into().unwrap();
        assert_eq!(second.randomness(), expected);
        assert_eq!(second.timestamp_ms(), first.timestamp_ms() + 1);
        assert!(first.to_string() < second.to_string());
    }

    /// Wraps an all-ff randomness to zero on increment
    #[test]
    fn wraps_an_all_ff_randomness_to_zero_on_increment() {
        struct AllOnes(u64);

        impl Context for AllOnes {
            fn timestamp_ms(&mut self) -> u64 {
                self.0
            }

            fn random_bytes(&mut self, len: usize) -> Result<Vec<u8>, Error> {
                Ok(vec![0xff; len])
            }
        }

        let mut g = UlidGenerator::new();
        let mut ctx = AllOnes(TS);
        let first = g.generate(&mut ctx).unwrap();
        assert_eq!(first.randomness(), [0xff; 10]);

        let second = g.generate(&mut ctx).unwrap();
        assert_eq!(second.randomness(), [0x00; 10]);

        // Carry propagation stops at the first byte that does not overflow.
        let mut mixed = [0xffu8; 10];
        mixed[4] = 0x7f;
        let mut expected = [0u8; 10];
        expected[..4].copy_from_slice(&[0xff; 4]);
        expected[4] = 0x80;
        assert_eq!(increment_randomness(mixed), expected);
    }

    /// Generates sortable identifiers from the process-wide generator
    #[test]
    fn generates_sortable_identifiers_from_the_process_wide_generator() {
        let samples: Vec<String> = (0..10_000).map(|_| super::ulid().to_string()).collect();

        use std::collections::HashSet;
        let distinct: HashSet<&String> = samples.iter().collect();
        assert_eq!(distinct.len(), samples.len());

        let pattern = r"^[0-9A-HJKMNP-TV-Z]{26}$";
        let re = regex::Regex::new(pattern).unwrap();
        for e in &samples {
            assert!(re.is_match(e));
        }
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time::{SystemTime, UNIX_EPOCH};
        for _ in 0..1_000 {
            let ts_now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis() as i64;
            let e = Ulid::generate();
            assert!((ts_now - e.timestamp_ms() as i64).abs() < 16);
        }
    }

    mod properties {
        use super::Ulid;
        use proptest::prelude::*;

        proptest! {
            /// Round-trips arbitrary values through the canonical string form
            #[test]
            fn round_trips_arbitrary_values_through_the_canonical_string_form(
                bytes in any::<[u8; 16]>()
            ) {
                let e = Ulid::from(bytes);
                prop_assert_eq!(e.to_string().parse::<Ulid>(), Ok(e));
                prop_assert_eq!(
                    e.to_string().to_lowercase().parse::<Ulid>(),
                    Ok(e)
                );
            }

            /// Preserves byte order in the string order
            #[test]
            fn preserves_byte_order_in_the_string_order(
                a in any::<[u8; 16]>(),
                b in any::<[u8; 16]>()
            ) {
                let (x, y) = (Ulid::from(a), Ulid::from(b));
                prop_assert_eq!(x.cmp(&y), x.to_string().cmp(&y.to_string()));
            }
        }
    }
}
