//! Pluggable time and randomness sources for identifier generation

use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Error;

/// Offset between the Gregorian reform epoch (1582-10-15) and the Unix epoch
/// (1970-01-01), expressed in 100-nanosecond units (12 219 292 800 seconds).
pub const GREGORIAN_EPOCH_OFFSET: u64 = 122_192_928_000_000_000;

/// Largest number of bytes a single [`Context::random_bytes`] call may draw.
pub const MAX_RANDOM_BYTES: usize = 1024;

/// A source of timestamps and random bytes for identifier generation.
///
/// Generators accept any implementation, so tests can substitute a
/// deterministic [`FixedContext`] for the real clock and CSPRNG behind
/// [`SystemContext`].
pub trait Context {
    /// Returns the current timestamp in milliseconds since the Unix epoch.
    fn timestamp_ms(&mut self) -> u64;

    /// Returns the current timestamp in 100-nanosecond units since the
    /// Gregorian reform epoch (1582-10-15), as used by UUID versions 1 and 6.
    fn gregorian_epoch_time(&mut self) -> u64 {
        self.timestamp_ms() * 10_000 + GREGORIAN_EPOCH_OFFSET
    }

    /// Draws `len` random bytes, where `len` must be within `1..=1024`.
    fn random_bytes(&mut self, len: usize) -> Result<Vec<u8>, Error>;
}

fn check_random_len(len: usize) -> Result<(), Error> {
    if (1..=MAX_RANDOM_BYTES).contains(&len) {
        Ok(())
    } else {
        Err(Error::RandomLength(len))
    }
}

/// The real-world [`Context`]: wall clock plus the operating system CSPRNG.
///
/// The type is stateless and freely copyable; every instance behaves
/// identically. The wall clock is not monotonic and may move backward under
/// clock adjustment.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SystemContext;

impl SystemContext {
    /// Creates a system context.
    pub const fn new() -> Self {
        Self
    }
}

impl Context for SystemContext {
    fn timestamp_ms(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64
    }

    fn random_bytes(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        check_random_len(len)?;
        let mut buffer = vec![0u8; len];
        OsRng.fill_bytes(&mut buffer);
        Ok(buffer)
    }
}

/// A deterministic [`Context`] with an advanceable clock and a seeded
/// pseudo-random source, for tests and reproducible identifier generation.
///
/// Each [`random_bytes`](Context::random_bytes) call seeds a fresh ChaCha12
/// stream from the current random state, draws the requested bytes, and then
/// advances the state by the number of bytes drawn rather than by the internal
/// progression of the stream. Two contexts created with the same seed therefore
/// produce identical byte sequences, and a context that has drawn `n` bytes
/// from state `s` continues exactly like a fresh context seeded with `s + n`.
///
/// # Examples
///
/// ```rust
/// use idkit::{Context, FixedContext};
///
/// let mut a = FixedContext::new(1_640_995_200_000, 42);
/// let mut b = FixedContext::new(1_640_995_200_000, 42);
/// assert_eq!(a.random_bytes(16).unwrap(), b.random_bytes(16).unwrap());
///
/// a.advance_time(500).advance_time_secs(2);
/// assert_eq!(a.timestamp_ms(), 1_640_995_202_500);
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FixedContext {
    timestamp_ms: u64,
    seed: u32,
    random_state: u32,
}

impl FixedContext {
    /// Creates a context with a fixed timestamp and a random-state seed.
    pub const fn new(timestamp_ms: u64, seed: u32) -> Self {
        Self {
            timestamp_ms,
            seed,
            random_state: seed,
        }
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_time(&mut self, milliseconds: u64) -> &mut Self {
        self.timestamp_ms += milliseconds;
        self
    }

    /// Advances the clock by the given number of seconds.
    pub fn advance_time_secs(&mut self, seconds: u64) -> &mut Self {
        self.timestamp_ms += seconds * 1_000;
        self
    }

    /// Sets the clock to an exact millisecond timestamp.
    pub fn set_timestamp(&mut self, timestamp_ms: u64) -> &mut Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Returns the seed the context was created with.
    pub const fn seed(&self) -> u32 {
        self.seed
    }
}

impl Context for FixedContext {
    fn timestamp_ms(&mut self) -> u64 {
        self.timestamp_ms
    }

    fn random_bytes(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        check_random_len(len)?;
        let mut rng = ChaCha12Rng::seed_from_u64(u64::from(self.random_state));
        let mut buffer = vec![0u8; len];
        rng.fill_bytes(&mut buffer);
        // The state advances by the byte count, not by the stream position.
        self.random_state = self.random_state.wrapping_add(len as u32);
        Ok(buffer)
    }
}


#[cfg(test)]
mod tests_fixed {
    use super::{Context, FixedContext, GREGORIAN_EPOCH_OFFSET};
    use crate::Error;

    /// Reproduces identical bytes for identical seeds
    #[test]
    fn reproduces_identical_bytes_for_identical_seeds() {
        let mut a = FixedContext::new(1_640_995_200_000, 12345);
        let mut b = FixedContext::new(1_640_995_200_000, 12345);
        assert_eq!(a.random_bytes(16).unwrap(), b.random_bytes(16).unwrap());
        assert_eq!(a.random_bytes(10).unwrap(), b.random_bytes(10).unwrap());

        let mut c = FixedContext::new(1_640_995_200_000, 54321);
        assert_ne!(
            FixedContext::new(0, 12345).random_bytes(16).unwrap(),
            c.random_bytes(16).unwrap()
        );
    }

    /// Advances the random state by the number of bytes drawn
    #[test]
    fn advances_the_random_state_by_the_number_of_bytes_drawn() {
        let mut drained = FixedContext::new(0, 100);
        drained.random_bytes(16).unwrap();

        // A fresh context seeded 16 ahead continues the same sequence.
        let mut shifted = FixedContext::new(0, 116);
        assert_eq!(
            drained.random_bytes(10).unwrap(),
            shifted.random_bytes(10).unwrap()
        );
    }

    /// Moves the clock by milliseconds and seconds with chaining
    #[test]
    fn moves_the_clock_by_milliseconds_and_seconds_with_chaining() {
        let mut ctx = FixedContext::new(1_640_995_200_000, 0);
        assert_eq!(ctx.timestamp_ms(), 1_640_995_200_000);

        ctx.advance_time(500).advance_time_secs(3600);
        assert_eq!(ctx.timestamp_ms(), 1_640_998_800_500);

        ctx.set_timestamp(1_672_531_200_000);
        assert_eq!(ctx.timestamp_ms(), 1_672_531_200_000);
    }

    /// Converts the stored timestamp to Gregorian epoch time
    #[test]
    fn converts_the_stored_timestamp_to_gregorian_epoch_time() {
        let mut ctx = FixedContext::new(1_640_995_200_000, 0);
        assert_eq!(
            ctx.gregorian_epoch_time(),
            1_640_995_200_000 * 10_000 + GREGORIAN_EPOCH_OFFSET
        );

        let mut at_epoch = FixedContext::new(0, 0);
        assert_eq!(at_epoch.gregorian_epoch_time(), GREGORIAN_EPOCH_OFFSET);
    }

    /// Rejects out-of-range byte counts without touching the state
    #[test]
    fn rejects_out_of_range_byte_counts_without_touching_the_state() {
        let mut ctx = FixedContext::new(0, 7);
        assert_eq!(ctx.random_bytes(0), Err(Error::RandomLength(0)));
        assert_eq!(ctx.random_bytes(2000), Err(Error::RandomLength(2000)));

        let mut untouched = FixedContext::new(0, 7);
        assert_eq!(
            ctx.random_bytes(16).unwrap(),
            untouched.random_bytes(16).unwrap()
        );
    }
}
