//! 128-bit identifiers and base-N binary-to-text codecs
//!
//! This crate generates and parses UUIDs (versions 1, 3, 4, 5, 6, and 7) and
//! ULIDs, and converts arbitrary bytes to and from text over any base-N
//! alphabet.
//!
//! ```rust
//! let uuid = idkit::uuid7();
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_uuid().as_bytes()); // as 16-byte big-endian array
//!
//! let ulid = idkit::ulid();
//! println!("{}", ulid); // e.g. "01ARZ3NDEKTSV4RRFFQ69G5FAV"
//! ```
//!
//! # Identifiers
//!
//! Every identifier is a 16-byte big-endian value ([`Bit128`]) whose equality
//! and ordering are plain byte comparisons. [`Uuid`] adds the RFC 4122
//! canonical form and the version/variant tag bits; the typed wrappers
//! ([`UuidV1`] through [`UuidV7`]) add per-version generation and field
//! accessors, and [`AnyUuid`] tags a parsed value with its decoded version.
//! [`Ulid`] pairs a 48-bit millisecond timestamp with 80 bits of randomness
//! and keeps identifiers generated within one millisecond in strictly
//! increasing order by incrementing the previous randomness.
//!
//! Generation reads time and randomness through the [`Context`] capability:
//! [`SystemContext`] is the real clock and CSPRNG, while [`FixedContext`]
//! is a deterministic stand-in for tests.
//!
//! ```rust
//! use idkit::{FixedContext, UuidV7};
//!
//! let mut ctx = FixedContext::new(1_640_995_200_000, 42);
//! let a = UuidV7::generate_with(&mut ctx).unwrap();
//! let b = UuidV7::generate_with(&mut FixedContext::new(1_640_995_200_000, 42)).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! # Codecs
//!
//! [`Codec`] converts bytes to text by treating the input as one big-endian
//! arbitrary-precision integer, so it works for any alphabet of two or more
//! symbols; presets cover Base32 (RFC 4648 and Crockford), Base58 (Bitcoin),
//! and Base64 (standard, URL-safe, and MIME).
//!
//! ```rust
//! use idkit::Codec;
//!
//! let base58 = Codec::base58_bitcoin();
//! assert_eq!(base58.encode(b"Hello World"), "JxF12TrwUP45BMd");
//! ```

mod bit128;
mod codec;
mod context;
mod error;
mod ulid;
mod uuid;
mod v1;
mod v3;
mod v4;
mod v5;
mod v6;
mod v7;

#[cfg(feature = "serde")]
mod serde_support;

pub use bit128::Bit128;
pub use codec::{
    Codec, BASE32_CROCKFORD, BASE32_RFC4648, BASE58_BITCOIN, BASE64_MIME, BASE64_STANDARD,
    BASE64_URL_SAFE,
};
pub use context::{Context, FixedContext, SystemContext, GREGORIAN_EPOCH_OFFSET, MAX_RANDOM_BYTES};
pub use error::Error;
pub use ulid::{ulid, Ulid, UlidGenerator};
pub use uuid::{AnyUuid, Uuid};
pub use v1::UuidV1;
pub use v3::UuidV3;
pub use v4::UuidV4;
pub use v5::UuidV5;
pub use v6::UuidV6;
pub use v7::UuidV7;

/// Generates a UUIDv1 object from the system clock and CSPRNG.
pub fn uuid1() -> UuidV1 {
    UuidV1::generate()
}

/// Derives a UUIDv3 object from a namespace UUID and a name.
pub fn uuid3(namespace: Uuid, name: &[u8]) -> UuidV3 {
    UuidV3::new(namespace, name)
}

/// Generates a UUIDv4 object from the system CSPRNG.
///
/// # Examples
///
/// ```rust
/// let uuid = idkit::uuid4();
/// println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> UuidV4 {
    UuidV4::generate()
}

/// Derives a UUIDv5 object from a namespace UUID and a name.
pub fn uuid5(namespace: Uuid, name: &[u8]) -> UuidV5 {
    UuidV5::new(namespace, name)
}

/// Generates a UUIDv6 object from the system clock and CSPRNG.
pub fn uuid6() -> UuidV6 {
    UuidV6::generate()
}

/// Generates a UUIDv7 object from the system clock and CSPRNG.
///
/// # Examples
///
/// ```rust
/// let uuid = idkit::uuid7();
/// println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
/// ```
pub fn uuid7() -> UuidV7 {
    UuidV7::generate()
}
