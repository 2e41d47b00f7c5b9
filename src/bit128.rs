//! Plain 128-bit value type shared by UUIDs and ULIDs

use std::{fmt, str::from_utf8_unchecked};

use crate::Error;

/// Represents an opaque 128-bit value held as 16 big-endian bytes.
///
/// Equality is byte-wise and the derived ordering is the unsigned lexicographic
/// byte order, so sorting `Bit128` values matches sorting their hexadecimal or
/// binary renditions.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Bit128([u8; 16]);

impl Bit128 {
    /// Creates a value from a 16-byte array.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a value from a byte slice that must be exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match <[u8; 16]>::try_from(bytes) {
            Ok(array) => Ok(Self(array)),
            Err(_) => Err(Error::Length {
                expected: 16,
                actual: bytes.len(),
            }),
        }
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns the 32-character lowercase hexadecimal representation without
    /// separators.
    pub fn to_hex(&self) -> String {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 32];
        let mut buf_iter = buffer.iter_mut();
        for e in self.0 {
            *buf_iter.next().unwrap() = DIGITS[(e >> 4) as usize];
            *buf_iter.next().unwrap() = DIGITS[(e & 15) as usize];
        }
        debug_assert!(buffer.is_ascii());
        unsafe { from_utf8_unchecked(&buffer) }.to_owned()
    }

    /// Creates a value from a 32-character hexadecimal string.
    ///
    /// Parsing is case-insensitive; separators of any kind are rejected.
    pub fn from_hex(src: &str) -> Result<Self, Error> {
        if src.len() != 32 {
            return Err(Error::Format("hex form must be exactly 32 characters"));
        }

        const ERR: Error = Error::Format("invalid hexadecimal digit");
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for e in dst.iter_mut() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
        }
        Ok(Self(dst))
    }
}

impl fmt::Display for Bit128 {
    /// Formats the value as its 32-character lowercase hexadecimal form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 16]> for Bit128 {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl From<Bit128> for [u8; 16] {
    fn from(src: Bit128) -> Self {
        src.0
    }
}

impl AsRef<[u8]> for Bit128 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bit128> for u128 {
    fn from(src: Bit128) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Bit128 {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::Bit128;
    use crate::Error;

    /// Round-trips bytes and hex forms
    #[test]
    fn round_trips_bytes_and_hex_forms() {
        let cases: &[[u8; 16]] = &[
            [0; 16],
            [0xff; 16],
            [1, 128, 174, 89, 7, 140, 123, 128, 177, 19, 47, 225, 74, 97, 95, 179],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        ];

        for bytes in cases {
            let e = Bit128::from_bytes(bytes).unwrap();
            assert_eq!(e.as_bytes(), bytes);
            assert_eq!(e.to_bytes(), *bytes);
            assert_eq!(Bit128::from_hex(&e.to_hex()), Ok(e));
            assert_eq!(Bit128::from_hex(&e.to_hex().to_uppercase()), Ok(e));
            assert_eq!(Bit128::from(u128::from(e)), e);
            assert_eq!(Bit128::from(<[u8; 16]>::from(e)), e);
        }
    }

    /// Renders lowercase hex without separators
    #[test]
    fn renders_lowercase_hex_without_separators() {
        let e = Bit128::new([
            0x01, 0x80, 0xae, 0x59, 0x07, 0x8c, 0x7b, 0x80, 0xb1, 0x13, 0x2f, 0xe1, 0x4a, 0x61,
            0x5f, 0xb3,
        ]);
        assert_eq!(e.to_hex(), "0180ae59078c7b80b1132fe14a615fb3");
        assert_eq!(e.to_string(), "0180ae59078c7b80b1132fe14a615fb3");
    }

    /// Rejects byte slices that are not exactly 16 bytes
    #[test]
    fn rejects_byte_slices_that_are_not_exactly_16_bytes() {
        for len in [0usize, 1, 15, 17, 32] {
            let bytes = vec![0u8; len];
            assert_eq!(
                Bit128::from_bytes(&bytes),
                Err(Error::Length {
                    expected: 16,
                    actual: len
                })
            );
        }
    }

    /// Rejects malformed hex strings
    #[test]
    fn rejects_malformed_hex_strings() {
        let cases = [
            "",
            "0180ae59078c7b80b1132fe14a615fb",
            "0180ae59078c7b80b1132fe14a615fb3a",
            "0180ae59-078c-7b80-b113-2fe14a615fb3",
            "0180ae59078c7b80b1132fe14a615fbg",
            "0180ae59078c7b80b1132fe14a615fb\u{30}\u{301}",
        ];

        for e in cases {
            assert!(Bit128::from_hex(e).is_err(), "{:?}", e);
        }
    }

    /// Orders values lexicographically by unsigned bytes
    #[test]
    fn orders_values_lexicographically_by_unsigned_bytes() {
        let mut low = [0u8; 16];
        let mut high = [0u8; 16];
        low[0] = 0x7f;
        high[0] = 0x80;

        let a = Bit128::new(low);
        let b = Bit128::new(high);
        assert!(a < b);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);

        let mut tail_low = [0xffu8; 16];
        tail_low[15] = 0xfe;
        assert!(Bit128::new(tail_low) < Bit128::new([0xff; 16]));
    }
}
