//! Generic base-N binary-to-text codecs over arbitrary alphabets

use std::{fmt, str::from_utf8_unchecked};

use crate::Error;

/// The RFC 4648 Base32 alphabet (`A-Z2-7`).
pub const BASE32_RFC4648: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// The Crockford Base32 alphabet, excluding the ambiguous I, L, O, and U.
pub const BASE32_CROCKFORD: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// The Bitcoin Base58 alphabet, excluding 0, O, I, and l.
pub const BASE58_BITCOIN: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The standard Base64 alphabet of RFC 4648 §4.
pub const BASE64_STANDARD: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// The URL- and filename-safe Base64 alphabet of RFC 4648 §5.
pub const BASE64_URL_SAFE: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// The MIME Base64 alphabet, identical to [`BASE64_STANDARD`].
pub const BASE64_MIME: &str = BASE64_STANDARD;

/// A base-N binary-to-text codec over an arbitrary ordered alphabet.
///
/// Input bytes are treated as one big-endian arbitrary-precision unsigned
/// integer and converted by repeated division, with each leading zero byte
/// preserved as one leading `alphabet[0]` symbol. Decoding inverts the
/// process, so `decode(encode(x)) == x` holds for every byte sequence `x`.
///
/// The optional padding symbol is validated at construction and reported by
/// [`padding`](Codec::padding), but the conversion itself never emits or
/// strips it. For bit-group encodings such as Base64 this also means the
/// output differs from the left-aligned RFC 4648 form whenever the input
/// length is not a whole number of groups.
///
/// # Examples
///
/// ```rust
/// use idkit::Codec;
///
/// let codec = Codec::base58_bitcoin();
/// assert_eq!(codec.encode(b"Hello World"), "JxF12TrwUP45BMd");
/// assert_eq!(codec.decode("JxF12TrwUP45BMd").unwrap(), b"Hello World");
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Codec {
    alphabet: Vec<u8>,
    padding: Option<char>,
    case_insensitive: bool,
}

impl Codec {
    /// Creates a codec from an alphabet and an optional padding symbol.
    ///
    /// The alphabet must hold at least two distinct ASCII symbols, and the
    /// padding symbol, if any, must not appear in the alphabet.
    pub fn new(alphabet: &str, padding: Option<char>) -> Result<Self, Error> {
        if alphabet.is_empty() {
            return Err(Error::Alphabet("alphabet cannot be empty"));
        }
        if !alphabet.is_ascii() {
            return Err(Error::Alphabet("alphabet symbols must be ASCII"));
        }
        if alphabet.len() < 2 {
            return Err(Error::Alphabet("alphabet must hold at least two symbols"));
        }

        let bytes = alphabet.as_bytes();
        let mut seen = [false; 256];
        for &symbol in bytes {
            if seen[symbol as usize] {
                return Err(Error::Alphabet("alphabet symbols must be distinct"));
            }
            seen[symbol as usize] = true;
        }

        if let Some(pad) = padding {
            if !pad.is_ascii() {
                return Err(Error::Alphabet("padding symbol must be ASCII"));
            }
            if seen[pad as usize] {
                return Err(Error::Alphabet("padding symbol cannot appear in alphabet"));
            }
        }

        Ok(Self {
            alphabet: bytes.to_vec(),
            padding,
            case_insensitive: false,
        })
    }

    fn preset(alphabet: &str, padding: Option<char>, case_insensitive: bool) -> Self {
        Self {
            alphabet: alphabet.as_bytes().to_vec(),
            padding,
            case_insensitive,
        }
    }

    /// Creates the RFC 4648 Base32 codec with `=` padding.
    pub fn base32_rfc4648() -> Self {
        Self::preset(BASE32_RFC4648, Some('='), false)
    }

    /// Creates the Crockford Base32 codec.
    ///
    /// Decoding accepts lower- and uppercase symbols; there is no padding.
    pub fn base32_crockford() -> Self {
        Self::preset(BASE32_CROCKFORD, None, true)
    }

    /// Creates the Bitcoin Base58 codec, without padding.
    pub fn base58_bitcoin() -> Self {
        Self::preset(BASE58_BITCOIN, None, false)
    }

    /// Creates the standard Base64 codec with `=` padding.
    pub fn base64_standard() -> Self {
        Self::preset(BASE64_STANDARD, Some('='), false)
    }

    /// Creates the URL-safe Base64 codec with `=` padding.
    pub fn base64_url_safe() -> Self {
        Self::preset(BASE64_URL_SAFE, Some('='), false)
    }

    /// Creates the MIME Base64 codec.
    ///
    /// The alphabet and padding are identical to
    /// [`base64_standard`](Codec::base64_standard); no line wrapping is
    /// performed.
    pub fn base64_mime() -> Self {
        Self::preset(BASE64_MIME, Some('='), false)
    }

    /// Returns the codec alphabet in symbol order.
    pub fn alphabet(&self) -> &str {
        debug_assert!(self.alphabet.is_ascii());
        unsafe { from_utf8_unchecked(&self.alphabet) }
    }

    /// Returns the configured padding symbol, if any.
    pub const fn padding(&self) -> Option<char> {
        self.padding
    }

    /// Encodes bytes into a string over the codec alphabet.
    ///
    /// An empty input encodes to an empty string.
    pub fn encode(&self, data: &[u8]) -> String {
        if data.is_empty() {
            return String::new();
        }

        let base = self.alphabet.len() as u32;
        let leading_zeros = data.iter().take_while(|&&b| b == 0).count();

        // Repeatedly divide the big-endian magnitude by the base, collecting
        // remainders from least to most significant digit.
        let mut num = data[leading_zeros..].to_vec();
        let mut output = Vec::new();
        let mut start = 0;
        while start < num.len() {
            let mut remainder = 0u32;
            for byte in &mut num[start..] {
                let acc = remainder * 256 + u32::from(*byte);
                *byte = (acc / base) as u8;
                remainder = acc % base;
            }
            output.push(self.alphabet[remainder as usize]);
            while start < num.len() && num[start] == 0 {
                start += 1;
            }
        }

        // One leading zero byte maps to one leading zero-digit symbol.
        output.extend(std::iter::repeat(self.alphabet[0]).take(leading_zeros));
        output.reverse();

        debug_assert!(output.is_ascii());
        unsafe { String::from_utf8_unchecked(output) }
    }

    /// Decodes a string over the codec alphabet back into bytes.
    ///
    /// An empty input decodes to an empty buffer. Any symbol outside the
    /// alphabet is rejected.
    pub fn decode(&self, encoded: &str) -> Result<Vec<u8>, Error> {
        if encoded.is_empty() {
            return Ok(Vec::new());
        }

        let lookup = self.decode_table();
        let input = encoded.as_bytes();
        for &symbol in input {
            if lookup[symbol as usize] < 0 {
                return Err(Error::Format("invalid character in encoded string"));
            }
        }

        let base = self.alphabet.len() as u32;
        let leading_zeros = input
            .iter()
            .take_while(|&&b| lookup[b as usize] == 0)
            .count();

        // Horner accumulation over a growable little-endian buffer.
        let mut output: Vec<u8> = Vec::new();
        for &symbol in &input[leading_zeros..] {
            let mut carry = lookup[symbol as usize] as u32;
            for byte in output.iter_mut() {
                carry += u32::from(*byte) * base;
                *byte = (carry & 0xff) as u8;
                carry >>= 8;
            }
            while carry > 0 {
                output.push((carry & 0xff) as u8);
                carry >>= 8;
            }
        }

        output.extend(std::iter::repeat(0u8).take(leading_zeros));
        output.reverse();
        Ok(output)
    }

    fn decode_table(&self) -> [i16; 256] {
        let mut lookup = [-1i16; 256];
        for (value, &symbol) in self.alphabet.iter().enumerate() {
            lookup[symbol as usize] = value as i16;
        }
        if self.case_insensitive {
            for (value, &symbol) in self.alphabet.iter().enumerate() {
                let flipped = if symbol.is_ascii_uppercase() {
                    symbol.to_ascii_lowercase()
                } else if symbol.is_ascii_lowercase() {
                    symbol.to_ascii_uppercase()
                } else {
                    continue;
                };
                if lookup[flipped as usize] < 0 {
                    lookup[flipped as usize] = value as i16;
                }
            }
        }
        lookup
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base{} codec", self.alphabet.len())
    }
}
