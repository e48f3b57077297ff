//! Field values: unbounded unsigned integers with fixed-width big-endian rendering.

use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// An unsigned integer of any width, kept as a minimal big-endian magnitude.
///
/// Zero is the empty magnitude. Widths are only applied when the value is
/// rendered into a field (see [`FieldValue::to_be_bytes`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldValue {
    magnitude: Vec<u8>,
}

impl FieldValue {
    pub fn zero() -> Self {
        FieldValue::default()
    }

    /// Build from big-endian bytes; leading zero bytes are dropped.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        FieldValue {
            magnitude: bytes[first..].to_vec(),
        }
    }

    /// Parse a template numeral: `0x` hex, `0b` binary, decimal otherwise.
    /// Prefixes are lowercase only. Returns `None` for empty or invalid digits.
    pub fn parse_numeral(s: &str) -> Option<Self> {
        if let Some(hex) = s.strip_prefix("0x") {
            Self::from_str_radix(hex, 16)
        } else if let Some(bin) = s.strip_prefix("0b") {
            Self::from_str_radix(bin, 2)
        } else {
            Self::from_str_radix(s, 10)
        }
    }

    /// Parse bare digits in `radix` (2..=16). Any length is accepted.
    pub fn from_str_radix(digits: &str, radix: u32) -> Option<Self> {
        if digits.is_empty() || !(2..=16).contains(&radix) {
            return None;
        }
        let mut value = FieldValue::zero();
        for c in digits.chars() {
            let digit = c.to_digit(radix)?;
            value.mul_add(radix, digit);
        }
        Some(value)
    }

    fn mul_add(&mut self, radix: u32, digit: u32) {
        let mut carry = digit;
        for byte in self.magnitude.iter_mut().rev() {
            let acc = u32::from(*byte) * radix + carry;
            *byte = acc as u8;
            carry = acc >> 8;
        }
        while carry > 0 {
            self.magnitude.insert(0, carry as u8);
            carry >>= 8;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Minimal big-endian bytes (empty for zero).
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.magnitude
    }

    /// Number of bytes needed to hold the value without truncation.
    pub fn byte_len(&self) -> usize {
        self.magnitude.len()
    }

    /// Exactly `size` big-endian bytes: zero-padded on the left, or cut down
    /// to the low-order `size` bytes when the value is wider.
    pub fn to_be_bytes(&self, size: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(size);
        self.write_be(&mut out, size);
        out
    }

    /// Append exactly `size` big-endian bytes to `out`.
    pub fn write_be(&self, out: &mut Vec<u8>, size: usize) {
        let len = self.magnitude.len();
        if len >= size {
            out.extend_from_slice(&self.magnitude[len - size..]);
        } else {
            out.resize(out.len() + (size - len), 0);
            out.extend_from_slice(&self.magnitude);
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        if self.magnitude.len() > 8 {
            return None;
        }
        let mut b = [0u8; 8];
        b[8 - self.magnitude.len()..].copy_from_slice(&self.magnitude);
        Some(BigEndian::read_u64(&b))
    }

    pub fn as_u128(&self) -> Option<u128> {
        if self.magnitude.len() > 16 {
            return None;
        }
        let mut b = [0u8; 16];
        b[16 - self.magnitude.len()..].copy_from_slice(&self.magnitude);
        Some(BigEndian::read_u128(&b))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        let mut b = [0u8; 8];
        BigEndian::write_u64(&mut b, v);
        FieldValue::from_be_bytes(&b)
    }
}

impl From<u128> for FieldValue {
    fn from(v: u128) -> Self {
        let mut b = [0u8; 16];
        BigEndian::write_u128(&mut b, v);
        FieldValue::from_be_bytes(&b)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::from(u64::from(v))
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        FieldValue::from(u64::from(v))
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        FieldValue::from(u64::from(v))
    }
}

impl fmt::LowerHex for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        match self.magnitude.split_first() {
            None => f.write_str("0"),
            Some((first, rest)) => {
                write!(f, "{:x}", first)?;
                for b in rest {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders as `0x` followed by lowercase hex digits (`0x0` for zero).
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self)
    }
}
