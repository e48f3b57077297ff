//! A single named, fixed-width packet field.

use crate::error::TemplateError;
use crate::parser::{self, MAX_FIELD_SIZE};
use crate::value::FieldValue;
use std::fmt;
use std::str::FromStr;

/// One field of a packet template: `name[size]` with an optional value.
///
/// `value` is public so callers can resolve a field after parsing; `None`
/// means unset, which is distinct from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Width in bytes of the encoded field.
    pub size: usize,
    pub value: Option<FieldValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Field {
            name: name.into(),
            size,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Parse a token such as `xid[4]=0x3903f326`. The token must already be
    /// free of whitespace and newlines.
    pub fn parse(token: &str) -> Result<Self, TemplateError> {
        parser::parse_field(token)
    }

    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = Some(value.into());
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Encode as exactly `size` big-endian bytes (see [`FieldValue::to_be_bytes`]).
    pub fn encode(&self) -> Result<Vec<u8>, TemplateError> {
        let mut out = Vec::with_capacity(self.size.min(MAX_FIELD_SIZE));
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Append the encoded field to `out`. Nothing is written if the value is
    /// unset or `size` is above [`MAX_FIELD_SIZE`].
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), TemplateError> {
        if self.size > MAX_FIELD_SIZE {
            return Err(TemplateError::FieldTooLarge {
                name: self.name.clone(),
                size: self.size,
                max: MAX_FIELD_SIZE,
            });
        }
        let value = self
            .value
            .as_ref()
            .ok_or_else(|| TemplateError::Unset(self.name.clone()))?;
        value.write_be(out, self.size);
        Ok(())
    }
}

impl FromStr for Field {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::parse(s)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}[{}] = {}", self.name, self.size, v),
            None => write!(f, "{}[{}] = None", self.name, self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_unset_is_an_error() {
        let f = Field::new("xid", 4);
        match f.encode() {
            Err(TemplateError::Unset(name)) => assert_eq!(name, "xid"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn encode_rejects_width_assigned_past_limit() {
        let mut f = Field::new("blob", 1).with_value(1u8);
        f.size = usize::MAX;
        match f.encode() {
            Err(TemplateError::FieldTooLarge { name, size, .. }) => {
                assert_eq!(name, "blob");
                assert_eq!(size, usize::MAX);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn encode_into_appends() {
        let mut out = vec![0xaa];
        Field::new("a", 2).with_value(1u8).encode_into(&mut out).expect("encode");
        assert_eq!(out, vec![0xaa, 0x00, 0x01]);
    }

    #[test]
    fn display_distinguishes_zero_and_unset() {
        assert_eq!(Field::new("a", 1).to_string(), "a[1] = None");
        assert_eq!(Field::new("a", 1).with_value(0u8).to_string(), "a[1] = 0x0");
        assert_eq!(Field::new("b", 2).with_value(0xbeefu16).to_string(), "b[2] = 0xbeef");
    }

    #[test]
    fn from_str_matches_parse() {
        let a: Field = "flags[2]=0x8000".parse().expect("parse");
        assert_eq!(a, Field::parse("flags[2]=0x8000").expect("parse"));
    }
}
