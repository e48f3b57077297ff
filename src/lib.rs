//! # fieldpack: template-driven packet field builder
//!
//! Describe a packet as a comma-separated list of fixed-width fields, fill in
//! the values, and get the raw bytes back in declaration order.
//!
//! ## Template syntax
//!
//! ```text
//! name[size](=default)?(,name[size](=default)?)*
//! ```
//!
//! - `size` is a byte count, base 10, from 1 to 65535.
//! - `default` is `0x`-prefixed hex, `0b`-prefixed binary, or decimal, of any length.
//! - Whitespace is ignored everywhere, including inside numerals, so
//!   `0x11111111 22222222` is one 8-byte value. Newlines only matter for the
//!   line numbers in error messages.
//!
//! Each field encodes as exactly `size` bytes, big-endian. Short values are
//! zero-padded and long values keep their low-order bytes.
//!
//! ## Example
//!
//! ```
//! use fieldpack::Builder;
//!
//! let mut b = Builder::with_template("op[1] = 1, xid[4], flags[2] = 0x8000");
//! assert!(!b.is_correct());
//! b.set_value("xid", 0x3903f326u32).unwrap();
//! assert_eq!(b.encode().unwrap(), vec![0x01, 0x39, 0x03, 0xf3, 0x26, 0x80, 0x00]);
//! ```

pub mod builder;
pub mod dump;
pub mod error;
pub mod field;
pub mod parser;
pub mod value;

pub use builder::Builder;
pub use dump::{format_layout, hex_dump};
pub use error::TemplateError;
pub use field::Field;
pub use value::FieldValue;
