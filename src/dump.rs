//! Format builders and raw buffers for display (layout table, hex dump).

use crate::builder::Builder;
use crate::error::TemplateError;
use std::fmt::Write;

/// One line per declared field: offset, size, name, and encoded bytes.
///
/// Unset fields show `<unset>` but still advance the offset, so the table
/// reflects the final layout even for incomplete templates. Offsets past
/// `usize::MAX` print as `????`.
pub fn format_layout(builder: &Builder) -> String {
    let mut out = String::new();
    let name_width = builder.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut offset = Some(0usize);
    for field in builder.iter() {
        let bytes = match field.encode() {
            Ok(b) => hex_bytes(&b),
            Err(TemplateError::Unset(_)) => "<unset>".to_string(),
            Err(e) => format!("<{}>", e),
        };
        let offset_str = match offset {
            Some(o) => format!("{:04x}", o),
            None => "????".to_string(),
        };
        let _ = writeln!(
            out,
            "{}  {:>4}  {:<width$}  {}",
            offset_str,
            field.size,
            field.name,
            bytes,
            width = name_width
        );
        offset = offset.and_then(|o| o.checked_add(field.size));
    }
    out
}

/// Offset-prefixed hex dump, `width` bytes per row (16 if `width` is 0).
pub fn hex_dump(bytes: &[u8], width: usize) -> String {
    let width = if width == 0 { 16 } else { width };
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(width).enumerate() {
        let _ = writeln!(out, "{:08x}  {}", row * width, hex_bytes(chunk));
    }
    out
}

fn hex_bytes(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}
