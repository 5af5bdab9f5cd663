//! Hexdump of the decoded primary payload.
//!
//! # Output Format
//!
//! ```text
//! 0x0001A2F0: 69 00 74 00 65 00 78 00  74 00 5F 00 6D 00 5F 00  |i.t.e.x.t._.m._.|
//! ```

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use kbsave_core::SaveParser;

pub fn run(parser: &SaveParser, save: &Path, offset: usize, size: usize, ascii: bool) -> Result<()> {
    let data = parser
        .decode_primary(save)
        .with_context(|| format!("Failed to decode save {}", save.display()))?;

    if offset >= data.len() {
        bail!(
            "Offset 0x{:X} is past the end of the payload ({} bytes)",
            offset,
            data.len()
        );
    }
    let end = offset.saturating_add(size).min(data.len());

    println!("Hexdump at 0x{:X} ({} bytes):", offset, end - offset);
    println!();
    print!("{}", format_rows(&data[offset..end], offset, ascii));
    Ok(())
}

/// 16 bytes per row, grouped by 8, labelled with absolute offsets
pub fn format_rows(bytes: &[u8], base: usize, ascii: bool) -> String {
    let mut out = String::new();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "0x{:08X}: ", base + i * 16);

        for j in 0..16 {
            if j == 8 {
                out.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => {
                    let _ = write!(out, "{:02X} ", byte);
                }
                None => out.push_str("   "),
            }
        }

        if ascii {
            out.push_str(" |");
            for byte in chunk {
                out.push(if (0x20..0x7F).contains(byte) {
                    *byte as char
                } else {
                    '.'
                });
            }
            for _ in chunk.len()..16 {
                out.push(' ');
            }
            out.push('|');
        }

        out.push('\n');
    }

    out
}
