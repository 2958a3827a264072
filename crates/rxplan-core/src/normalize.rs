// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical form for card fields and reference-table values.

/// Byte order mark, common at the start of pasted or exported values.
const BOM: char = '\u{feff}';

/// Uppercase `raw` and drop every whitespace character, including interior
/// whitespace and byte order marks. Total and idempotent.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_uppercase)
        .filter(|&c| !is_stripped(c))
        .collect()
}

fn is_stripped(c: char) -> bool {
    c.is_whitespace() || c == BOM
}
