//
//  bitbucket-branch-restrictions
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Table rendering on top of `comfy_table`.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};

/// Creates a table with the UTF-8 preset and dynamic column widths.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a table whose first row is `headers`, bold when `color` is set.
pub fn table_with_headers(headers: &[&str], color: bool) -> Table {
    let mut table = create_table();
    table.set_header(headers.iter().map(|h| {
        let cell = Cell::new(h);
        if color {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }));
    table
}

/// Shortens `s` to `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("main", 10), "main");
        assert_eq!(truncate("release/2026-q1", 10), "release...");
    }

    #[test]
    fn test_headers_render() {
        let rendered = table_with_headers(&["ID", "KIND"], false).to_string();
        assert!(rendered.contains("KIND"));
    }
}
