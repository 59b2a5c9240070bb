//! Console output utilities
//!
//! Consistent message prefixes for command output, table rendering for the
//! listing commands, and the log writer used when logging to a file.

use std::io::Write;

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║ {} ║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

// ============================================================================
// Tables
// ============================================================================

/// Render rows as left-aligned columns separated by two spaces
///
/// The last column is not padded.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![render_row(headers, &widths)];
    lines.push(render_row(
        &separator.iter().map(String::as_str).collect::<Vec<_>>(),
        &widths,
    ));
    for row in rows {
        let cells: Vec<&str> = row.iter().take(columns).map(String::as_str).collect();
        lines.push(render_row(&cells, &widths));
    }
    lines.join("\n")
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        line.push_str(cell);
        if i + 1 < cells.len() {
            let pad = widths[i].saturating_sub(cell.chars().count());
            line.push_str(&" ".repeat(pad + 2));
        }
    }
    line.trim_end().to_string()
}

// ============================================================================
// Logging
// ============================================================================

/// Log target writing to both stderr and a file
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        let table = format_table(
            &["ID", "KEY", "TARGET"],
            &[
                vec!["aB".to_string(), "a.b".to_string(), "user".to_string()],
                vec![
                    "editorMinimapEnabled".to_string(),
                    "editor.minimap.enabled".to_string(),
                    "workspace".to_string(),
                ],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID                    KEY                     TARGET");
        assert_eq!(lines[2], "aB                    a.b                     user");
        assert!(lines[1].starts_with("--------------------  ----"));
    }

    #[test]
    fn test_format_table_empty_rows() {
        let table = format_table(&["A", "B"], &[]);
        assert_eq!(table, "A  B\n-  -");
    }
}
