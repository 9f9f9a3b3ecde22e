//! Fixed-width text table renderer
//!
//! Pure formatting over result rows; an empty report renders the header
//! and rule only, never an error.

use crate::report::ResultRow;

/// Render rows as a fixed-width text table.
///
/// The position and name columns stretch to their longest entry; the five
/// numeric columns are right-aligned at fixed widths.
pub fn render_table(rows: &[ResultRow]) -> String {
    let position_width = rows
        .iter()
        .map(|row| row.position().len())
        .chain(std::iter::once("position".len()))
        .max()
        .unwrap_or(8);
    let name_width = rows
        .iter()
        .map(|row| row.name.len())
        .chain(std::iter::once("name".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<position_width$}  {:<name_width$}  {:>10}  {:>8}  {:>10}  {:>10}  {:>10}\n",
        "position", "name", "sum", "count", "mean", "p95", "p99",
    ));
    out.push_str(&format!(
        "{}\n",
        "-".repeat(position_width + name_width + 60)
    ));

    for row in rows {
        out.push_str(&format!(
            "{:<position_width$}  {:<name_width$}  {:>10}  {:>8}  {:>10}  {:>10}  {:>10}\n",
            row.position(),
            row.name,
            row.sum,
            row.count,
            row.mean,
            row.p95,
            row.p99,
        ));
    }

    out
}
