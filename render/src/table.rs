use cmdtree_core::Table;

/// Narrowest column, in characters.
pub const MIN_COLUMN_WIDTH: usize = 4;
/// Widest column; longer cells are cut.
pub const MAX_COLUMN_WIDTH: usize = 25;

/// Column widths: the longest header or cell, clamped to
/// [`MIN_COLUMN_WIDTH`]..=[`MAX_COLUMN_WIDTH`].
pub fn column_widths(table: &Table) -> Vec<usize> {
    (0..table.num_cols())
        .map(|col| {
            let header = table.header(col).map_or(0, |h| h.chars().count());
            (0..table.num_rows())
                .filter_map(|row| table.cell(row, col))
                .map(|cell| cell.chars().count())
                .fold(header, usize::max)
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Renders a table: a blank line, the header row, a dash underline, one line
/// per row and a closing blank line.
///
/// Every cell is left-aligned in `width + 1` characters and truncated to
/// `width`. Missing headers and cells render as blanks.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Table;
/// use cmdtree_render::render_table;
///
/// let mut table = Table::with_headers(["id", "name"]);
/// table.push_row(["1", "alpha"]);
/// assert_eq!(
///     render_table(&table),
///     "\nid   name  \n-----------\n1    alpha \n\n"
/// );
/// ```
pub fn render_table(table: &Table) -> String {
    let widths = column_widths(table);
    let mut out = String::from("\n");

    let headers = (0..widths.len()).map(|col| table.header(col));
    push_line(&mut out, &widths, headers);
    for &width in &widths {
        out.push_str(&"-".repeat(width + 1));
    }
    out.push('\n');
    for row in 0..table.num_rows() {
        let cells = (0..widths.len()).map(|col| table.cell(row, col));
        push_line(&mut out, &widths, cells);
    }
    out.push('\n');
    out
}

fn push_line<'a>(
    out: &mut String,
    widths: &[usize],
    cells: impl Iterator<Item = Option<&'a str>>,
) {
    for (&width, cell) in widths.iter().zip(cells) {
        let text = cell.unwrap_or("");
        out.push_str(&format!("{text:<pad$.width$}", pad = width + 1));
    }
    out.push('\n');
}
