use crate::mosaic::grid::CharGrid;

/// Glyph rows joined by `\n`, rows ordered by `⌊y/gridSize⌋` and cells by `x`.
///
/// Rows are not padded: each holds however many cells fall into it.
pub fn to_plain_text(grid: &CharGrid) -> String {
    let g = grid.grid_size().max(1);
    let mut cells: Vec<_> = grid.cells().iter().collect();
    cells.sort_by_key(|c| (c.y / g, c.x));

    let mut out = String::with_capacity(cells.len() * 2);
    let mut current_row = None;
    for cell in cells {
        let row = cell.y / g;
        if current_row.is_some_and(|r| r != row) {
            out.push('\n');
        }
        current_row = Some(row);
        out.push(cell.glyph);
    }
    out
}
