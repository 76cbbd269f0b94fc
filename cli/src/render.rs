use minefield_core::{BoardView, CellCategory, CellView};
use std::fmt;

/// Text rendering of a board: column digits on top, 1-based row numbers on the left.
pub struct GridDisplay<'a>(pub &'a BoardView);

fn glyph(cell: &CellView) -> char {
    match cell.category {
        Some(CellCategory::Mine) => 'X',
        Some(CellCategory::Blank) => '/',
        Some(CellCategory::Numbered(count)) => char::from_digit(count.into(), 10).unwrap_or('?'),
        None if cell.marked => '*',
        None => '.',
    }
}

impl fmt::Display for GridDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let label_width = view.rows().to_string().len();
        let ruler = "-".repeat(view.cols());
        let gutter = "-".repeat(label_width);

        write!(f, "\n{:label_width$}|", "")?;
        for col in 1..=view.cols() {
            write!(f, "{}", col % 10)?;
        }
        writeln!(f, "|")?;
        writeln!(f, "{gutter}|{ruler}|")?;

        for (index, row) in view.iter_rows().enumerate() {
            write!(f, "{:>label_width$}|", index + 1)?;
            for cell in row {
                write!(f, "{}", glyph(cell))?;
            }
            writeln!(f, "|")?;
        }

        writeln!(f, "{gutter}|{ruler}|")
    }
}
