//! In-memory worksheet construction, for callers that already hold tabular data and for
//! exercising grammars without a workbook file.

use calamine::{Data, Range};

#[derive(Debug, Default, Clone)]
pub struct SheetBuilder {
    cells: Vec<((u32, u32), Data)>,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, row: u32, col: u32, value: Data) -> Self {
        self.cells.push(((row, col), value));
        self
    }

    pub fn text(self, row: u32, col: u32, text: impl Into<String>) -> Self {
        self.value(row, col, Data::String(text.into()))
    }

    pub fn number(self, row: u32, col: u32, number: f64) -> Self {
        self.value(row, col, Data::Float(number))
    }

    pub fn int(self, row: u32, col: u32, number: i64) -> Self {
        self.value(row, col, Data::Int(number))
    }

    /// Writes consecutive numbers along one row starting at the given columns.
    pub fn numbers_at(mut self, row: u32, cols: &[u32], numbers: &[f64]) -> Self {
        for (col, number) in cols.iter().zip(numbers) {
            self = self.number(row, *col, *number);
        }
        self
    }

    /// Range anchored at (0, 0) so relative and absolute coordinates agree.
    pub fn build(self) -> Range<Data> {
        let Some(max_row) = self.cells.iter().map(|((r, _), _)| *r).max() else {
            return Range::empty();
        };
        let max_col = self.cells.iter().map(|((_, c), _)| *c).max().unwrap_or(0);

        let mut range = Range::new((0, 0), (max_row, max_col));
        for (pos, value) in self.cells {
            range.set_value(pos, value);
        }
        range
    }
}
