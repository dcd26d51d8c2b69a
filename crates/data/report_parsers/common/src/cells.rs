//! Typed, fault-free reads from a worksheet.
//!
//! Coordinates are absolute and 0-based: row 0 is the first worksheet row even when the
//! used range calamine returns starts further down.

use calamine::{Data, Range};

#[derive(Debug, Clone, Copy)]
pub struct SheetView<'a> {
    range: &'a Range<Data>,
}

impl<'a> SheetView<'a> {
    pub fn new(range: &'a Range<Data>) -> Self {
        Self { range }
    }

    /// Number of rows up to and including the last used one.
    pub fn row_count(&self) -> usize {
        self.range
            .end()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&'a Data> {
        let row = u32::try_from(row).ok()?;
        let col = u32::try_from(col).ok()?;
        self.range.get_value((row, col))
    }

    /// True for absent cells, empty cells and whitespace-only text.
    pub fn is_blank(&self, row: usize, col: usize) -> bool {
        match self.cell(row, col) {
            None | Some(Data::Empty) => true,
            Some(Data::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    /// Text of a text cell, as written. Other cell types read as absent.
    pub fn read_text(&self, row: usize, col: usize) -> Option<&'a str> {
        match self.cell(row, col)? {
            Data::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Any non-blank cell rendered as text; numbers render as `12.0` / `21.3`.
    pub fn read_display(&self, row: usize, col: usize) -> Option<String> {
        match self.cell(row, col)? {
            Data::Empty => None,
            Data::String(s) if s.trim().is_empty() => None,
            Data::String(s) => Some(s.clone()),
            Data::Float(f) => Some(render_decimal(*f)),
            Data::Int(i) => Some(i.to_string()),
            Data::DateTime(dt) => Some(render_decimal(dt.as_f64())),
            other => Some(other.to_string()),
        }
    }

    /// Integral cell value. Text qualifies when it parses as an integer once every
    /// whitespace character is removed ("1 204" -> 1204).
    pub fn read_integer(&self, row: usize, col: usize) -> Option<i64> {
        match self.cell(row, col)? {
            Data::Int(i) => Some(*i),
            Data::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Data::String(s) => {
                let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
                compact.parse::<i64>().ok()
            }
            _ => None,
        }
    }

    /// Numeric cell value, coercing text such as `"12.5"`.
    ///
    /// Returns NaN for absent, empty, boolean, error and unparsable cells; never fails.
    pub fn read_numeric(&self, row: usize, col: usize) -> f64 {
        match self.cell(row, col) {
            Some(Data::Float(f)) => *f,
            Some(Data::Int(i)) => *i as f64,
            Some(Data::DateTime(dt)) => dt.as_f64(),
            Some(Data::String(s)) => parse_number(s),
            _ => f64::NAN,
        }
    }
}

fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// Decimal rendering that always shows a fractional part for whole numbers (`42.0`).
pub fn render_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Identifier rendering: whole numbers without a fractional part (`12`).
pub fn render_id(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
