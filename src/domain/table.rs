//! Client-side table sorting.
//!
//! Cells are plain display strings as rendered in the dashboard tables
//! (`฿1,234.56`, `12%`, `Latte`). Numeric-looking cells sort by value,
//! everything else sorts as case-insensitive text.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One table row: a list of cell strings.
pub type Row = Vec<String>;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Parse a display cell as a number, ignoring currency symbols,
/// thousands separators, percent signs and whitespace.
pub fn numeric_value(cell: &str) -> Option<Decimal> {
    let cleaned: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    let has_other = cell.chars().any(|c| {
        !(c.is_ascii_digit()
            || c.is_whitespace()
            || matches!(c, '.' | '-' | '+' | ',' | '%' | '฿' | '$' | '€' | '£'))
    });
    if has_other || cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Compare two cells.
///
/// Numeric cells sort before text cells. Numbers compare by value; text
/// compares lowercase first with the raw text as tie-breaker. Ranking the
/// two classes keeps the order total on mixed columns (`12`, `N/A`).
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

/// Stable-sort rows by one column. Missing cells compare as empty text.
pub fn sort_rows(rows: &mut [Row], column: usize, direction: SortDirection) {
    rows.sort_by(|left, right| {
        let a = left.get(column).map_or("", String::as_str);
        let b = right.get(column).map_or("", String::as_str);
        let ord = compare_cells(a, b);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Header click state for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSorter {
    active: Option<(usize, SortDirection)>,
}

impl TableSorter {
    /// Sorter with no active column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active column and direction, if any header was clicked.
    pub fn active(&self) -> Option<(usize, SortDirection)> {
        self.active
    }

    /// Handle a header click and sort `rows` accordingly.
    ///
    /// Clicking the active column flips its direction; any other column
    /// starts ascending. Returns the direction applied.
    pub fn click(&mut self, rows: &mut [Row], column: usize) -> SortDirection {
        let direction = match self.active {
            Some((col, dir)) if col == column => dir.toggled(),
            _ => SortDirection::Ascending,
        };
        self.active = Some((column, direction));
        sort_rows(rows, column, direction);
        direction
    }
}
