//! The cell/range store an executor consults for `LODC`/`LODR` and
//! mutates through `STOC`/`STOR`.
//!
//! One scope belongs to one run: created empty, filled by store
//! instructions, dropped with the run. It is not designed for concurrent
//! mutation; an executor processing programs in parallel owns one scope
//! per run.

use crate::common::Position;
use crate::compiler::RuntimeValue;
use crate::parser::ast::CellAddress;

/// A stored region key: one cell or a normalized rectangle, kept as
/// structured ordinals rather than an encoded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Cell {
        column: u64,
        row: u64,
    },
    Range {
        columns: (u64, u64),
        rows: (u64, u64),
    },
}

impl Region {
    fn contains(&self, column: u64, row: u64) -> bool {
        match *self {
            Region::Cell {
                column: c,
                row: r,
            } => c == column && r == row,
            Region::Range { columns, rows } => {
                columns.0 <= column && column <= columns.1 && rows.0 <= row && row <= rows.1
            },
        }
    }
}

/// Runtime table mapping cell/range regions to values.
///
/// Regions are kept in insertion order and never merged or split. Lookups
/// scan newest-first, so when several regions cover the queried cell the
/// most recently inserted one wins ("last assignment wins"), while older
/// regions stay visible for cells the newer ones do not cover. Column
/// comparison is case-insensitive through the ordinal conversion.
#[derive(Debug, Default)]
pub struct Scope {
    assignments: Vec<(Region, RuntimeValue)>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for the exact single-cell region of `address`.
    pub fn assign_cell(&mut self, address: &CellAddress, value: RuntimeValue) {
        let region = Region::Cell {
            column: address.ordinal(),
            row: address.row(),
        };
        self.assignments.push((region, value));
    }

    /// Record a value for the rectangle spanned by the two corners, in
    /// either order.
    pub fn assign_range(
        &mut self,
        corner1: &CellAddress,
        corner2: &CellAddress,
        value: RuntimeValue,
    ) {
        let region = Region::Range {
            columns: minmax(corner1.ordinal(), corner2.ordinal()),
            rows: minmax(corner1.row(), corner2.row()),
        };
        self.assignments.push((region, value));
    }

    /// Value of the most recently inserted region covering `address`.
    ///
    /// Absence is not an error: an uncovered cell reads as `Number(0)`.
    /// Stored values keep the source positions they were created with; the
    /// synthesized default has none.
    pub fn retrieve(&self, address: &CellAddress) -> RuntimeValue {
        let column = address.ordinal();
        let row = address.row();
        self.assignments
            .iter()
            .rev()
            .find(|(region, _)| region.contains(column, row))
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| RuntimeValue::number(0.0, Position::ZERO))
    }

    /// Number of recorded assignments (regions are never coalesced).
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn minmax(a: u64, b: u64) -> (u64, u64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Result;

    fn addr(column: &str, row: u64) -> CellAddress {
        CellAddress::new(column, row, Position::ZERO).unwrap()
    }

    fn number(value: f64) -> RuntimeValue {
        RuntimeValue::number(value, Position::ZERO)
    }

    #[test]
    fn empty_scope_reads_zero() {
        let scope = Scope::new();
        assert!(scope.is_empty());
        assert_eq!(scope.retrieve(&addr("A", 1)), number(0.0));
    }

    #[test]
    fn regions_accumulate_without_coalescing() {
        let mut scope = Scope::new();
        scope.assign_cell(&addr("A", 1), number(1.0));
        scope.assign_range(&addr("A", 1), &addr("B", 2), number(2.0));
        scope.assign_cell(&addr("A", 1), number(3.0));

        // Shadowed regions are kept, not replaced.
        assert_eq!(scope.len(), 3);
        assert!(!scope.is_empty());
    }

    #[test]
    fn cell_assignment_round_trip() {
        let mut scope = Scope::new();
        scope.assign_cell(&addr("A", 1), number(42.0));
        assert_eq!(scope.retrieve(&addr("A", 1)), number(42.0));
        assert_eq!(scope.retrieve(&addr("A", 2)), number(0.0));
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let mut scope = Scope::new();
        scope.assign_cell(&addr("a", 1), number(7.0));
        assert_eq!(scope.retrieve(&addr("A", 1)), number(7.0));
    }

    #[test]
    fn last_inserted_region_wins_overlap() {
        let mut scope = Scope::new();
        scope.assign_cell(&addr("A", 1), number(1.0));
        scope.assign_range(&addr("A", 1), &addr("B", 2), number(2.0));

        // The later range assignment shadows the cell it overlaps...
        assert_eq!(scope.retrieve(&addr("A", 1)), number(2.0));
        assert_eq!(scope.retrieve(&addr("B", 2)), number(2.0));
        // ...and cells outside every region default to zero.
        assert_eq!(scope.retrieve(&addr("C", 1)), number(0.0));
    }

    #[test]
    fn older_region_stays_visible_outside_newer_one() {
        let mut scope = Scope::new();
        scope.assign_range(&addr("A", 1), &addr("C", 3), number(1.0));
        scope.assign_cell(&addr("B", 2), number(2.0));

        assert_eq!(scope.retrieve(&addr("B", 2)), number(2.0));
        assert_eq!(scope.retrieve(&addr("A", 1)), number(1.0));
        assert_eq!(scope.retrieve(&addr("C", 3)), number(1.0));
    }

    #[test]
    fn range_corners_normalize_in_any_order() {
        let mut scope = Scope::new();
        scope.assign_range(&addr("C", 5), &addr("A", 2), number(9.0));
        assert_eq!(scope.retrieve(&addr("B", 3)), number(9.0));
        assert_eq!(scope.retrieve(&addr("D", 3)), number(0.0));
    }

    #[test]
    fn multi_letter_columns_do_not_alias() {
        let mut scope = Scope::new();
        scope.assign_cell(&addr("AA", 1), number(5.0));
        assert_eq!(scope.retrieve(&addr("A", 1)), number(0.0));
        assert_eq!(scope.retrieve(&addr("aa", 1)), number(5.0));
    }

    #[test]
    fn string_values_are_stored_too() -> Result<()> {
        let mut scope = Scope::new();
        let hello = RuntimeValue::string("hello", Position::new(3, 7));
        scope.assign_cell(&addr("A", 1), hello.clone());
        // Stored values keep their own positions for attribution.
        assert_eq!(scope.retrieve(&addr("A", 1)), hello);
        assert_eq!(scope.retrieve(&addr("A", 1)).position(), Position::new(3, 7));
        Ok(())
    }
}
