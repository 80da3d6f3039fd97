//! Completeness tracking for operator-filled cells.
//!
//! [`FillGuard`] wraps the target field of a prolongation or ghost fill.
//! Depending on [`Validation`] it either poisons the target cells with a
//! sentinel up front, or records every write in a side mask. [`finish`]
//! then reports the first target cell that was never written.
//!
//! [`finish`]: FillGuard::finish

use strata_core::{CellValue, IntVector};
use strata_grid::CellBox;
use strata_store::CellField;

use crate::config::Validation;

/// Write tracker over a set of target cells of one field.
pub struct FillGuard<'a, T> {
    field: &'a mut CellField<T>,
    target: CellBox,
    validation: Validation,
    written: Vec<bool>,
}

impl<'a, T: CellValue> FillGuard<'a, T> {
    /// Start tracking writes to the cells of `target` (which must lie in
    /// the field's region).
    ///
    /// In `Sentinel` mode the target cells are overwritten with the
    /// sentinel immediately.
    pub fn new(field: &'a mut CellField<T>, target: CellBox, validation: Validation) -> Self {
        let written = match validation {
            Validation::Sentinel(s) => {
                field.fill_box(&target, T::splat(s));
                Vec::new()
            }
            Validation::InitializedMask => vec![false; target.cell_count()],
            Validation::Off => Vec::new(),
        };
        Self {
            field,
            target,
            validation,
            written,
        }
    }

    /// Write one cell.
    pub fn write(&mut self, c: IntVector, v: T) {
        self.field[c] = v;
        if let Validation::InitializedMask = self.validation {
            if self.target.contains(c) {
                let i = self.target.linear_index(c);
                self.written[i] = true;
            }
        }
    }

    /// Check that every target cell was written. Returns the first
    /// unwritten cell in row-major order on failure.
    pub fn finish(self) -> Result<(), IntVector> {
        let missing = match self.validation {
            Validation::Sentinel(s) => self
                .target
                .cells()
                .find(|&c| holds_sentinel(&self.field[c], s)),
            Validation::InitializedMask => self
                .target
                .cells()
                .zip(&self.written)
                .find(|(_, w)| !**w)
                .map(|(c, _)| c),
            Validation::Off => None,
        };
        match missing {
            Some(c) => Err(c),
            None => Ok(()),
        }
    }
}

fn holds_sentinel<T: CellValue>(v: &T, sentinel: f64) -> bool {
    (0..T::COMPONENTS).any(|i| v.component(i) == sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SENTINEL;
    use strata_core::Vector3;

    fn region() -> CellBox {
        CellBox::new(IntVector::ZERO, IntVector::new(3, 2, 1))
    }

    #[test]
    fn sentinel_poisons_then_detects_gap() {
        let mut field = CellField::new(region(), 1.0);
        let sentinel = Validation::Sentinel(DEFAULT_SENTINEL);
        let mut guard = FillGuard::new(&mut field, region(), sentinel);
        for c in region().cells().skip(1) {
            guard.write(c, 2.0);
        }
        assert_eq!(guard.finish(), Err(IntVector::ZERO));
        assert_eq!(field[IntVector::ZERO], DEFAULT_SENTINEL);
    }

    #[test]
    fn mask_tracks_writes_without_poisoning() {
        let mut field = CellField::new(region(), Vector3::splat(1.0));
        let mut guard = FillGuard::new(&mut field, region(), Validation::InitializedMask);
        for c in region().cells().take(5) {
            guard.write(c, Vector3::splat(0.0));
        }
        assert_eq!(guard.finish(), Err(IntVector::new(2, 1, 0)));
        assert_eq!(field[IntVector::new(2, 1, 0)], Vector3::splat(1.0));
    }

    #[test]
    fn complete_fill_passes_in_every_mode() {
        for mode in [Validation::Sentinel(-1.0), Validation::InitializedMask, Validation::Off] {
            let mut field = CellField::new(region(), 0.0);
            let mut guard = FillGuard::new(&mut field, region(), mode);
            for c in region().cells() {
                guard.write(c, 4.0);
            }
            assert_eq!(guard.finish(), Ok(()));
        }
    }

    #[test]
    fn off_never_fails() {
        let mut field = CellField::new(region(), 0.0);
        let guard = FillGuard::new(&mut field, region(), Validation::Off);
        assert_eq!(guard.finish(), Ok(()));
    }
}
