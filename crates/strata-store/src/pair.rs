//! Old/New warehouse pair.
//!
//! During a coarse step the `Old` warehouse is read-only input and the `New`
//! warehouse receives results. [`WarehousePair::advance`] ends the step: the
//! `New` warehouse becomes `Old`, and the previous `Old` warehouse is cleared
//! and reused as the next `New`.

use strata_core::Snapshot;

use crate::warehouse::DataWarehouse;

/// Double-buffered pair of warehouses.
#[derive(Clone, Debug, Default)]
pub struct WarehousePair {
    old: DataWarehouse,
    new: DataWarehouse,
    step: u64,
}

impl WarehousePair {
    /// Two empty warehouses at step 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap existing warehouses.
    pub fn from_parts(old: DataWarehouse, new: DataWarehouse) -> Self {
        Self { old, new, step: 0 }
    }

    /// The warehouse holding `snapshot`.
    pub fn snapshot(&self, snapshot: Snapshot) -> &DataWarehouse {
        match snapshot {
            Snapshot::Old => &self.old,
            Snapshot::New => &self.new,
        }
    }

    /// Mutable access to the warehouse holding `snapshot`.
    pub fn snapshot_mut(&mut self, snapshot: Snapshot) -> &mut DataWarehouse {
        match snapshot {
            Snapshot::Old => &mut self.old,
            Snapshot::New => &mut self.new,
        }
    }

    /// Both warehouses at once: `Old` for reading, `New` for writing.
    pub fn split_mut(&mut self) -> (&DataWarehouse, &mut DataWarehouse) {
        (&self.old, &mut self.new)
    }

    /// Number of completed [`advance`](Self::advance) calls.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Finish the step: `New` becomes `Old` and a cleared warehouse takes
    /// the `New` role.
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.old, &mut self.new);
        self.new.clear();
        self.step += 1;
    }
}
