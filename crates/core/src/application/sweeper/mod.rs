// Sweepers - background loops that purge full and stale queues
//
// Each sweeper takes the store's registry lock once per pass and runs until
// its shutdown token fires.

mod capacity;
mod idle;

pub use capacity::CapacitySweeper;
pub use idle::IdleSweeper;
