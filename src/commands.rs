mod compare;
mod snapshots;

pub use compare::run_compare;
pub use snapshots::{run_snapshots_list, run_snapshots_prune};
