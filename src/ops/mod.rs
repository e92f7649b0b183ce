pub mod arraytools;
pub mod batch;
pub mod capped_root;
pub mod capped_sort;
pub mod dispatch;
pub mod simplex;

#[cfg(test)]
mod __test__;

pub use self::batch::{apply_rows, batch_from_rows, row_sums, validate_batch};
pub use self::capped_root::{project_capped_root_row, solve_dual, DualRoot};
pub use self::capped_sort::{find_partition, project_capped_sort_row, KktPartition};
pub use self::dispatch::{
    project, project_capped, project_capped_with, project_with, CappedMethod, Method,
};
pub use self::simplex::{project_simplex, project_simplex_with, simplex_along};
