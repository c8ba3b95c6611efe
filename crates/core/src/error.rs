//! Construction-time configuration errors
//!
//! Runtime precondition failures (cooldown not elapsed, capacity reached,
//! no spread candidates) are guarded no-ops, never errors. Anything that
//! would leave the building topology unusable is rejected here, before the
//! simulation starts.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("building must have at least one floor and one window per floor")]
    EmptyTopology,

    #[error("{found} windows configured but {floors} floors x {per_floor} windows expected")]
    InvalidTopology {
        floors: usize,
        per_floor: usize,
        found: usize,
    },

    #[error("expected one stair position per floor ({floors}), got {found}")]
    MissingStairs { floors: usize, found: usize },

    #[error("exit door position is not set")]
    MissingExitDoor,

    #[error("designated exit {target} of window {window} is not a valid window number (1..={count})")]
    SpreadTargetOutOfRange { window: u32, target: u32, count: usize },

    #[error("starting fire window index {index} out of range for {count} windows")]
    StartingWindowOutOfRange { index: usize, count: usize },
}
