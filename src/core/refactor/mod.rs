//! Structural refactoring: rename convertible entities and propagate the new
//! names through import statements.

mod convert;
mod entity;
pub mod imports;
mod rename;

pub use convert::{
    convert_directory, run_conversion, CancelToken, ConversionOutcome, ConversionRequest, Counts,
    DirectoryOutcome, EntityOutcome, EntityStatus, ImportScope,
};
pub use entity::{ClaimedDestinations, ConversionEntity, EntityKind, Planned, Planner, SkipReason};
pub use rename::{move_directory, rename_entity};
