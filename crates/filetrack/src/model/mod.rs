pub mod file;
pub mod officer;

pub use file::{
    CaseFile, Department, FileId, Priority, StageAssignment, StageEvent, StageStatus,
};
pub use officer::Officer;
