use crate::storage::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("rotation needs at least 2 active staff members, found {found}")]
    InsufficientRoster { found: usize },
    #[error("date out of calendar range")]
    DateOverflow,
    #[error(transparent)]
    Store(#[from] StoreError),
}
