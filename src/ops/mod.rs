//! Pure view-side computations: filtering, group composition, selection
//! state and drag-drop classification. Nothing here performs I/O.

pub mod compose;
pub mod dragdrop;
pub mod filter;
pub mod selection;
