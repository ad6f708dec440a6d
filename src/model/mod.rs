pub mod project;
pub mod task;
pub mod view;

pub use project::*;
pub use task::*;
pub use view::*;
