pub mod check;
pub mod export;
pub mod search;
pub mod snapshots;
pub mod util;
pub mod workspace;

pub use check::*;
pub use export::*;
pub use search::*;
pub use snapshots::*;
pub use util::*;
pub use workspace::*;
