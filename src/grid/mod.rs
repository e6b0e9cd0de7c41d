mod editor;
mod model;
mod selection;

pub use editor::{CommitError, EditSession};
pub use model::{Activity, CellKey, Grid, END_HOUR, FIRST_DAY, LAST_DAY, START_HOUR};
pub use selection::SelectionEngine;
