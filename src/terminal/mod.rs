//! Terminal display surface - cell canvas, status line, snapshots, and
//! raw mode cleanup.

mod canvas;
mod raw_mode;
mod snapshot;
mod status_bar;

pub use canvas::{Cell, CellCanvas};
pub use raw_mode::ScreenGuard;
pub use snapshot::{save_snapshot, snapshot_stem, SnapshotError, SnapshotFiles};
pub use status_bar::{StatusBar, StatusInfo};
