//! Saving the current canvas to disk.
//!
//! A snapshot is two files sharing the stem `ascii-face-<frame>`: plain
//! text (`.txt`) and ANSI true-colour (`.ans`, viewable with `cat`).

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::CellCanvas;
use crate::renderer::{canvas_to_ansi, Layout};

/// Errors that can occur while writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("canvas is empty")]
    EmptyCanvas,
    #[error("failed to create snapshot directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write snapshot '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of a written snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFiles {
    pub text: PathBuf,
    pub ansi: PathBuf,
}

/// File stem for a snapshot of `frame`.
pub fn snapshot_stem(frame: u64) -> String {
    format!("ascii-face-{}", frame)
}

/// Write `canvas` into `dir` as `.txt` and `.ans` files.
pub fn save_snapshot(canvas: &CellCanvas, dir: &Path, frame: u64) -> Result<SnapshotFiles, SnapshotError> {
    if canvas.cols() == 0 || canvas.rows() == 0 {
        return Err(SnapshotError::EmptyCanvas);
    }

    std::fs::create_dir_all(dir).map_err(|e| SnapshotError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let stem = snapshot_stem(frame);
    let files = SnapshotFiles {
        text: dir.join(format!("{}.txt", stem)),
        ansi: dir.join(format!("{}.ans", stem)),
    };

    let mut text = canvas.to_plain_string();
    text.push('\n');
    write_file(&files.text, &text)?;
    write_file(&files.ansi, &canvas_to_ansi(canvas, Layout::Lines))?;

    log::info!("Snapshot saved: {}", files.text.display());
    Ok(files)
}

fn write_file(path: &Path, content: &str) -> Result<(), SnapshotError> {
    std::fs::write(path, content).map_err(|e| SnapshotError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
