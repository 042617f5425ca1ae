use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::grid::Grid;

/// Failure while saving or loading a persisted grid.
///
/// Load failures are recoverable by design: `load_grid` either returns a
/// fully validated grid or an error, so the caller's in-memory state is
/// never partially overwritten by corrupt data.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "could not access saved state: {e}"),
            StoreError::Parse(e) => write!(f, "saved state is corrupted: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e)
    }
}

/// Write the grid to `path` as a nested JSON array of 0/1 integers.
pub fn save_grid(path: &Path, grid: &Grid) -> Result<(), StoreError> {
    let json = serde_json::to_string(grid)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and validate a grid from `path`.
///
/// Shape and cell-value validation happens inside `Grid`'s deserializer,
/// so malformed data (not an array, ragged rows, non-binary values) comes
/// back as `StoreError::Parse` with a human-readable message.
pub fn load_grid(path: &Path) -> Result<Grid, StoreError> {
    let json = fs::read_to_string(path)?;
    let grid = serde_json::from_str(&json)?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{pattern_glider, Grid};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lifetorus_test_{name}"))
    }

    #[test]
    fn roundtrip_empty_random_and_handbuilt() {
        let path = temp_path("roundtrip.json");

        let mut handbuilt = Grid::empty_default();
        handbuilt.place_pattern(&pattern_glider(), None);

        let grids = [
            Grid::empty_default(),
            Grid::random(30, 30, 0.3, &mut StdRng::seed_from_u64(11)),
            handbuilt,
        ];
        for grid in &grids {
            save_grid(&path, grid).unwrap();
            assert_eq!(&load_grid(&path).unwrap(), grid);
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = temp_path("does_not_exist.json");
        let _ = fs::remove_file(&path);
        assert!(matches!(load_grid(&path), Err(StoreError::Io(_))));
    }

    #[test]
    fn load_malformed_reports_not_crashes() {
        let path = temp_path("malformed.json");
        for bad in ["not json", "42", "[[0,1],[1]]", "[[0,5]]", "{}"] {
            fs::write(&path, bad).unwrap();
            let err = load_grid(&path).unwrap_err();
            assert!(matches!(err, StoreError::Parse(_)), "input {bad:?}");
            // Error renders a human-readable message for the UI.
            assert!(!err.to_string().is_empty());
        }
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_load_leaves_caller_state_untouched() {
        let path = temp_path("untouched.json");
        fs::write(&path, "[[0,1],[1]]").unwrap();

        let current = Grid::random(30, 30, 0.3, &mut StdRng::seed_from_u64(5));
        let kept = current.clone();
        // Callers only replace their grid on Ok, so an Err means the
        // existing grid stays exactly as it was.
        if let Ok(loaded) = load_grid(&path) {
            panic!("malformed load unexpectedly succeeded: {loaded:?}");
        }
        assert_eq!(current, kept);

        let _ = fs::remove_file(&path);
    }
}
