use std::path::{Path, PathBuf};

/// Place the derived file next to its input: `obs.csv` -> `obs-derived.csv`
pub fn derived_filename_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "observations".to_string());
    input.with_file_name(format!("{}-derived.csv", stem))
}
