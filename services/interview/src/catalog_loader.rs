use anyhow::{Context, Result};
use interview_core::QuestionCatalog;
use interview_core::catalog::IndustryPools;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Loads a question catalog from a directory holding one `<mode>.json` file
/// per mode, each an object of industry → list of questions.
pub fn load_catalog(dir_path: &Path) -> Result<QuestionCatalog> {
    let mut modes = HashMap::new();

    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read catalog directory: {}", dir_path.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            let mode = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem for catalog file")?
                .to_string();

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
            let pools: IndustryPools = serde_json::from_str(&content)
                .with_context(|| format!("Catalog file is not valid JSON: {}", path.display()))?;

            tracing::debug!("Loaded {} industries for mode '{}'", pools.len(), mode);
            modes.insert(mode, pools);
        }
    }

    QuestionCatalog::new(modes)
        .with_context(|| format!("Invalid question catalog in {}", dir_path.display()))
}
