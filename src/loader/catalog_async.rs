//! Async catalog loading
//!
//! Reads catalog files on the tokio runtime. Several catalogs can be loaded
//! concurrently; the first failure aborts the batch.

use crate::loader::Catalog;
use crate::{CombatError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Load and validate one catalog file
pub async fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = tokio::fs::read_to_string(path).await?;
    Catalog::from_json_str(&text)
}

/// Load several catalogs in parallel
///
/// Results keep the order of `paths`. Returns the catalogs and the wall
/// time spent.
pub async fn load_catalogs(paths: &[PathBuf]) -> Result<(Vec<Catalog>, Duration)> {
    let start = Instant::now();

    let mut tasks = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.clone();
        tasks.push((path.clone(), tokio::spawn(async move { load_catalog(&path).await })));
    }

    let mut catalogs = Vec::with_capacity(tasks.len());
    for (path, task) in tasks {
        match task.await {
            Ok(Ok(catalog)) => catalogs.push(catalog),
            Ok(Err(CombatError::IoError(e))) => {
                return Err(CombatError::InvalidCatalog(format!("{}: {e}", path.display())));
            }
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok((catalogs, start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_catalog(name: &str, catalog: &Catalog) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dice_combat_{}_{name}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(catalog).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_catalogs_keeps_order() {
        let first = Catalog::builtin();
        let mut second = Catalog::builtin();
        second.inventory.max_health = 99;

        let paths = vec![temp_catalog("first", &first), temp_catalog("second", &second)];
        let (catalogs, _) = load_catalogs(&paths).await.unwrap();

        assert_eq!(catalogs.len(), 2);
        assert_eq!(catalogs[0].inventory.max_health, 40);
        assert_eq!(catalogs[1].inventory.max_health, 99);

        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let paths = vec![PathBuf::from("/nonexistent/catalog.json")];
        let err = load_catalogs(&paths).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
