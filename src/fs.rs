use std::path::{Path, PathBuf};

use anyhow::Result;
use simple_error::simple_error;

/// Creates `path` and any missing parents, succeeding if it already is a directory.
pub async fn assert_dir(path: impl AsRef<Path>) -> Result<()> {
    match tokio::fs::metadata(path.as_ref()).await {
        Ok(meta) => {
            if meta.is_dir() {
                Ok(())
            } else {
                let path = path.as_ref().display();
                Err(simple_error!("`{}` exists but is not a directory", path).into())
            }
        }
        Err(_) => Ok(tokio::fs::create_dir_all(path.as_ref()).await?),
    }
}

pub async fn exists(path: impl AsRef<Path>) -> Result<bool> {
    Ok(tokio::fs::try_exists(path.as_ref()).await?)
}

/// First of `<stem>.<ext>`, `<stem>_1.<ext>`, `<stem>_2.<ext>`, ... that doesn't exist in `dir`.
pub async fn unique_path(dir: &Path, stem: &str, ext: &str) -> Result<PathBuf> {
    let mut path = dir.join(format!("{stem}.{ext}"));
    let mut idx = 0;
    while exists(&path).await? {
        idx += 1;
        path = dir.join(format!("{stem}_{idx}.{ext}"));
    }
    Ok(path)
}
