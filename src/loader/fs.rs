use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{LoadOutcome, ObjectLoader};

/// Loader reading `{root}/{bucket}/{key}` from the local filesystem
///
/// Useful for local development against a mirrored bucket layout. Keys that
/// try to leave the bucket directory (`..`, absolute paths) load as
/// not-found.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn map_path(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        let mut pb = self.root.clone();
        for part in [bucket, key] {
            for comp in Path::new(part.trim_start_matches('/')).components() {
                match comp {
                    Component::Normal(s) => pb.push(s),
                    Component::CurDir => {}
                    _ => return None,
                }
            }
        }
        Some(pb)
    }
}

impl ObjectLoader for FsLoader {
    fn load(&self, bucket: &str, key: &str) -> LoadOutcome {
        let Some(path) = self.map_path(bucket, key) else {
            debug!(bucket, key, "Refusing key outside bucket");
            return LoadOutcome::NotFound;
        };
        if path.is_dir() {
            return LoadOutcome::NotFound;
        }
        match fs::read(&path) {
            Ok(bytes) => LoadOutcome::Found(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => LoadOutcome::NotFound,
            Err(e) => LoadOutcome::Failed(format!("{}: {}", path.display(), e)),
        }
    }
}
