//! Source scanning for the layering contract.
//!
//! The tree under `src/` is read once into memory; each query filters it by
//! path prefix and reports matches with their location.

use std::fs;
use std::path::{Path, PathBuf};

/// One offending source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub path: String,
    pub line: usize,
    pub text: String,
}

/// Every `.rs` file under `src/`, keyed by crate-relative path.
pub struct SourceTree {
    files: Vec<(String, String)>,
}

impl SourceTree {
    pub fn load() -> Self {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let mut paths = Vec::new();
        walk(&root.join("src"), &mut paths);
        paths.sort();

        let files = paths
            .into_iter()
            .map(|path| {
                let contents = fs::read_to_string(&path)
                    .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
                let relative = path
                    .strip_prefix(&root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                (relative, contents)
            })
            .collect();
        Self { files }
    }

    pub fn has_file(&self, relative: &str) -> bool {
        self.files.iter().any(|(path, _)| path == relative)
    }

    /// Lines under `prefix` containing any of `patterns`.
    pub fn lines_matching(&self, prefix: &str, patterns: &[&str]) -> Vec<Hit> {
        self.scan(prefix, |_, line| patterns.iter().any(|p| line.contains(p)))
    }

    /// Lines in `mod.rs` files that do more than declare or re-export modules.
    pub fn non_export_mod_lines(&self) -> Vec<Hit> {
        self.scan("src", |path, line| {
            if !path.ends_with("/mod.rs") {
                return false;
            }
            let line = line.trim();
            !(line.is_empty()
                || line.starts_with("//")
                || line.starts_with("pub mod ")
                || line.starts_with("mod ")
                || line.starts_with("pub use ")
                || line.starts_with("#[cfg"))
        })
    }

    fn scan(&self, prefix: &str, offends: impl Fn(&str, &str) -> bool) -> Vec<Hit> {
        self.files
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .flat_map(|(path, contents)| {
                contents
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| offends(path, line))
                    .map(|(idx, line)| Hit {
                        path: path.clone(),
                        line: idx + 1,
                        text: line.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("failed to read dir {}: {e}", dir.display()));
    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("failed to read dir entry: {e}"))
            .path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}
