// ============================================================
// Layer 6 — Run Paths
// ============================================================
// Output file names for one scoring run.
//
// Every run draws a short random id, so highlighted copies from
// two runs never overwrite each other:
//
//   out/
//     highlighted_a8Kq20Zx_jane_doe.pdf
//     highlighted_a8Kq20Zx_john_roe.pdf
//     highlighted_P3nn0cTe_jane_doe.pdf   ← a later run

use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;

const RUN_ID_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct RunPaths {
    out_dir: PathBuf,
    run_id:  String,
}

impl RunPaths {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        let run_id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RUN_ID_LEN)
            .map(char::from)
            .collect();
        Self::with_run_id(out_dir, run_id)
    }

    pub fn with_run_id(out_dir: impl Into<PathBuf>, run_id: impl Into<String>) -> Self {
        Self { out_dir: out_dir.into(), run_id: run_id.into() }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Where the highlighted copy of `source` goes in this run
    pub fn highlighted(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        self.out_dir.join(format!("highlighted_{}_{}", self.run_id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighted_path() {
        let paths = RunPaths::with_run_id("out", "abc123");
        assert_eq!(
            paths.highlighted(Path::new("/cvs/jane.pdf")),
            PathBuf::from("out/highlighted_abc123_jane.pdf")
        );
    }

    #[test]
    fn test_run_ids_are_alphanumeric_and_distinct() {
        let a = RunPaths::new("out");
        let b = RunPaths::new("out");
        assert_eq!(a.run_id().len(), RUN_ID_LEN);
        assert!(a.run_id().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.run_id(), b.run_id());
    }
}
