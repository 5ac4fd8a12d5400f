use std::{fs, path::PathBuf};

/// Structure to manage temporary key files that are automatically cleaned up
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Write `contents` to a file named after the test
    pub fn new(test_name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir()
            .join(format!("bloomguard_{}_{}.csv", test_name, std::process::id()));
        fs::write(&path, contents).expect("Failed to write test file");
        Self { path }
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Helper function to generate consistent test keys
#[allow(dead_code)]
pub fn generate_test_items(prefix: &str, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("{}_{:06}", prefix, i).into_bytes())
        .collect()
}
