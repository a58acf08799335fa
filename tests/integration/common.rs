use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding a config file for one test run.
pub struct TestConfig {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestConfig {
    /// Write an `[upgrade]` table pointing at `server_uri`.
    pub fn for_server(server_uri: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let scratch_dir = dir.path().join("scratch");
        std::fs::create_dir_all(&scratch_dir).unwrap();

        let content = format!(
            "[upgrade]\n\
             releases_url = \"{server_uri}/releases.json\"\n\
             download_base_url = \"{server_uri}/releases\"\n\
             scratch_dir = {scratch_dir:?}\n\
             request_timeout_secs = 5\n"
        );
        Self::with_content(dir, &content)
    }

    /// Write arbitrary `content` as the config file.
    pub fn raw(content: &str) -> Self {
        Self::with_content(TempDir::new().unwrap(), content)
    }

    fn with_content(dir: TempDir, content: &str) -> Self {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        Self { dir, path }
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }
}

/// `uplift` with a clean environment and the given config file.
pub fn uplift(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("uplift").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("UPLIFT_CONFIG")
        .arg("--no-progress")
        .arg("--config")
        .arg(config);
    cmd
}

/// The release feed body listing `names`, newest first.
pub fn feed(names: &[&str]) -> String {
    let entries: Vec<_> = names.iter().map(|name| serde_json::json!({ "name": name })).collect();
    serde_json::Value::Array(entries).to_string()
}
