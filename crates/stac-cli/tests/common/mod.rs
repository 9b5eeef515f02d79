//! Shared E2E test helpers for `stac` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Tree used by most tests.
pub const SAMPLE_TREE: &str = r#"
[a]
b = "BINARY"

[a."*"]
"**/*" = "ANY"

[media]
"*" = ["IMAGE", "BINARY"]
"#;

/// A project directory with `.stac/config.toml` and a tree file.
///
/// `HOME` points into the same temp dir so the user's global config is
/// never read.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    /// Creates a project declaring the `image` kind and [`SAMPLE_TREE`].
    pub fn sample() -> Self {
        Self::with_tree("access.toml", SAMPLE_TREE)
    }

    /// Creates a project whose config points at `file_name` holding `tree`.
    pub fn with_tree(file_name: &str, tree: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp project dir");
        let stac_dir = dir.path().join(".stac");
        std::fs::create_dir_all(&stac_dir).expect("create .stac");
        std::fs::write(
            stac_dir.join("config.toml"),
            format!("kinds = [\"image\"]\n\n[tree]\nfile = \"{file_name}\"\n"),
        )
        .expect("write config");
        std::fs::write(stac_dir.join(file_name), tree).expect("write tree");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Builds a `stac -C <project>` command with an isolated environment.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = stac_cmd_raw();
        cmd.env("HOME", self.path());
        cmd.args(["-C", self.path().to_str().expect("valid utf8")]);
        cmd
    }
}

/// Build a bare Command with `STAC_*` and `RUST_LOG` cleared.
pub fn stac_cmd_raw() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("stac");
    cmd.timeout(TIMEOUT_BASIC);
    for var in ["STAC_DEBUG", "STAC_TREE_FILE", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}
