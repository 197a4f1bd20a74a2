//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::with_library();
//!     fixture.command().args(["prepare", "--artifact-id", "billing"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{library_dir, TestFixture};
}

/// The checked-in recipe library under `tests/testdata/recipe-library`.
pub fn library_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join("recipe-library")
}

/// A temporary project directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::with_library().with_file("extra.yml", "name: Extra\n");
/// assert!(fixture.path().join("merge-rules.yml").exists());
/// ```
#[allow(dead_code)]
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// A project directory holding a copy of the recipe library.
    pub fn with_library() -> Self {
        let fixture = Self::new();
        fixture
            .temp_dir
            .copy_from(library_dir(), &["**/*"])
            .expect("Failed to copy recipe library");
        fixture
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `recipe-prepare` command run from inside the fixture, with the
    /// environment overrides cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("recipe-prepare");
        cmd.current_dir(self.path());
        for var in [
            "RECIPE_PREPARE_PROJECT_DIR",
            "RECIPE_PREPARE_RULES",
            "RECIPE_PREPARE_RECIPE_DIR",
            "RECIPE_PREPARE_OUTPUT",
            "RECIPE_PREPARE_VAR_MAP",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
