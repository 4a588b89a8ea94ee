use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Variables the binary reads that must not leak in from the developer's shell.
const CONFIG_VARS: &[&str] = &[
    "ASANA_TOKEN",
    "WORKSPACE_ID",
    "TEST_PROJECT_ID",
    "ENVIRONMENT",
    "ROLLOVER_CONFIG",
    "ROLLOVER_ASANA_TOKEN",
    "ROLLOVER_WORKSPACE_ID",
    "ROLLOVER_TEST_PROJECT_ID",
    "ROLLOVER_ENVIRONMENT",
    "ROLLOVER_TIMEZONE",
    "ROLLOVER_API_BASE_URL",
    "ROLLOVER_PAGE_SIZE",
    "RUST_LOG_FORMAT",
];

/// Test harness for running CLI commands from an isolated working directory
pub struct CliTestHarness {
    temp_dir: TempDir,
    api_base_url: Option<String>,
}

impl CliTestHarness {
    /// Create a new test harness with an empty working directory
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self {
            temp_dir,
            api_base_url: None,
        }
    }

    /// Point the binary at a mock API server
    pub fn with_api(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: Some(base_url.into()),
            ..Self::new()
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        std::fs::write(self.dir().join(name), contents).expect("Failed to write file");
    }

    /// Command with no configuration at all
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("rollover").expect("Failed to find rollover binary");
        cmd.current_dir(self.dir());
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.env("ROLLOVER_TIMEZONE", "UTC");
        cmd.env("RUST_LOG", "warn");
        if let Some(ref url) = self.api_base_url {
            cmd.env("ROLLOVER_API_BASE_URL", url);
        }
        cmd
    }

    /// Command with a complete test-mode configuration
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.env("ASANA_TOKEN", "test-token")
            .env("WORKSPACE_ID", "42")
            .env("TEST_PROJECT_ID", "1200")
            .env("ENVIRONMENT", "test");
        cmd
    }

    /// Helper to run a configured command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a configured command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
    }

    /// Predicate to check if output contains the preview table headers
    pub fn has_plan_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Name"))
            .and(predicate::str::contains("New Due"))
            .and(predicate::str::contains("Status"))
    }
}
