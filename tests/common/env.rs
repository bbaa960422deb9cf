//! Isolated environment for running the droidprep binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a droidprep command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Temp working directory and HOME, with config discovery pinned inside.
pub struct TestEnv {
    pub root: TempDir,
    pub home: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("temp root"),
            home: TempDir::new().expect("temp home"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_droidprep")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.path(relative);
        fs::write(&path, content).expect("write fixture");
        path
    }

    /// Shell script answering `adb devices` with `listing` and failing
    /// everything else.
    #[cfg(unix)]
    pub fn fake_adb(&self, listing: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"devices\" ]; then\ncat <<'EOF'\nList of devices attached\n{}\nEOF\nexit 0\nfi\necho \"unexpected: $*\" >&2\nexit 1\n",
            listing
        );
        let path = self.write("adb", script.as_bytes());
        let mut perms = fs::metadata(&path).expect("stat adb").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod adb");
        path
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.root.path())
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("XDG_CACHE_HOME", self.home.path().join(".cache"))
            .env("NO_COLOR", "1")
            .env_remove("DROIDPREP_ADB")
            .env_remove("DROIDPREP_OPENSSL")
            .env_remove("DROIDPREP_CERT_FILE")
            .env_remove("DROIDPREP_FRIDA_VERSION")
            .env_remove("DROIDPREP_FRIDA_CACHE")
            .env_remove("DROIDPREP_TIMEOUT_SECS");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute droidprep");
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

pub fn display(path: &Path) -> String {
    path.display().to_string()
}
