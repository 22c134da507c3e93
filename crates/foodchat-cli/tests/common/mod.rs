//! Shared helpers for the `foodchat` binary tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// The `foodchat` binary Cargo built for this test run.
pub fn foodchat_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_foodchat"))
}

/// An isolated FoodChat home directory.
///
/// Commands built from it never see the caller's real `~/.foodchat`, never
/// prompt on the terminal, and print English messages.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A `foodchat` command bound to this home.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(foodchat_bin());
        cmd.env("HOME", self.path())
            .env("FOODCHAT_HOME", self.path())
            .env("FOODCHAT_LOCALE", "en")
            .env("FOODCHAT_NO_PROMPT", "1")
            .env_remove("FOODCHAT_CONFIG")
            .env_remove("FOODCHAT_PASSPHRASE")
            .env_remove("FOODCHAT_NEW_PASSPHRASE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `foodchat <args>` with an optional passphrase in the environment.
    pub fn run(&self, args: &[&str], passphrase: Option<&str>) -> Output {
        let mut cmd = self.command();
        cmd.args(args);
        if let Some(passphrase) = passphrase {
            cmd.env("FOODCHAT_PASSPHRASE", passphrase);
        }
        cmd.output().expect("failed to run foodchat")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
