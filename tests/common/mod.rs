#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the `ghp` binary against an isolated config directory
pub struct GhpTest {
    pub temp_dir: TempDir,
}

impl GhpTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        GhpTest { temp_dir }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(ghp_binary());
        cmd.env("GHP_CONFIG_DIR", self.temp_dir.path())
            .env_remove("GITHUB_TOKEN")
            .env_remove("RUST_LOG")
            .current_dir(self.temp_dir.path());
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute ghp command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }
}

pub fn ghp_binary() -> &'static str {
    env!("CARGO_BIN_EXE_ghp")
}
