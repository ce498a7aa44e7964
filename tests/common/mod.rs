#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use httpmock::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper struct to run locker commands in an isolated temp directory
pub struct LockerTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
}

impl LockerTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        LockerTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_locker"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(self.binary_path);
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("LOCKER_ROOT")
            .env_remove("LOCKER_API_URL")
            .env_remove("LOCKER_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute locker command")
    }

    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn locker command");
        child
            .stdin
            .take()
            .expect("stdin was piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child
            .wait_with_output()
            .expect("Failed to wait for locker command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert_success(args, &output);
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

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".locker");
        fs::create_dir_all(&dir).expect("Failed to create .locker directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.temp_dir.path().join(".locker").join("config.yaml"))
            .expect("Failed to read config file")
    }
}

pub fn assert_success(args: &[&str], output: &Output) {
    if !output.status.success() {
        panic!(
            "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Backend payload with locker L1 in Espoo holding cabinet c1 (#3, code 9921).
pub fn espoo_lockers(status: &str) -> Value {
    json!({
        "lockers": [{
            "id": "L1",
            "location": "Espoo",
            "cabinets": [
                {"_id": "c1", "cabinetNumber": 3, "code": "9921", "status": status}
            ]
        }]
    })
}

/// Backend payload with transaction t1 pointing at cabinet c1.
pub fn espoo_transactions() -> Value {
    json!({
        "transactions": [
            {"_id": "t1", "CabinetId": "c1", "parcelStatus": "in transit"}
        ]
    })
}

/// Register the two read endpoints on `server`.
pub fn mock_reads(server: &MockServer, lockers: Value, transactions: Value) {
    server.mock(|when, then| {
        when.method(GET).path("/api/lockers");
        then.status(200).json_body(lockers);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/transactions");
        then.status(200).json_body(transactions);
    });
}
