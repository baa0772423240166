#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for the DSP library bridge: records each request and answers
/// with `responses/<command>.json`, or fails when `responses/<command>.fail`
/// exists.
const FAKE_BRIDGE: &str = r#"#!/bin/sh
cmd="$1"
dir="$(dirname "$0")"
cat > "$dir/requests/$cmd.json"
if [ -f "$dir/responses/$cmd.fail" ]; then
    cat "$dir/responses/$cmd.fail" >&2
    exit 3
fi
cat "$dir/responses/$cmd.json"
"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub bridge_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        let bridge_dir = tmp.path().join("bridge");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        fs::create_dir_all(bridge_dir.join("requests")).expect("create requests dir");
        fs::create_dir_all(bridge_dir.join("responses")).expect("create responses dir");

        let script = bridge_dir.join("fake-bridge");
        fs::write(&script, FAKE_BRIDGE).expect("write fake bridge");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("make fake bridge executable");

        Self {
            _tmp: tmp,
            home,
            work,
            bridge_dir,
        }
    }

    pub fn bridge(&self) -> PathBuf {
        self.bridge_dir.join("fake-bridge")
    }

    /// Isolated invocation that does not point at the fake bridge.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("dspctl");
        cmd.current_dir(&self.work)
            .env("HOME", &self.home)
            .env("NO_COLOR", "1")
            .env_remove("DSPCTL_BRIDGE")
            .env_remove("DSPCTL_PASSWORD")
            .env_remove("DSPCTL_PASSPHRASE")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--bridge").arg(self.bridge());
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn respond(&self, command: &str, body: Value) {
        fs::write(
            self.bridge_dir.join("responses").join(format!("{}.json", command)),
            body.to_string(),
        )
        .expect("write canned response");
    }

    pub fn fail(&self, command: &str, stderr: &str) {
        fs::write(
            self.bridge_dir.join("responses").join(format!("{}.fail", command)),
            stderr,
        )
        .expect("write failure marker");
    }

    pub fn request(&self, command: &str) -> Value {
        let raw = fs::read_to_string(self.request_path(command)).expect("request recorded");
        serde_json::from_str(&raw).expect("request is json")
    }

    pub fn was_called(&self, command: &str) -> bool {
        self.request_path(command).exists()
    }

    fn request_path(&self, command: &str) -> PathBuf {
        self.bridge_dir
            .join("requests")
            .join(format!("{}.json", command))
    }

    pub fn write_work_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, contents).expect("write work file");
        p
    }

    pub fn write_system(&self, name: &str) -> PathBuf {
        self.write_work_file(name, system_description().to_string().as_bytes())
    }

    pub fn work_path(&self, name: &str) -> PathBuf {
        self.work.join(name)
    }
}

pub fn system_description() -> Value {
    serde_json::json!({
        "name": "living-room",
        "input_channels": [{"name": "in_l"}, {"name": "in_r"}],
        "output_channels": [{"name": "out_l"}, {"name": "out_r"}],
        "scratch_buffers": [{"name": "tmp0"}],
        "dsp_blocks": [
            {"name": "eq", "type": "Biquad", "parameters": {"frequency": 120.0, "gain": -3.0}}
        ]
    })
}

pub fn count_lines(output: &[u8], needle: &str) -> usize {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|l| l.contains(needle))
        .count()
}

pub fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|x| x == ext).unwrap_or(false))
        .collect();
    out.sort();
    out
}
