//! Integration tests for Tessera

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const SECRET: &str = "k";

    /// Workspace with its own config so tests never touch the real home dirs
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let artifacts = dir.path().join("artifacts");
            let config = format!(
                "[general]\naudit_log = false\n\n[artifacts]\ndir = {:?}\n",
                artifacts.display().to_string()
            );
            std::fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn artifacts(&self) -> PathBuf {
            self.dir.path().join("artifacts")
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("tessera");
            cmd.env_remove("TESSERA_SECRET")
                .env("TESSERA_CONFIG", self.config_path());
            cmd
        }

        fn signed(&self, secret: &str) -> Command {
            let mut cmd = self.cmd();
            cmd.env("TESSERA_SECRET", secret);
            cmd
        }

        fn issue(&self, secret: &str) -> String {
            let output = self
                .signed(secret)
                .args([
                    "issue",
                    "--subject",
                    "A001",
                    "--name",
                    "Jane Doe",
                    "--route",
                    "R12",
                    "--expires",
                    "2025-01-01",
                    "--issued",
                    "2024-01-01",
                ])
                .assert()
                .success()
                .get_output()
                .stdout
                .clone();
            let body: serde_json::Value = serde_json::from_slice(&output).unwrap();
            assert_eq!(body["payload"], "A001|Jane Doe|R12|2025-01-01|2024-01-01");
            body["token"].as_str().unwrap().to_string()
        }
    }

    fn is_png(path: &Path) -> bool {
        std::fs::read(path)
            .map(|bytes| bytes.starts_with(b"\x89PNG\r\n\x1a\n"))
            .unwrap_or(false)
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("tessera")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Signed entitlement tokens"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("tessera")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tessera"));
    }

    #[test]
    fn issue_requires_secret() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["issue", "--subject", "A001", "--expires", "2025-01-01"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Signing secret not configured"))
            .stderr(predicate::str::contains("TESSERA_SECRET"));
    }

    #[test]
    fn issue_rejects_delimiter_in_name() {
        let ws = Workspace::new();
        ws.signed(SECRET)
            .args([
                "issue",
                "--subject",
                "A001",
                "--name",
                "Jane|Doe",
                "--expires",
                "2025-01-01",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("reserved delimiter"));
    }

    #[test]
    fn issued_token_verifies() {
        let ws = Workspace::new();
        let token = ws.issue(SECRET);

        ws.signed(SECRET)
            .args(["verify", token.as_str(), "--route", "r12", "--today", "2024-06-01"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"ALLOW\""))
            .stdout(predicate::str::contains("Jane Doe"));
    }

    #[test]
    fn wrong_secret_is_untrusted() {
        let ws = Workspace::new();
        let token = ws.issue(SECRET);

        ws.signed("another-secret")
            .args(["verify", token.as_str(), "--today", "2024-06-01"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("NO_ENTRY"))
            .stdout(predicate::str::contains("untrusted-token"))
            .stdout(predicate::str::contains("A001").not());
    }

    #[test]
    fn malformed_token_is_untrusted() {
        let ws = Workspace::new();
        ws.signed(SECRET)
            .args(["verify", "not-a-token"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("untrusted-token"));
    }

    #[test]
    fn expired_and_wrong_route_are_denied() {
        let ws = Workspace::new();
        let token = ws.issue(SECRET);

        ws.signed(SECRET)
            .args(["verify", token.as_str(), "--today", "2025-01-02"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("expired"));

        ws.signed(SECRET)
            .args(["verify", token.as_str(), "--route", "R7", "--today", "2024-06-01"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("route-mismatch"));
    }

    #[test]
    fn artifact_is_created_once() {
        let ws = Workspace::new();
        let args = [
            "artifact",
            "--subject",
            "A001",
            "--route",
            "R12",
            "--expires",
            "2025-01-01",
        ];

        ws.signed(SECRET)
            .args(args)
            .assert()
            .success()
            .stdout(predicate::str::contains("A001.png"));

        let path = ws.artifacts().join("A001.png");
        assert!(is_png(&path));
        let first = std::fs::read(&path).unwrap();

        // A changed route does not refresh the stored artifact.
        let out = ws.dir.path().join("copy.png");
        ws.signed(SECRET)
            .args(["artifact", "--subject", "A001", "--route", "R99"])
            .args(["--expires", "2026-01-01", "--out"])
            .arg(&out)
            .assert()
            .success();

        assert_eq!(std::fs::read(&path).unwrap(), first);
        assert_eq!(std::fs::read(&out).unwrap(), first);
    }

    #[test]
    fn artifact_key_is_sanitized() {
        let ws = Workspace::new();
        ws.signed(SECRET)
            .args(["artifact", "--subject", "1RV22/CS 001", "--expires", "2025-01-01"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1RV22_CS_001.png"));

        assert!(is_png(&ws.artifacts().join("1RV22_CS_001.png")));
    }

    #[test]
    fn list_shows_artifacts() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No artifacts stored"));

        ws.signed(SECRET)
            .args(["artifact", "--subject", "A001", "--expires", "2025-01-01"])
            .assert()
            .success();

        ws.cmd()
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::diff("A001.png\n"));
    }

    #[test]
    fn config_path() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[artifacts]"))
            .stdout(predicate::str::contains("audit_log = false"));
    }
}
