//! Integration Tests for the Chirpy CLI
//!
//! These tests drive the `chirpy` binary end to end against a scratch
//! database:
//! - Database creation and status
//! - User creation, login and upgrades
//! - Chirp creation, filtering and ownership-checked deletes
//! - Refresh and revocation of tokens

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SECRET: &str = "integration-secret";

/// One scratch database plus a way to run commands against it
struct TestEnv {
    db: PathBuf,
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("database.json");
        Self { db, dir }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_chirpy"))
            .arg("--db")
            .arg(&self.db)
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("JWT_SECRET")
            .env_remove("CHIRPY_STORE_PATH")
            .env("CHIRPY_AUTH_JWT_SECRET", SECRET)
            .env("CHIRPY_LOG_LEVEL", "error")
            .output()
            .unwrap()
    }

    /// Run a command expected to succeed and parse its stdout
    fn json(&self, args: &[&str]) -> Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "chirpy {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn fails(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(!output.status.success(), "chirpy {:?} unexpectedly succeeded", args);
        String::from_utf8_lossy(&output.stderr).into_owned()
    }

    fn db_contents(&self) -> Value {
        read_json(&self.db)
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn test_init_creates_empty_database() {
    let env = TestEnv::new();
    let out = env.json(&["init"]);

    assert_eq!(out["stats"]["users_count"], 0);
    assert_eq!(env.db_contents(), serde_json::json!({}));
}

#[test]
fn test_user_lifecycle() {
    let env = TestEnv::new();

    let created = env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);
    assert_eq!(created["id"], 1);
    assert_eq!(created["is_chirpy_red"], false);
    assert!(created.get("password").is_none());

    let err = env.fails(&["user", "create", "--email", "a@b.com", "--password", "other"]);
    assert!(err.contains("a@b.com"));

    let updated = env.json(&["user", "update", "1", "--email", "c@d.com", "--password", "pw2"]);
    assert_eq!(updated["email"], "c@d.com");

    let listed = env.json(&["user", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // The stored record keeps the password; only the output hides it
    assert_eq!(env.db_contents()["users"]["1"]["password"], "pw2");
}

#[test]
fn test_upgrade_by_id_and_by_event() {
    let env = TestEnv::new();
    env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);
    env.json(&["user", "create", "--email", "c@d.com", "--password", "pw"]);

    let upgraded = env.json(&["user", "upgrade", "1"]);
    assert_eq!(upgraded["is_chirpy_red"], true);

    let ignored = env.json(&[
        "user",
        "upgrade",
        "--event",
        r#"{"event":"user.downgraded","data":{"user_id":2}}"#,
    ]);
    assert_eq!(ignored["ignored"], "user.downgraded");
    assert_eq!(env.json(&["user", "get", "2"])["is_chirpy_red"], false);

    let upgraded = env.json(&[
        "user",
        "upgrade",
        "--event",
        r#"{"event":"user.upgraded","data":{"user_id":2}}"#,
    ]);
    assert_eq!(upgraded["id"], 2);
    assert_eq!(upgraded["is_chirpy_red"], true);

    env.fails(&["user", "upgrade", "9"]);
}

#[test]
fn test_chirp_create_filters_and_limits_body() {
    let env = TestEnv::new();
    env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);

    let chirp = env.json(&["chirp", "create", "--author", "1", "what a Kerfuffle today"]);
    assert_eq!(chirp["body"], "what a **** today");
    assert_eq!(chirp["author_id"], 1);

    let long_body = "x".repeat(141);
    let err = env.fails(&["chirp", "create", "--author", "1", &long_body]);
    assert!(err.contains("too long"));
    assert_eq!(env.json(&["status"])["chirps_count"], 1);
}

#[test]
fn test_chirp_delete_requires_owner() {
    let env = TestEnv::new();
    env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);
    env.json(&["user", "create", "--email", "c@d.com", "--password", "pw"]);
    env.json(&["chirp", "create", "--author", "1", "first"]);
    env.json(&["chirp", "create", "--author", "2", "second"]);

    env.fails(&["chirp", "delete", "1", "--as", "2"]);
    env.json(&["chirp", "delete", "1", "--as", "1"]);

    let listed = env.json(&["chirp", "list"]);
    let bodies: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["second"]);
}

#[test]
fn test_chirp_list_order_and_author_filter() {
    let env = TestEnv::new();
    env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);
    env.json(&["user", "create", "--email", "c@d.com", "--password", "pw"]);
    for (author, body) in [("1", "one"), ("2", "two"), ("1", "three")] {
        env.json(&["chirp", "create", "--author", author, body]);
    }

    let ids = |v: Value| -> Vec<u64> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_u64().unwrap())
            .collect()
    };
    assert_eq!(ids(env.json(&["chirp", "list"])), vec![1, 2, 3]);
    assert_eq!(ids(env.json(&["chirp", "list", "--desc"])), vec![3, 2, 1]);
    assert_eq!(ids(env.json(&["chirp", "list", "--author", "1"])), vec![1, 3]);
}

#[test]
fn test_login_refresh_revoke_flow() {
    let env = TestEnv::new();
    env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);

    env.fails(&["user", "login", "--email", "a@b.com", "--password", "wrong"]);

    let session = env.json(&["user", "login", "--email", "a@b.com", "--password", "pw"]);
    assert_eq!(session["id"], 1);
    let access = session["token"].as_str().unwrap().to_string();
    let refresh = session["refresh_token"].as_str().unwrap().to_string();

    // Access token identifies the author
    let chirp = env.json(&["chirp", "create", "--token", &access, "hello"]);
    assert_eq!(chirp["author_id"], 1);

    let refreshed = env.json(&["token", "refresh", &refresh]);
    assert!(refreshed["token"].is_string());

    // An access token is not a refresh token
    env.fails(&["token", "refresh", &access]);

    env.json(&["token", "revoke", &refresh]);
    let err = env.fails(&["token", "refresh", &refresh]);
    assert!(err.contains("revoked"));

    let checked = env.json(&["token", "check", "--purpose", "refresh", &refresh]);
    assert_eq!(checked["revoked"], true);
    assert_eq!(checked["claims"]["iss"], "chirpy-refresh");

    let tokens = env.db_contents()["tokens"].clone();
    assert_eq!(tokens["1"]["id"], refresh.as_str());
    assert!(tokens["1"]["revokeTime"].is_string());
}

#[test]
fn test_token_issue_and_check() {
    let env = TestEnv::new();
    let issued = env.json(&["token", "issue", "7", "--ttl", "5m"]);
    let token = issued["token"].as_str().unwrap();

    let checked = env.json(&["token", "check", token]);
    assert_eq!(checked["claims"]["sub"], "7");
    assert_eq!(checked["revoked"], false);
    let claims = &checked["claims"];
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        300
    );

    env.fails(&["token", "check", "--purpose", "refresh", token]);
    env.fails(&["token", "check", "not.a.token"]);
}

#[test]
fn test_token_issue_rejects_out_of_range_ttl() {
    let env = TestEnv::new();
    let err = env.fails(&["token", "issue", "1", "--ttl", "1000000years"]);
    assert!(err.contains("Invalid token lifetime"));
    assert!(!err.contains("panicked"));
}

#[test]
fn test_config_show_redacts_secret() {
    let env = TestEnv::new();
    let shown = env.json(&["config", "show"]);

    assert_eq!(shown["auth"]["jwt_secret"], "<redacted>");
    assert_eq!(shown["content"]["max_chirp_length"], 140);
    assert_eq!(shown["store"]["path"], env.db.to_str().unwrap());
}

#[test]
fn test_config_file_is_honoured() {
    let env = TestEnv::new();
    let config_path = env.dir.path().join("chirpy.toml");
    std::fs::write(&config_path, "[content]\nmax_chirp_length = 6\nbanned_words = []\n").unwrap();
    let config_arg = config_path.to_str().unwrap();

    env.json(&["user", "create", "--email", "a@b.com", "--password", "pw"]);
    env.fails(&["--config", config_arg, "chirp", "create", "--author", "1", "sevens7"]);
    let chirp = env.json(&["--config", config_arg, "chirp", "create", "--author", "1", "fornax"]);
    assert_eq!(chirp["body"], "fornax");
}
