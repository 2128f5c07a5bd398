//! Integration tests for the `sitekit` binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SITE: &str = r#"
[app]
app_name = "GamesSite"
function_asset_path = "functions/url-rewrite.js"

[app.tags]
site = "games-test-site"

[environments.dev]
domain_name = "greathonor.org"
sub_domain_name = "games"

[environments.dev.tags]
"env-type" = "dev"

[environments.prod]
domain_name = "elsewhere.net"

[target]
account = "123456789012"
region = "us-east-1"

[[zones]]
id = "Z0123456789"
name = "greathonor.org"
"#;

fn sitekit() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitekit"));
    cmd.env_remove("SITEKIT_CONFIG");
    cmd
}

fn write_site(dir: &Path) -> String {
    let functions = dir.join("functions");
    fs::create_dir_all(&functions).unwrap();
    fs::write(
        functions.join("url-rewrite.js"),
        "function handler(event) { return event.request; }\n",
    )
    .unwrap();

    let path = dir.join("site.toml");
    fs::write(&path, SITE).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_help_lists_commands() {
    sitekit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("synth"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_plan_json_lists_intents_in_order() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());

    let output = sitekit()
        .args(["-c", &config, "plan", "--env", "dev", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let intents: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let ids: Vec<&str> = intents
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 12);
    assert_eq!(ids[0], "loggingBucket");
    assert!(ids.contains(&"cloudFrontDistribution"));

    let bucket = &intents[1];
    assert_eq!(bucket["tags"]["env-type"], "dev");
    assert_eq!(bucket["tags"]["site"], "games-test-site");
}

#[test]
fn test_plan_target_filter() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());

    sitekit()
        .args(["-c", &config, "plan", "-e", "dev", "--target", "dns_record"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aliasRecord"))
        .stdout(predicate::str::contains("rootBucket").not());
}

#[test]
fn test_plan_without_env_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());

    sitekit()
        .args(["-c", &config, "plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no environment selected"));
}

#[test]
fn test_plan_unconfigured_env_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());

    sitekit()
        .args(["-c", &config, "plan", "--env", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'staging' is not configured"));
}

#[test]
fn test_plan_missing_zone_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());

    sitekit()
        .args(["-c", &config, "plan", "--env", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("elsewhere.net"));
}

#[test]
fn test_synth_writes_assembly() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());
    let out = dir.path().join("out");

    sitekit()
        .args(["-c", &config, "synth", "--env", "dev", "--yes", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("GamesSite-dev.assembly.json"));

    let assembly: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("GamesSite-dev.assembly.json")).unwrap())
            .unwrap();
    assert_eq!(assembly["stack"], "GamesSite-dev");
    assert_eq!(assembly["target"]["region"], "us-east-1");
    assert_eq!(assembly["intents"].as_array().unwrap().len(), 12);
    assert_eq!(
        assembly["assets"][0]["fingerprint"].as_str().unwrap().len(),
        64
    );
}

#[test]
fn test_synth_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());
    let out = dir.path().join("out");

    sitekit()
        .args(["-c", &config, "synth", "--env", "dev", "--dry-run", "--out"])
        .arg(&out)
        .assert()
        .success();

    assert!(!out.exists());
}

#[test]
fn test_config_envs_and_validate() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());

    sitekit()
        .args(["-c", &config, "config", "envs"])
        .assert()
        .success()
        .stdout("dev\nprod\n");

    sitekit()
        .args(["-c", &config, "config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("prod"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("site.toml");
    let config = config.to_string_lossy();

    sitekit()
        .args(["-c", &config, "config", "init"])
        .assert()
        .success();

    sitekit()
        .args(["-c", &config, "-q", "config", "show", "--env", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"app_name\": \"MySite\""));

    sitekit()
        .args(["-c", &config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
