//! End-to-end pipeline scenarios against the fake toolchain and spy host

use crate::helpers::{FakeToolchain, SpyHost, TestWorkspace};
use anyhow::Result;
use shipline::commands::run::resolve_tag;
use shipline::core::error::{BuildStage, ShipError};
use shipline::pipeline::{Pipeline, PipelinePlan};

#[test]
fn test_all_green_run_publishes_release() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let config = ws.config();
  let toolchain = FakeToolchain::new(&ws.path, "rodbot");
  let host = SpyHost::new();

  let pipeline = Pipeline::new(&config, &ws.path, &toolchain, &host);
  let report = pipeline.run("v2.0.0").map_err(|e| anyhow::anyhow!(e.to_string()))?;

  assert_eq!(host.created_count(), 1);
  assert_eq!(
    host.uploaded_names(),
    vec!["rodbot-linux-amd64", "rodbot-macos-amd64", "rodbot-windows-amd64"]
  );

  assert_eq!(report.tag, "v2.0.0");
  assert!(report.builds.is_success());
  assert_eq!(report.publish.assets.len(), 3);
  assert!(!report.publish.release.draft);
  assert!(!report.publish.release.prerelease);

  // The report serializes for --json CI output
  let json = serde_json::to_value(&report)?;
  assert_eq!(json["publish"]["release"]["tag"], "v2.0.0");

  Ok(())
}

#[test]
fn test_failed_platform_blocks_publish_entirely() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let config = ws.config();
  let toolchain = FakeToolchain::new(&ws.path, "rodbot").fail("macos-amd64", BuildStage::Test);
  let host = SpyHost::new();

  let pipeline = Pipeline::new(&config, &ws.path, &toolchain, &host);
  let err = pipeline.run("v2.0.0").unwrap_err();

  match err {
    ShipError::Coordination(e) => {
      assert_eq!(e.failed, vec![("macos-amd64".to_string(), BuildStage::Test)]);
    }
    other => panic!("expected coordination failure, got: {}", other),
  }

  // The spy host received zero calls of any kind
  assert_eq!(host.created_count(), 0);
  assert!(host.uploaded_names().is_empty());

  // Every sibling still ran to a terminal state before the gate
  let calls = toolchain.calls.lock().unwrap().clone();
  assert!(calls.contains(&"linux-amd64:test".to_string()));
  assert!(calls.contains(&"windows-amd64:test".to_string()));

  Ok(())
}

#[test]
fn test_plan_names_every_asset() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let config = ws.config();

  let plan = PipelinePlan::new(&config, "v2.0.0");
  assert_eq!(plan.platforms.len(), 3);

  let assets: Vec<&str> = plan.platforms.iter().map(|p| p.asset_name.as_str()).collect();
  assert_eq!(assets, vec!["rodbot-linux-amd64", "rodbot-macos-amd64", "rodbot-windows-amd64"]);

  // Extension shows up on the binary file, never on the asset
  assert_eq!(plan.platforms[2].binary_file, "rodbot.exe");
  assert_eq!(plan.platforms[2].asset_name, "rodbot-windows-amd64");

  let table = plan.format_table();
  assert!(table.contains("v2.0.0"));
  assert!(table.contains("rodbot-windows-amd64"));

  let json: serde_json::Value = serde_json::from_str(&plan.to_json().map_err(|e| anyhow::anyhow!(e.to_string()))?)?;
  assert_eq!(json["tag"], "v2.0.0");

  Ok(())
}

#[test]
fn test_explicit_tag_wins() {
  let tag = resolve_tag(Some("v9.9.9".to_string())).expect("explicit tag always resolves");
  assert_eq!(tag, "v9.9.9");
}
