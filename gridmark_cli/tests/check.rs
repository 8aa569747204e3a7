mod common;

use gridmark_cli::Commands;
use gridmark_cli::GridmarkCli;
use gridmark_cli::OutputFormat;
use gridmark_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::gridmark_cmd();
	let _ = cmd
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("Check failed.")
				.and(predicates::str::contains("nature"))
				.and(predicates::str::contains("1 README(s) are out of date")),
		);

	// Checking never writes.
	let content = common::read_readme(tmp.path(), "nature")?;
	similar_asserts::assert_eq!(content, common::readme("Nature"));

	Ok(())
}

#[test]
fn check_passes_after_update() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::gridmark_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let mut cmd = common::gridmark_cmd();
	let _ = cmd
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: all preview tables are up to date.",
		));

	Ok(())
}

#[test]
fn check_diff_shows_generated_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::gridmark_cmd();
	let _ = cmd
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("-old")
				.and(predicates::str::contains("+## Preview"))
				.and(predicates::str::contains("+| :---: | :---: |")),
		);

	Ok(())
}

#[test]
fn check_json_lists_stale_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let output = common::gridmark_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));

	let stale = json["stale"].as_array().ok_or("stale should be an array")?;
	assert_eq!(stale.len(), 1);
	assert_eq!(stale[0]["directory"], "nature");
	assert_eq!(stale[0]["images"], 2);
	let document = stale[0]["document"].as_str().unwrap_or_default();
	assert!(document.ends_with("README.md"), "unexpected document: {document}");

	Ok(())
}

#[test]
fn check_json_is_ok_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::gridmark_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let output = common::gridmark_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(true));
	assert_eq!(json["stale"], Value::Array(vec![]));

	Ok(())
}

#[test]
fn check_flags_are_accepted_by_cli_parser() {
	use clap::Parser;

	let cli = GridmarkCli::parse_from(["gridmark", "check", "--diff", "--format", "json"]);
	match cli.command {
		Some(Commands::Check { diff, format }) => {
			assert!(diff);
			assert!(matches!(format, OutputFormat::Json));
		}
		_ => panic!("expected Check command"),
	}

	let cli = GridmarkCli::parse_from(["gridmark", "check"]);
	match cli.command {
		Some(Commands::Check { diff, format }) => {
			assert!(!diff);
			assert!(matches!(format, OutputFormat::Text));
		}
		_ => panic!("expected Check command"),
	}
}
