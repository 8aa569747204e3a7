mod common;

use gridmark_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn list_shows_each_directory_status() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let city = tmp.path().join("wallpapers").join("city");
	std::fs::create_dir_all(&city)?;
	std::fs::write(city.join("README.md"), "# City\n")?;
	std::fs::create_dir_all(tmp.path().join("wallpapers").join("empty"))?;

	let mut cmd = common::gridmark_cmd();
	let _ = cmd
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Directories:")
				.and(predicates::str::is_match(r"\.github\s+excluded")?)
				.and(predicates::str::is_match(r"city\s+no markers")?)
				.and(predicates::str::is_match(r"empty\s+no document")?)
				.and(predicates::str::is_match(r"nature\s+stale \(2 image\(s\)\)")?)
				.and(predicates::str::contains("4 director(ies), 1 stale")),
		);

	Ok(())
}

#[test]
fn list_reports_empty_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("gridmark.yml"), common::CONFIG)?;
	std::fs::create_dir_all(tmp.path().join("wallpapers"))?;

	let mut cmd = common::gridmark_cmd();
	let _ = cmd
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No subdirectories found"));

	Ok(())
}
