#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const CONFIG: &str = "wallpapers_dir: wallpapers\nexclude_dirs: [.github]\nallowed_extensions: \
                          [.jpg, .png]\nopening_marker: \"<!-- gallery:start \
                          -->\"\nclosing_marker: \"<!-- gallery:end -->\"\ncolumns: 2\nheader: \
                          \"## Preview\"\n";

pub fn gridmark_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("gridmark"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("GRIDMARK_LOG");
	cmd
}

pub fn readme(title: &str) -> String {
	format!(
		"# {title}\n\nIntro.\n\n<!-- gallery:start -->\nold\n<!-- gallery:end -->\n\nOutro.\n"
	)
}

/// Lays out a project with a config and a `nature` directory holding two
/// images and a README whose generated block is stale.
pub fn write_project(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("gridmark.yml"), CONFIG)?;

	let nature = root.join("wallpapers").join("nature");
	std::fs::create_dir_all(&nature)?;
	std::fs::write(nature.join("README.md"), readme("Nature"))?;
	std::fs::write(nature.join("sea.jpg"), "")?;
	std::fs::write(nature.join("hill.png"), "")?;
	std::fs::write(nature.join("notes.txt"), "")?;

	let github = root.join("wallpapers").join(".github");
	std::fs::create_dir_all(&github)?;
	std::fs::write(github.join("README.md"), readme("GitHub"))?;

	Ok(())
}

pub fn read_readme(root: &Path, name: &str) -> std::io::Result<String> {
	std::fs::read_to_string(root.join("wallpapers").join(name).join("README.md"))
}
