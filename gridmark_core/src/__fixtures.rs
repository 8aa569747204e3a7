use std::path::Path;
use std::path::PathBuf;

use crate::GridConfig;
use crate::RawConfig;
use crate::fs::MemoryFileSystem;

pub const OPEN: &str = "<!-- gridmark:start -->";
pub const CLOSE: &str = "<!-- gridmark:end -->";
pub const ROOT: &str = "/srv/wallpapers";

pub fn raw_config(columns: usize) -> RawConfig {
	RawConfig {
		wallpapers_dir: Some(PathBuf::from("wallpapers")),
		exclude_dirs: vec![".github".to_string(), "_*".to_string()],
		allowed_extensions: Some(vec![".jpg".to_string(), ".png".to_string()]),
		opening_marker: Some(OPEN.to_string()),
		closing_marker: Some(CLOSE.to_string()),
		columns: Some(columns),
		header: Some(Some("## Preview".to_string())),
		footer: None,
		readme_name: None,
		empty_notice: None,
	}
}

pub fn config(columns: usize) -> GridConfig {
	GridConfig::from_raw(raw_config(columns), Path::new("/srv")).unwrap()
}

/// A README with hand-written text around a stale generated block.
pub fn readme(title: &str) -> String {
	format!("# {title}\n\nHand-written intro.\n\n{OPEN}\nstale content\n{CLOSE}\n\nCredits.\n")
}

pub fn dir(name: &str) -> PathBuf {
	Path::new(ROOT).join(name)
}

/// A wallpapers tree with:
///
/// - `nature`: two images and a README with markers.
/// - `city`: no images and a README with markers.
/// - `notes`: a README without markers.
/// - `empty`: no README at all.
/// - `_drafts`: excluded by glob.
pub fn wallpapers_fs() -> MemoryFileSystem {
	let fs = MemoryFileSystem::new();
	fs.add_file(dir("nature").join("README.md"), readme("Nature"));
	fs.add_file(dir("nature").join("sea.jpg"), "");
	fs.add_file(dir("nature").join("hill.png"), "");
	fs.add_file(dir("nature").join("notes.txt"), "");
	fs.add_file(dir("city").join("README.md"), readme("City"));
	fs.add_file(dir("notes").join("README.md"), "# Notes\n\nNo generated block.\n");
	fs.add_dir(dir("empty"));
	fs.add_file(dir("_drafts").join("README.md"), readme("Drafts"));
	fs.add_file(dir("_drafts").join("wip.jpg"), "");
	fs.add_file(Path::new(ROOT).join("README.md"), readme("Root"));
	fs
}
