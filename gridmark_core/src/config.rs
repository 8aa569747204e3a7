use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use serde::Deserialize;
use serde::Deserializer;

use crate::GridError;
use crate::GridResult;
use crate::table::DEFAULT_EMPTY_NOTICE;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 5] = [
	"gridmark.yml",
	"gridmark.yaml",
	"gridmark.toml",
	"config.yml",
	".config/gridmark.toml",
];

/// Name of the document regenerated in every subdirectory unless
/// `readme_name` overrides it.
pub const DEFAULT_README_NAME: &str = "README.md";

/// Serialization format of a config file, chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Yaml,
	Toml,
}

impl ConfigFormat {
	pub fn from_path(path: &Path) -> GridResult<Self> {
		let extension = path
			.extension()
			.and_then(|e| e.to_str())
			.unwrap_or("")
			.to_ascii_lowercase();

		match extension.as_str() {
			"yml" | "yaml" => Ok(Self::Yaml),
			"toml" => Ok(Self::Toml),
			other => Err(GridError::UnsupportedConfigFormat(other.to_string())),
		}
	}
}

/// The config file exactly as written. Every key is optional here so that a
/// missing one can be reported by name when converting to [`GridConfig`].
///
/// ```yaml
/// wallpapers_dir: wallpapers
/// exclude_dirs: [".github", "_drafts"]
/// allowed_extensions: [".jpg", ".jpeg", ".png"]
/// opening_marker: "<!-- gridmark:start -->"
/// closing_marker: "<!-- gridmark:end -->"
/// columns: 3
/// header: "## Preview"
/// footer: ""
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
	pub wallpapers_dir: Option<PathBuf>,
	#[serde(default)]
	pub exclude_dirs: Vec<String>,
	pub allowed_extensions: Option<Vec<String>>,
	pub opening_marker: Option<String>,
	pub closing_marker: Option<String>,
	pub columns: Option<usize>,
	/// `None` when the key is absent, `Some(None)` when it is explicitly
	/// null.
	#[serde(default, deserialize_with = "explicit_null")]
	pub header: Option<Option<String>>,
	#[serde(default, deserialize_with = "explicit_null")]
	pub footer: Option<Option<String>>,
	pub readme_name: Option<String>,
	pub empty_notice: Option<String>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

/// Subdirectory names that are never processed.
///
/// An entry excludes a directory when it equals the directory's name or when
/// it matches the name as a glob (`_*`, `draft-?`).
#[derive(Debug, Clone)]
pub struct ExcludeDirs {
	names: BTreeSet<String>,
	globs: GlobSet,
}

impl Default for ExcludeDirs {
	fn default() -> Self {
		Self {
			names: BTreeSet::new(),
			globs: GlobSet::empty(),
		}
	}
}

impl ExcludeDirs {
	pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
		let names = patterns
			.iter()
			.map(|pattern| pattern.as_ref().to_string())
			.collect();

		Self {
			names,
			globs: build_glob_set(patterns),
		}
	}

	pub fn is_excluded(&self, name: &str) -> bool {
		self.names.contains(name) || self.globs.is_match(name)
	}
}

/// Build a `GlobSet` from a list of glob pattern strings. Invalid patterns
/// are skipped and only match by exact name.
fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		if let Ok(glob) = Glob::new(pattern.as_ref()) {
			builder.add(glob);
		}
	}
	builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Validated configuration for a run.
#[derive(Debug, Clone)]
pub struct GridConfig {
	/// Directory whose immediate subdirectories are processed. Its name is
	/// the first segment of every generated link.
	pub root: PathBuf,
	pub exclude_dirs: ExcludeDirs,
	/// Lower-cased extensions including the leading dot, e.g. `.jpg`.
	pub allowed_extensions: Vec<String>,
	pub opening_marker: String,
	pub closing_marker: String,
	pub columns: NonZeroUsize,
	/// Line written after the opening marker. `None` omits the line.
	pub header: Option<String>,
	/// Line written before the closing marker. `None` omits the line.
	pub footer: Option<String>,
	/// File name of the document inside each subdirectory.
	pub readme_name: String,
	/// Written instead of a table when a directory has no images.
	pub empty_notice: String,
}

impl GridConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	pub fn load(root: &Path) -> GridResult<Self> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Err(GridError::ConfigNotFound(root.display().to_string()));
		};

		// `.config/gridmark.toml` still resolves paths against the project
		// root.
		Self::load_file(&config_path, root)
	}

	/// Load the config from an explicit file. A relative `wallpapers_dir` is
	/// resolved against the directory containing the file.
	pub fn load_from(path: &Path) -> GridResult<Self> {
		let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
		Self::load_file(path, base_dir)
	}

	fn load_file(path: &Path, base_dir: &Path) -> GridResult<Self> {
		let format = ConfigFormat::from_path(path)?;
		let content = std::fs::read_to_string(path)?;
		let raw = RawConfig::parse(&content, format, &path.display().to_string())?;

		let config = Self::from_raw(raw, base_dir)?;
		tracing::debug!(
			config = %path.display(),
			root = %config.root.display(),
			"loaded configuration"
		);

		Ok(config)
	}

	/// Validate a raw config. Required keys are checked in declaration order
	/// so the first missing one is reported.
	pub fn from_raw(raw: RawConfig, base_dir: &Path) -> GridResult<Self> {
		let wallpapers_dir = raw
			.wallpapers_dir
			.ok_or(GridError::MissingConfigKey("wallpapers_dir"))?;
		let allowed_extensions = raw
			.allowed_extensions
			.ok_or(GridError::MissingConfigKey("allowed_extensions"))?;
		let opening_marker = raw
			.opening_marker
			.ok_or(GridError::MissingConfigKey("opening_marker"))?;
		let closing_marker = raw
			.closing_marker
			.ok_or(GridError::MissingConfigKey("closing_marker"))?;
		let columns = raw
			.columns
			.ok_or(GridError::MissingConfigKey("columns"))?;

		let columns = NonZeroUsize::new(columns).ok_or_else(|| {
			GridError::InvalidConfig {
				key: "columns",
				reason: "must be at least 1".to_string(),
			}
		})?;

		validate_marker("opening_marker", &opening_marker)?;
		validate_marker("closing_marker", &closing_marker)?;
		if opening_marker == closing_marker {
			return Err(GridError::InvalidConfig {
				key: "closing_marker",
				reason: "must differ from `opening_marker`".to_string(),
			});
		}

		let allowed_extensions = allowed_extensions
			.iter()
			.map(|extension| normalize_extension(extension))
			.collect::<GridResult<Vec<_>>>()?;

		let header = raw.header.unwrap_or_else(|| Some(String::new()));
		let footer = raw.footer.unwrap_or_else(|| Some(String::new()));
		let empty_notice = raw
			.empty_notice
			.unwrap_or_else(|| DEFAULT_EMPTY_NOTICE.to_string());

		// Generated text must not contain a marker, otherwise the next run
		// would locate a different block.
		for (key, text) in [
			("header", header.as_deref()),
			("footer", footer.as_deref()),
			("empty_notice", Some(empty_notice.as_str())),
		] {
			let Some(text) = text else {
				continue;
			};
			if text.contains(&opening_marker) || text.contains(&closing_marker) {
				return Err(GridError::InvalidConfig {
					key,
					reason: "must not contain the opening or closing marker".to_string(),
				});
			}
		}

		let readme_name = raw
			.readme_name
			.unwrap_or_else(|| DEFAULT_README_NAME.to_string());
		if matches!(readme_name.as_str(), "" | "." | "..") || readme_name.contains(['/', '\\']) {
			return Err(GridError::InvalidConfig {
				key: "readme_name",
				reason: "must be a plain file name".to_string(),
			});
		}

		Ok(Self {
			root: resolve_root(base_dir, &wallpapers_dir),
			exclude_dirs: ExcludeDirs::new(&raw.exclude_dirs),
			allowed_extensions,
			opening_marker,
			closing_marker,
			columns,
			header,
			footer,
			readme_name,
			empty_notice,
		})
	}

	/// Whether `file_name` carries one of the allowed extensions. The match
	/// ignores case.
	pub fn is_allowed_file(&self, file_name: &str) -> bool {
		let Some(extension) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
			return false;
		};
		let extension = format!(".{}", extension.to_lowercase());
		self.allowed_extensions.contains(&extension)
	}
}

impl RawConfig {
	/// Parse config file content in the given format.
	pub fn parse(content: &str, format: ConfigFormat, path_display: &str) -> GridResult<Self> {
		let parsed = match format {
			ConfigFormat::Yaml => {
				// An empty YAML document deserializes to unit, not a map.
				if content.trim().is_empty() {
					return Ok(Self::default());
				}
				serde_yaml_ng::from_str(content).map_err(|e| e.to_string())
			}
			ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
		};

		parsed.map_err(|reason| {
			GridError::ConfigParse {
				path: path_display.to_string(),
				reason,
			}
		})
	}
}

fn validate_marker(key: &'static str, marker: &str) -> GridResult<()> {
	if marker.is_empty() {
		return Err(GridError::InvalidConfig {
			key,
			reason: "must not be empty".to_string(),
		});
	}
	Ok(())
}

/// Lower-case an extension and make sure it starts with a dot.
fn normalize_extension(extension: &str) -> GridResult<String> {
	let trimmed = extension.trim().trim_start_matches('.');
	if trimmed.is_empty() {
		return Err(GridError::InvalidConfig {
			key: "allowed_extensions",
			reason: format!("`{extension}` is not a file extension"),
		});
	}
	Ok(format!(".{}", trimmed.to_lowercase()))
}

/// Join a relative root onto `base_dir`. A root without a final name
/// component (`.`, `..`) is canonicalized so that links can be built from its
/// name.
fn resolve_root(base_dir: &Path, wallpapers_dir: &Path) -> PathBuf {
	let root = if wallpapers_dir.is_absolute() {
		wallpapers_dir.to_path_buf()
	} else {
		base_dir.join(wallpapers_dir)
	};

	if root.file_name().is_some() {
		return root;
	}

	std::fs::canonicalize(&root).unwrap_or(root)
}
