use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum GridError {
	#[error(transparent)]
	#[diagnostic(code(gridmark::io_error))]
	Io(#[from] std::io::Error),

	#[error("no configuration file found in `{0}`")]
	#[diagnostic(
		code(gridmark::config_not_found),
		help("run `gridmark init` to create `gridmark.yml`, or pass `--config <path>`")
	)]
	ConfigNotFound(String),

	#[error("failed to parse config file `{path}`: {reason}")]
	#[diagnostic(code(gridmark::config_parse))]
	ConfigParse { path: String, reason: String },

	#[error("missing required configuration key: `{0}`")]
	#[diagnostic(
		code(gridmark::missing_config_key),
		help("add `{0}` to the configuration file")
	)]
	MissingConfigKey(&'static str),

	#[error("invalid value for `{key}`: {reason}")]
	#[diagnostic(code(gridmark::invalid_config))]
	InvalidConfig { key: &'static str, reason: String },

	#[error("unsupported config file format: `{0}`")]
	#[diagnostic(
		code(gridmark::unsupported_format),
		help("supported formats: yml, yaml, toml")
	)]
	UnsupportedConfigFormat(String),

	#[error("wallpapers directory not found: `{0}`")]
	#[diagnostic(
		code(gridmark::root_not_found),
		help("check `wallpapers_dir` in the configuration file")
	)]
	RootNotFound(String),

	#[error("generated table for `{document}` contains the marker `{marker}`")]
	#[diagnostic(
		code(gridmark::marker_in_generated_text),
		help("rename the image or directory, or choose markers that cannot appear in file names")
	)]
	MarkerInGeneratedText { document: String, marker: String },

	#[error("cannot build link paths from wallpapers directory `{0}`")]
	#[diagnostic(
		code(gridmark::invalid_root),
		help("`wallpapers_dir` must end in a named directory")
	)]
	InvalidRoot(String),
}

pub type GridResult<T> = Result<T, GridError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
