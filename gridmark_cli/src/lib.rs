use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep image preview tables in per-directory READMEs up to date.",
	long_about = "gridmark regenerates the block between two marker lines in every \
	              subdirectory's README.md with a markdown table of preview links to the \
	              images stored next to it.\n\nQuick start:\n  gridmark init    Create a \
	              sample gridmark.yml\n  gridmark update  Regenerate all preview tables\n  \
	              gridmark check   Verify every preview table is up to date\n  gridmark list  \
	              Show what happens in each directory"
)]
pub struct GridmarkCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where the config file is looked
	/// up.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Explicit config file. Overrides discovery in the project root.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `gridmark.yml` in the project root.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Check that every preview table is up to date.
	///
	/// Exits with a non-zero status code if any README would change. Ideal
	/// for CI pipelines.
	Check {
		/// Show a line diff for each stale README.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Regenerate the preview table in every subdirectory's README.
	///
	/// This is the default when no subcommand is given.
	Update {
		/// Print which READMEs would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// List every subdirectory with its image count and status.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
