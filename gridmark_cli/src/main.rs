use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use gridmark_cli::Commands;
use gridmark_cli::GridmarkCli;
use gridmark_cli::OutputFormat;
use gridmark_core::DirectoryOutcome;
use gridmark_core::GridConfig;
use gridmark_core::RunReport;
use gridmark_core::fs::OsFileSystem;
use gridmark_core::plan_run;
use gridmark_core::write_updates;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "GRIDMARK_LOG";

const SAMPLE_CONFIG: &str = "# gridmark configuration\n\n# Directory whose subdirectories each \
                             hold a README.md and images.\nwallpapers_dir: wallpapers\n\n# \
                             Subdirectories to skip. Exact names or globs.\nexclude_dirs:\n  - \
                             .github\n\nallowed_extensions: [\".jpg\", \".jpeg\", \".png\", \
                             \".webp\"]\n\n# Everything between these two lines is \
                             regenerated.\nopening_marker: \"<!-- gridmark:start \
                             -->\"\nclosing_marker: \"<!-- gridmark:end -->\"\n\ncolumns: \
                             3\nheader: \"## Preview\"\nfooter: \"\"\n";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = GridmarkCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Check { diff, format }) => run_check(&args, *diff, *format),
		Some(Commands::Update { dry_run }) => run_update(&args, *dry_run),
		Some(Commands::List) => run_list(&args),
		None => run_update(&args, false),
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<gridmark_core::GridError>() {
			Ok(grid_err) => {
				let report: miette::Report = (*grid_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_logging(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "gridmark_core=debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init();
}

fn resolve_root(args: &GridmarkCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &GridmarkCli) -> Result<GridConfig, Box<dyn std::error::Error>> {
	let config = match &args.config {
		Some(path) => GridConfig::load_from(path)?,
		None => GridConfig::load(&resolve_root(args))?,
	};
	Ok(config)
}

fn plan(args: &GridmarkCli) -> Result<RunReport, Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let report = plan_run(&OsFileSystem, &config)?;

	if args.verbose {
		println!(
			"Scanned {}: {} director(ies), {} stale",
			report.root.display(),
			report.directories.len(),
			report.stale_count()
		);
	}

	Ok(report)
}

fn run_init(args: &GridmarkCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = GridConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("gridmark.yml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", config_path.display());

	println!();
	println!("Next steps:");
	println!("  1. Point `wallpapers_dir` at your images directory");
	println!("  2. Add the markers to each subdirectory's README.md:");
	println!("     <!-- gridmark:start -->");
	println!("     <!-- gridmark:end -->");
	println!("  3. Run `gridmark update` to generate the tables");

	Ok(())
}

fn run_update(args: &GridmarkCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let report = plan(args)?;
	let stale = stale_documents(&report);

	if stale.is_empty() {
		println!("All preview tables are already up to date.");
		return Ok(());
	}

	if dry_run {
		println!("Dry run: would update {} README(s):", stale.len());
		for path in &stale {
			println!("  {path}");
		}
		return Ok(());
	}

	let written = write_updates(&OsFileSystem, &report)?;
	println!("{} {written} README(s).", colored!("Updated", green));

	if args.verbose {
		for path in &stale {
			println!("  {path}");
		}
	}

	Ok(())
}

fn run_check(
	args: &GridmarkCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let report = plan(args)?;

	match format {
		OutputFormat::Json => {
			let stale: Vec<serde_json::Value> = report
				.stale()
				.map(|entry| {
					serde_json::json!({
						"directory": entry.name,
						"document": make_relative(&entry.document, &report.root),
						"images": entry.outcome.image_count(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": report.is_up_to_date(),
				"stale": stale,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if report.is_up_to_date() {
				println!("Check passed: all preview tables are up to date.");
				return Ok(());
			}

			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Stale READMEs:");
			for entry in report.stale() {
				eprintln!("  {}", make_relative(&entry.document, &report.root));

				if show_diff {
					if let DirectoryOutcome::Stale {
						current, expected, ..
					} = &entry.outcome
					{
						print_diff(current, expected);
					}
				}
			}

			eprintln!();
			eprintln!(
				"{} README(s) are out of date. Run `gridmark update` to fix.",
				report.stale_count()
			);
		}
	}

	if !report.is_up_to_date() {
		process::exit(1);
	}

	Ok(())
}

fn run_list(args: &GridmarkCli) -> Result<(), Box<dyn std::error::Error>> {
	let report = plan(args)?;

	if report.directories.is_empty() {
		println!("No subdirectories found in {}.", report.root.display());
		return Ok(());
	}

	println!("{}", colored!("Directories:", bold));
	for entry in &report.directories {
		let label = entry.outcome.label();
		let status = match entry.outcome {
			DirectoryOutcome::Stale { .. } => colored!(label, yellow),
			DirectoryOutcome::UpToDate { .. } => colored!(label, green),
			_ => label.to_string(),
		};
		let images = entry
			.outcome
			.image_count()
			.map(|count| format!(" ({count} image(s))"))
			.unwrap_or_default();
		println!("  {:<24} {status}{images}", entry.name);
	}

	println!(
		"\n{} director(ies), {} stale",
		report.directories.len(),
		report.stale_count()
	);

	Ok(())
}

/// Relative display paths of every stale README, in report order.
fn stale_documents(report: &RunReport) -> Vec<String> {
	report
		.stale()
		.map(|entry| make_relative(&entry.document, &report.root))
		.collect()
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
