use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::GridConfig;
use crate::GridError;
use crate::GridResult;
use crate::block::assemble_block;
use crate::fs::FileSystem;
use crate::marker::Located;
use crate::marker::locate;
use crate::table::build_table;

/// What processing a single directory produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DirectoryOutcome {
	/// The directory name is listed in `exclude_dirs`.
	Excluded,
	/// The directory has no document to regenerate.
	MissingDocument,
	/// The document has no complete marker pair.
	MissingMarkers,
	/// The generated block already matches the directory's images.
	UpToDate { image_count: usize },
	/// The generated block differs from what the images produce.
	Stale {
		image_count: usize,
		/// The document as it is on disk.
		current: String,
		/// The document with a regenerated block.
		expected: String,
	},
}

impl DirectoryOutcome {
	/// Number of images found, for outcomes that looked at the images.
	pub fn image_count(&self) -> Option<usize> {
		match self {
			Self::UpToDate { image_count } | Self::Stale { image_count, .. } => Some(*image_count),
			Self::Excluded | Self::MissingDocument | Self::MissingMarkers => None,
		}
	}

	pub fn is_stale(&self) -> bool {
		matches!(self, Self::Stale { .. })
	}

	/// Short human-readable label for listings.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Excluded => "excluded",
			Self::MissingDocument => "no document",
			Self::MissingMarkers => "no markers",
			Self::UpToDate { .. } => "up to date",
			Self::Stale { .. } => "stale",
		}
	}
}

/// The outcome for one subdirectory of the root.
#[derive(Debug, Clone)]
pub struct DirectoryReport {
	/// Directory name relative to the root.
	pub name: String,
	pub directory: PathBuf,
	/// Path of the directory's document, whether or not it exists.
	pub document: PathBuf,
	pub outcome: DirectoryOutcome,
}

/// Result of planning or running over every subdirectory of the root.
#[derive(Debug, Clone)]
pub struct RunReport {
	pub root: PathBuf,
	/// One entry per subdirectory, sorted by name.
	pub directories: Vec<DirectoryReport>,
}

impl RunReport {
	/// Directories whose document needs rewriting.
	pub fn stale(&self) -> impl Iterator<Item = &DirectoryReport> {
		self.directories
			.iter()
			.filter(|report| report.outcome.is_stale())
	}

	pub fn stale_count(&self) -> usize {
		self.stale().count()
	}

	/// Returns true if no document needs rewriting.
	pub fn is_up_to_date(&self) -> bool {
		self.stale().next().is_none()
	}
}

/// List the names of allowed image files directly inside `directory`, sorted
/// by name.
pub fn find_images(
	fs: &dyn FileSystem,
	config: &GridConfig,
	directory: &Path,
) -> GridResult<Vec<String>> {
	let mut images: Vec<String> = fs
		.list_dir(directory)?
		.into_iter()
		.filter(|entry| entry.is_file() && config.is_allowed_file(&entry.name))
		.map(|entry| entry.name)
		.collect();
	images.sort();
	Ok(images)
}

/// Build the link path for `directory`: the root's name followed by the
/// directory's path below the root, e.g. `/wallpapers/nature`.
pub fn link_prefix(root: &Path, directory: &Path) -> GridResult<String> {
	let root_name = root
		.file_name()
		.ok_or_else(|| GridError::InvalidRoot(root.display().to_string()))?;

	let mut prefix = format!("/{}", root_name.to_string_lossy());
	let relative = directory.strip_prefix(root).unwrap_or(directory);
	for component in relative.components() {
		if let Component::Normal(segment) = component {
			prefix.push('/');
			prefix.push_str(&segment.to_string_lossy());
		}
	}

	Ok(prefix)
}

/// Compute what the document in `directory` should contain without writing
/// anything. Exclusion is not considered here.
pub fn render_directory(
	fs: &dyn FileSystem,
	config: &GridConfig,
	directory: &Path,
) -> GridResult<DirectoryOutcome> {
	let document = directory.join(&config.readme_name);
	if !fs.is_file(&document) {
		tracing::debug!(directory = %directory.display(), "no document, skipping");
		return Ok(DirectoryOutcome::MissingDocument);
	}

	let current = fs.read_to_string(&document)?;
	let Located::Found(span) = locate(&current, &config.opening_marker, &config.closing_marker)
	else {
		tracing::debug!(document = %document.display(), "markers not found, skipping");
		return Ok(DirectoryOutcome::MissingMarkers);
	};

	let images = find_images(fs, config, directory)?;
	let prefix = link_prefix(&config.root, directory)?;
	let table = build_table(&images, config.columns, &prefix, &config.empty_notice);
	let block = assemble_block(
		&config.opening_marker,
		config.header.as_deref(),
		&table,
		config.footer.as_deref(),
		&config.closing_marker,
	);
	// A marker inside the generated text would be found by the next run and
	// split the block in the wrong place.
	let generated = &block[config.opening_marker.len()..block.len() - config.closing_marker.len()];
	for marker in [&config.opening_marker, &config.closing_marker] {
		if generated.contains(marker.as_str()) {
			return Err(GridError::MarkerInGeneratedText {
				document: document.display().to_string(),
				marker: marker.clone(),
			});
		}
	}

	tracing::trace!(
		document = %document.display(),
		start = span.start(),
		end = span.end(),
		images = images.len(),
		"rendered block"
	);

	let image_count = images.len();
	if span.block == block {
		return Ok(DirectoryOutcome::UpToDate { image_count });
	}

	let expected = span.splice(&block);
	Ok(DirectoryOutcome::Stale {
		image_count,
		current,
		expected,
	})
}

/// Regenerate the block in `directory`'s document and write it back when it
/// changed.
pub fn process_directory(
	fs: &dyn FileSystem,
	config: &GridConfig,
	directory: &Path,
) -> GridResult<DirectoryOutcome> {
	let outcome = render_directory(fs, config, directory)?;
	if let DirectoryOutcome::Stale { expected, .. } = &outcome {
		fs.write(&directory.join(&config.readme_name), expected)?;
	}
	Ok(outcome)
}

/// Compute the outcome for every immediate subdirectory of the root, sorted
/// by name. Nothing is written.
#[tracing::instrument(skip_all, fields(root = %config.root.display()))]
pub fn plan_run(fs: &dyn FileSystem, config: &GridConfig) -> GridResult<RunReport> {
	if !fs.is_dir(&config.root) {
		return Err(GridError::RootNotFound(config.root.display().to_string()));
	}

	let mut names: Vec<String> = fs
		.list_dir(&config.root)?
		.into_iter()
		.filter(|entry| entry.is_dir())
		.map(|entry| entry.name)
		.collect();
	names.sort();

	let mut directories = Vec::with_capacity(names.len());
	for name in names {
		let directory = config.root.join(&name);
		let document = directory.join(&config.readme_name);

		let outcome = if config.exclude_dirs.is_excluded(&name) {
			tracing::debug!(directory = %name, "excluded");
			DirectoryOutcome::Excluded
		} else {
			render_directory(fs, config, &directory)?
		};
		tracing::debug!(directory = %name, outcome = outcome.label(), "processed directory");

		directories.push(DirectoryReport {
			name,
			directory,
			document,
			outcome,
		});
	}

	Ok(RunReport {
		root: config.root.clone(),
		directories,
	})
}

/// Write every stale document in `report`. Returns the number of documents
/// written.
pub fn write_updates(fs: &dyn FileSystem, report: &RunReport) -> GridResult<usize> {
	let mut written = 0;
	for entry in report.stale() {
		if let DirectoryOutcome::Stale { expected, .. } = &entry.outcome {
			fs.write(&entry.document, expected)?;
			written += 1;
		}
	}
	Ok(written)
}

/// Plan and apply a full run.
pub fn run(fs: &dyn FileSystem, config: &GridConfig) -> GridResult<RunReport> {
	tracing::info!(root = %config.root.display(), "processing wallpapers directory");
	let report = plan_run(fs, config)?;
	let written = write_updates(fs, &report)?;
	tracing::info!(
		directories = report.directories.len(),
		written,
		"finished processing"
	);
	Ok(report)
}
