//! Filesystem access used by the directory processor.
//!
//! Everything the engine reads or writes goes through [`FileSystem`]. The
//! [`OsFileSystem`] implementation talks to the real disk, while
//! [`MemoryFileSystem`] keeps a tree in memory for tests and embedding.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::GridResult;

/// What a directory entry points at, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	File,
	Directory,
	/// Sockets, broken symlinks and anything else that is neither.
	Other,
}

/// A single entry returned by [`FileSystem::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
	/// The entry's file name, without any parent components.
	pub name: String,
	pub kind: EntryKind,
}

impl DirEntry {
	pub fn is_file(&self) -> bool {
		self.kind == EntryKind::File
	}

	pub fn is_dir(&self) -> bool {
		self.kind == EntryKind::Directory
	}
}

/// The minimal set of filesystem operations the engine needs.
pub trait FileSystem {
	/// List the immediate children of `path` in no particular order.
	fn list_dir(&self, path: &Path) -> GridResult<Vec<DirEntry>>;

	fn read_to_string(&self, path: &Path) -> GridResult<String>;

	/// Replace the content of `path` with `content`.
	fn write(&self, path: &Path, content: &str) -> GridResult<()>;

	fn is_file(&self, path: &Path) -> bool;

	fn is_dir(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
	fn list_dir(&self, path: &Path) -> GridResult<Vec<DirEntry>> {
		let mut entries = Vec::new();

		for entry in std::fs::read_dir(path)? {
			let entry = entry?;
			// `metadata` follows symlinks, `entry.file_type` does not.
			let kind = match std::fs::metadata(entry.path()) {
				Ok(metadata) if metadata.is_file() => EntryKind::File,
				Ok(metadata) if metadata.is_dir() => EntryKind::Directory,
				_ => EntryKind::Other,
			};

			entries.push(DirEntry {
				name: entry.file_name().to_string_lossy().into_owned(),
				kind,
			});
		}

		Ok(entries)
	}

	fn read_to_string(&self, path: &Path) -> GridResult<String> {
		Ok(std::fs::read_to_string(path)?)
	}

	/// Writes to a temporary file next to the real target and renames it over
	/// the target, so a failed write leaves the previous content in place. A
	/// symlinked `path` stays a symlink and the file it points at is updated.
	fn write(&self, path: &Path, content: &str) -> GridResult<()> {
		let target = match std::fs::canonicalize(path) {
			Ok(resolved) => resolved,
			Err(error) if error.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
			Err(error) => return Err(error.into()),
		};
		let permissions = std::fs::metadata(&target)
			.ok()
			.map(|metadata| metadata.permissions());

		let file_name = target.file_name().ok_or_else(|| {
			io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("`{}` has no file name", path.display()),
			)
		})?;

		let temp_path = target.with_file_name(format!(
			".{}.tmp-{}-{}",
			file_name.to_string_lossy(),
			std::process::id(),
			SystemTime::now()
				.duration_since(UNIX_EPOCH)
				.map_or(0, |duration| duration.as_nanos())
		));

		let result = std::fs::write(&temp_path, content)
			.and_then(|()| {
				match permissions {
					Some(permissions) => std::fs::set_permissions(&temp_path, permissions),
					None => Ok(()),
				}
			})
			.and_then(|()| std::fs::rename(&temp_path, &target));

		if let Err(error) = result {
			let _ = std::fs::remove_file(&temp_path);
			return Err(error.into());
		}

		Ok(())
	}

	fn is_file(&self, path: &Path) -> bool {
		path.is_file()
	}

	fn is_dir(&self, path: &Path) -> bool {
		path.is_dir()
	}
}

/// In-memory [`FileSystem`].
///
/// Adding a file creates its parent directories. Writes are recorded so tests
/// can assert on how many times the engine touched the disk.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
	files: RefCell<BTreeMap<PathBuf, String>>,
	dirs: RefCell<BTreeSet<PathBuf>>,
	writes: RefCell<Vec<PathBuf>>,
}

impl MemoryFileSystem {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty directory and all of its parents.
	pub fn add_dir(&self, path: impl AsRef<Path>) {
		let mut dirs = self.dirs.borrow_mut();
		for ancestor in path.as_ref().ancestors() {
			if ancestor.as_os_str().is_empty() {
				continue;
			}
			dirs.insert(ancestor.to_path_buf());
		}
	}

	/// Create or replace a file without recording it as a write.
	pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			self.add_dir(parent);
		}
		self.files
			.borrow_mut()
			.insert(path.to_path_buf(), content.into());
	}

	/// Current content of `path`, if it is a file.
	pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
		self.files.borrow().get(path.as_ref()).cloned()
	}

	/// Paths passed to [`FileSystem::write`], in call order.
	pub fn writes(&self) -> Vec<PathBuf> {
		self.writes.borrow().clone()
	}
}

fn not_found(path: &Path) -> io::Error {
	io::Error::new(
		io::ErrorKind::NotFound,
		format!("`{}` does not exist", path.display()),
	)
}

impl FileSystem for MemoryFileSystem {
	fn list_dir(&self, path: &Path) -> GridResult<Vec<DirEntry>> {
		if !self.is_dir(path) {
			return Err(not_found(path).into());
		}

		let is_child = |candidate: &Path| candidate.parent() == Some(path);
		let name_of = |candidate: &Path| {
			candidate
				.file_name()
				.map(|name| name.to_string_lossy().into_owned())
		};

		let dirs = self.dirs.borrow();
		let files = self.files.borrow();
		let directories = dirs
			.iter()
			.filter(|dir| is_child(dir.as_path()))
			.filter_map(|dir| name_of(dir.as_path()))
			.map(|name| {
				DirEntry {
					name,
					kind: EntryKind::Directory,
				}
			});
		let regular_files = files
			.keys()
			.filter(|file| is_child(file.as_path()))
			.filter_map(|file| name_of(file.as_path()))
			.map(|name| {
				DirEntry {
					name,
					kind: EntryKind::File,
				}
			});

		Ok(directories.chain(regular_files).collect())
	}

	fn read_to_string(&self, path: &Path) -> GridResult<String> {
		self.file(path).ok_or_else(|| not_found(path).into())
	}

	fn write(&self, path: &Path, content: &str) -> GridResult<()> {
		let parent_exists = path.parent().is_none_or(|parent| {
			parent.as_os_str().is_empty() || self.dirs.borrow().contains(parent)
		});
		if !parent_exists || self.is_dir(path) {
			return Err(not_found(path).into());
		}

		self.files
			.borrow_mut()
			.insert(path.to_path_buf(), content.to_string());
		self.writes.borrow_mut().push(path.to_path_buf());
		Ok(())
	}

	fn is_file(&self, path: &Path) -> bool {
		self.files.borrow().contains_key(path)
	}

	fn is_dir(&self, path: &Path) -> bool {
		self.dirs.borrow().contains(path)
	}
}
