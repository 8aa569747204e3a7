//! `gridmark_core` regenerates image preview tables inside per-directory
//! README files. Each subdirectory of a wallpapers directory keeps a
//! hand-written `README.md`; the part between two marker lines is owned by
//! gridmark and rewritten from the images found next to it.
//!
//! ## Processing Pipeline
//!
//! ```text
//! gridmark.yml
//!   → GridConfig (validated settings)
//!   → plan_run (walks the root's immediate subdirectories, sorted by name)
//!     → locate (splits the README around the marker pair)
//!     → find_images (allowed extensions, sorted by file name)
//!     → build_table (row-major grid, last row padded)
//!     → assemble_block (markers, header, table, footer)
//!   → write_updates (rewrites stale READMEs)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration discovery and validation.
//! - [`fs`]: The filesystem capability, with on-disk and in-memory
//!   implementations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridmark_core::GridConfig;
//! use gridmark_core::fs::OsFileSystem;
//! use gridmark_core::run;
//! use std::path::Path;
//!
//! let config = GridConfig::load(Path::new(".")).unwrap();
//! let report = run(&OsFileSystem, &config).unwrap();
//! println!("{} README(s) regenerated", report.stale_count());
//! ```

pub use block::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use marker::*;
pub use table::*;

mod block;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod fs;
mod marker;
mod table;

#[cfg(test)]
mod __fixtures;
