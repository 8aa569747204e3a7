use std::iter;
use std::num::NonZeroUsize;

/// Label shown for every thumbnail in the generated table.
pub const PREVIEW_LABEL: &str = "preview";

/// Line emitted instead of a table when a directory holds no images.
pub const DEFAULT_EMPTY_NOTICE: &str = "_(No images in this directory)_";

const CENTER_ALIGNMENT: &str = ":---:";
const PADDING_CELL: &str = " ";

/// Build the markdown preview grid for `items`.
///
/// Items are packed row-major into rows of `columns` cells. The last row is
/// padded on the right with blank cells. A hidden header row and a centered
/// alignment row come first so that the grid renders as a table without
/// visible column titles.
///
/// When `items` is empty, `empty_notice` is returned as-is.
pub fn build_table<S: AsRef<str>>(
	items: &[S],
	columns: NonZeroUsize,
	link_prefix: &str,
	empty_notice: &str,
) -> String {
	if items.is_empty() {
		return empty_notice.to_string();
	}

	let columns = columns.get();
	let mut rows = Vec::with_capacity(items.len().div_ceil(columns) + 2);
	rows.push(render_row(iter::repeat_n("", columns)));
	rows.push(render_row(iter::repeat_n(CENTER_ALIGNMENT, columns)));

	for chunk in items.chunks(columns) {
		let mut cells: Vec<String> = chunk
			.iter()
			.map(|item| preview_cell(link_prefix, item.as_ref()))
			.collect();
		cells.resize(columns, PADDING_CELL.to_string());
		rows.push(render_row(cells.iter().map(String::as_str)));
	}

	rows.join("\n")
}

/// A single clickable thumbnail. The image source and the link target are the
/// same path.
pub fn preview_cell(link_prefix: &str, name: &str) -> String {
	let target = format!("{link_prefix}/{name}");
	format!("[![{PREVIEW_LABEL}]({target})]({target})")
}

fn render_row<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
	let cells: Vec<&str> = cells.into_iter().collect();
	format!("| {} |", cells.join(" | "))
}
