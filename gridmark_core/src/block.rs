/// Assemble the replacement block written between (and including) the
/// markers.
///
/// ```text
/// {opening}
/// {header}
///
/// {table}
///
/// {footer}
/// {closing}
/// ```
///
/// A `None` header or footer drops its line entirely, while `Some("")` keeps
/// an empty line in its place.
pub fn assemble_block(
	opening: &str,
	header: Option<&str>,
	table: &str,
	footer: Option<&str>,
	closing: &str,
) -> String {
	[
		Some(opening),
		header,
		Some(""),
		Some(table),
		Some(""),
		footer,
		Some(closing),
	]
	.into_iter()
	.flatten()
	.collect::<Vec<_>>()
	.join("\n")
}
