/// The result of searching a document for its generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located<'a> {
	/// Both markers were found in order.
	Found(MarkerSpan<'a>),
	/// The opening marker is missing, or no closing marker follows it.
	NotFound,
}

impl<'a> Located<'a> {
	/// Returns the span when both markers were found.
	pub fn span(self) -> Option<MarkerSpan<'a>> {
		match self {
			Self::Found(span) => Some(span),
			Self::NotFound => None,
		}
	}
}

/// A document split around its generated block.
///
/// `block` starts with the opening marker and ends with the closing marker.
/// Concatenating `prefix`, `block` and `suffix` gives back the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpan<'a> {
	/// Everything before the opening marker.
	pub prefix: &'a str,
	/// The opening marker, the current generated content and the closing
	/// marker.
	pub block: &'a str,
	/// Everything after the closing marker.
	pub suffix: &'a str,
}

impl MarkerSpan<'_> {
	/// Replace the block with `replacement`, keeping the surrounding text
	/// untouched.
	pub fn splice(&self, replacement: &str) -> String {
		let mut buf =
			String::with_capacity(self.prefix.len() + replacement.len() + self.suffix.len());
		buf.push_str(self.prefix);
		buf.push_str(replacement);
		buf.push_str(self.suffix);
		buf
	}

	/// Byte offset of the opening marker within the original text.
	pub fn start(&self) -> usize {
		self.prefix.len()
	}

	/// Byte offset just past the closing marker within the original text.
	pub fn end(&self) -> usize {
		self.prefix.len() + self.block.len()
	}
}

/// Find the generated block delimited by `opening` and `closing`.
///
/// The first occurrence of `opening` wins. The closing marker is searched for
/// after the end of the opening marker, so a closing marker that only appears
/// earlier in the text yields [`Located::NotFound`].
pub fn locate<'a>(text: &'a str, opening: &str, closing: &str) -> Located<'a> {
	if opening.is_empty() || closing.is_empty() {
		return Located::NotFound;
	}

	let Some(start) = text.find(opening) else {
		return Located::NotFound;
	};

	let search_from = start + opening.len();
	let Some(offset) = text[search_from..].find(closing) else {
		return Located::NotFound;
	};
	let end = search_from + offset + closing.len();

	Located::Found(MarkerSpan {
		prefix: &text[..start],
		block: &text[start..end],
		suffix: &text[end..],
	})
}
