/// Parsed runtime type-name spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeNameDecl<'a> {
	/// Name before any parameter list, or the whole spelling for unions.
	pub base: &'a str,
	/// Parameter list contents for parametric instantiations (`Array(Int32)` -> `Int32`).
	pub params: Option<&'a str>,
	/// Whether a parameter list was opened and closed exactly at the end of the name.
	pub params_closed: bool,
	/// Members of a parenthesized union spelling (`(String | Nil)`).
	pub union_members: Vec<&'a str>,
	/// Trailing pointer marker count (`*`, `**`, ...).
	pub ptr_depth: u8,
}

/// Parse a runtime type-name spelling into base name, parameters, union members, and pointer markers.
pub(crate) fn parse_type_name(raw: &str) -> TypeNameDecl<'_> {
	let trimmed = raw.trim();
	let body = trimmed.trim_end_matches(|c: char| c == '*' || c.is_whitespace());
	let stars = trimmed[body.len()..].chars().filter(|c| *c == '*').count();

	let mut decl = TypeNameDecl {
		base: body,
		params: None,
		params_closed: false,
		union_members: Vec::new(),
		ptr_depth: u8::try_from(stars).unwrap_or(u8::MAX),
	};

	if body.starts_with('(') {
		if matching_close(body, 0) == Some(body.len() - 1) {
			decl.union_members = split_top_level(&body[1..body.len() - 1], '|');
		}
		return decl;
	}

	let Some(open) = body.find('(') else {
		return decl;
	};

	decl.base = body[..open].trim_end();
	match matching_close(body, open) {
		Some(close) => {
			decl.params = Some(body[open + 1..close].trim());
			decl.params_closed = close == body.len() - 1;
		}
		None => decl.params = Some(body[open + 1..].trim()),
	}

	decl
}

fn matching_close(text: &str, open: usize) -> Option<usize> {
	let mut depth = 0_usize;
	for (idx, ch) in text.char_indices().skip_while(|(idx, _)| *idx < open) {
		match ch {
			'(' => depth += 1,
			')' => {
				depth = depth.checked_sub(1)?;
				if depth == 0 {
					return Some(idx);
				}
			}
			_ => {}
		}
	}
	None
}

fn split_top_level(text: &str, sep: char) -> Vec<&str> {
	let mut out = Vec::new();
	let mut depth = 0_usize;
	let mut start = 0;
	for (idx, ch) in text.char_indices() {
		match ch {
			'(' => depth += 1,
			')' => depth = depth.saturating_sub(1),
			c if c == sep && depth == 0 => {
				out.push(text[start..idx].trim());
				start = idx + c.len_utf8();
			}
			_ => {}
		}
	}
	out.push(text[start..].trim());
	out
}
