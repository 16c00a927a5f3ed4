//! Path pattern compilation and matching.
//!
//! Route templates use `:name` tokens for dynamic parts:
//! - `/` - Exact match
//! - `/product/:id/` - Single path parameter
//! - `/order/:order_id/item/:item_id/` - Multiple parameters
//! - `*` or `.*` - Catch-all, matches every pathname
//!
//! A template compiles once, at registration, into a list of segments.
//! Matching walks the segments against the pathname; there is no regular
//! expression engine involved, so literal text never needs escaping.

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::fmt;

/// Path parameters in template order.
pub type Params = IndexMap<String, String>;

/// Characters escaped when a parameter value is written back into a path.
const PATH_PARAM: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

/// One compiled piece of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
	/// Text that must appear verbatim.
	Literal(String),
	/// `:name`, matching one or more characters other than `/`.
	Param(String),
	/// The `*` / `.*` sentinel; matches any pathname.
	Wildcard,
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original template string.
	template: String,
	/// Compiled segments in template order.
	segments: Vec<Segment>,
	/// Parameter names in order.
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a route template.
	///
	/// Never fails: a template that does not describe a real path simply
	/// never matches. A `:` that is not followed by a word character
	/// (`[A-Za-z0-9_]`) stays literal text.
	pub fn compile(template: &str) -> Self {
		if template == "*" || template == ".*" {
			return Self {
				template: template.to_string(),
				segments: vec![Segment::Wildcard],
				param_names: Vec::new(),
			};
		}

		let mut segments = Vec::new();
		let mut param_names = Vec::new();
		let mut literal = String::new();
		let mut rest = template;

		while let Some(c) = rest.chars().next() {
			rest = &rest[c.len_utf8()..];
			if c != ':' {
				literal.push(c);
				continue;
			}

			let name_len = rest
				.find(|ch: char| !is_word_char(ch))
				.unwrap_or(rest.len());
			if name_len == 0 {
				literal.push(c);
				continue;
			}

			if !literal.is_empty() {
				segments.push(Segment::Literal(std::mem::take(&mut literal)));
			}
			let name = rest[..name_len].to_string();
			rest = &rest[name_len..];
			param_names.push(name.clone());
			segments.push(Segment::Param(name));
		}

		if !literal.is_empty() {
			segments.push(Segment::Literal(literal));
		}

		Self {
			template: template.to_string(),
			segments,
			param_names,
		}
	}

	/// Returns the original template string.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the parameter names in template order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether this is the catch-all pattern.
	pub fn is_wildcard(&self) -> bool {
		matches!(self.segments.as_slice(), [Segment::Wildcard])
	}

	/// Returns the raw captured substrings, aligned with
	/// [`param_names`](Self::param_names), or `None` when `path` does not match.
	///
	/// Parameters are greedy: when several splits are possible, earlier
	/// parameters take the longest value that still lets the rest match.
	pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
		let mut captures = Vec::with_capacity(self.param_names.len());
		if match_segments(&self.segments, path, &mut captures) {
			Some(captures)
		} else {
			None
		}
	}

	/// Checks if this pattern would match the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.captures(path).is_some()
	}

	/// Matches `path` and returns the parameters, percent-decoded.
	///
	/// Values that do not decode to valid UTF-8 are kept as captured.
	pub fn match_path(&self, path: &str) -> Option<Params> {
		let captures = self.captures(path)?;
		Some(
			self.param_names
				.iter()
				.zip(captures)
				.map(|(name, raw)| (name.clone(), decode_param(raw)))
				.collect(),
		)
	}

	/// Generates a path from this pattern with the given parameters.
	///
	/// Values are percent-encoded. Returns `None` when a parameter is missing
	/// or the pattern is the catch-all.
	pub fn reverse(&self, params: &Params) -> Option<String> {
		let mut result = String::with_capacity(self.template.len());
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => result.push_str(text),
				Segment::Param(name) => {
					let value = params.get(name)?;
					result.extend(utf8_percent_encode(value, PATH_PARAM));
				}
				Segment::Wildcard => return None,
			}
		}
		Some(result)
	}
}

fn is_word_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn decode_param(raw: &str) -> String {
	match percent_decode_str(raw).decode_utf8() {
		Ok(decoded) => decoded.into_owned(),
		Err(_) => raw.to_string(),
	}
}

fn match_segments<'p>(segments: &[Segment], path: &'p str, captures: &mut Vec<&'p str>) -> bool {
	let Some((segment, rest)) = segments.split_first() else {
		return path.is_empty();
	};

	match segment {
		Segment::Wildcard => true,
		Segment::Literal(text) => match path.strip_prefix(text.as_str()) {
			Some(remaining) => match_segments(rest, remaining, captures),
			None => false,
		},
		Segment::Param(_) => {
			let run = path.find('/').unwrap_or(path.len());
			for end in (1..=run).rev() {
				if !path.is_char_boundary(end) {
					continue;
				}
				captures.push(&path[..end]);
				if match_segments(rest, &path[end..], captures) {
					return true;
				}
				captures.pop();
			}
			false
		}
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.template)
	}
}
