use regex::Regex;
use tracing::debug;

use crate::view::decl::parse_type_name;
use crate::view::{Result, TypeMatcher, ValueKind, ViewError};

/// Default category name for the runtime printers.
pub const DEFAULT_CATEGORY: &str = "rtview";

/// Debugger host whose pattern conventions a category follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFlavor {
	/// Anchored regular expressions over the full type name.
	Lldb,
	/// Exact name or parametric-prefix recognition after stripping one pointer layer.
	Gdb,
}

impl HostFlavor {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lldb => "lldb",
			Self::Gdb => "gdb",
		}
	}
}

/// Provider role a printer plays in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
	/// One-line summary string.
	Summary,
	/// Synthetic indexed children.
	Synthetic,
}

impl ProviderKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Summary => "summary",
			Self::Synthetic => "synthetic",
		}
	}
}

#[derive(Debug, Clone)]
enum Pattern {
	// Host regexes cannot balance parentheses, so in-process lookups re-check with the classifier.
	Regex(Regex, TypeMatcher),
	Name(Box<str>),
}

/// One registered printer.
#[derive(Debug, Clone)]
pub struct Printer {
	name: Box<str>,
	kind: ValueKind,
	provider: ProviderKind,
	enabled: bool,
	pattern: Pattern,
}

impl Printer {
	/// Printer name (the runtime type it handles).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Decoding strategy the printer dispatches to.
	pub fn kind(&self) -> ValueKind {
		self.kind
	}

	/// Host provider role.
	pub fn provider(&self) -> ProviderKind {
		self.provider
	}

	/// Whether this printer is individually enabled.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Pattern source as the host sees it.
	pub fn pattern(&self) -> &str {
		match &self.pattern {
			Pattern::Regex(regex, _) => regex.as_str(),
			Pattern::Name(name) => name,
		}
	}

	/// Whether this printer's pattern accepts `type_name`.
	///
	/// Regex patterns also require the classifier to pick this printer's kind, so names the
	/// host pattern over-approximates (`Array(Int32)(UInt8)`) are left unclaimed.
	pub fn matches(&self, type_name: &str) -> bool {
		match &self.pattern {
			Pattern::Regex(regex, matcher) => regex.is_match(type_name) && matcher.classify(type_name) == self.kind,
			Pattern::Name(name) => name_matches(name, type_name),
		}
	}
}

/// Printers registered and toggled as a unit.
#[derive(Debug, Clone)]
pub struct Category {
	name: Box<str>,
	flavor: HostFlavor,
	enabled: bool,
	printers: Vec<Printer>,
}

impl Category {
	/// Category name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Host flavor the patterns were built for.
	pub fn flavor(&self) -> HostFlavor {
		self.flavor
	}

	/// Whether the category participates in lookup.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Printers in lookup order.
	pub fn printers(&self) -> &[Printer] {
		&self.printers
	}
}

/// Printer picked by [`PrinterRegistry::lookup`].
#[derive(Debug, Clone, Copy)]
pub struct PrinterMatch<'r> {
	/// Owning category.
	pub category: &'r Category,
	/// Matching printer.
	pub printer: &'r Printer,
}

/// Explicit registry of printer categories, as a debugger host would hold them.
#[derive(Debug, Default)]
pub struct PrinterRegistry {
	categories: Vec<Category>,
}

impl PrinterRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the text and sequence printers under `category`, enabled.
	///
	/// Installing a category that already exists replaces it in place, so repeated
	/// installation never duplicates printers.
	pub fn install(&mut self, category: &str, matcher: &TypeMatcher, flavor: HostFlavor) -> Result<&Category> {
		let printers = match flavor {
			HostFlavor::Lldb => vec![
				Printer {
					name: matcher.sequence_name().into(),
					kind: ValueKind::Sequence,
					provider: ProviderKind::Synthetic,
					enabled: true,
					pattern: Pattern::Regex(compile(&sequence_regex(matcher))?, matcher.clone()),
				},
				Printer {
					name: matcher.text_name().into(),
					kind: ValueKind::Text,
					provider: ProviderKind::Summary,
					enabled: true,
					pattern: Pattern::Regex(compile(&text_regex(matcher))?, matcher.clone()),
				},
			],
			HostFlavor::Gdb => vec![
				Printer {
					name: matcher.text_name().into(),
					kind: ValueKind::Text,
					provider: ProviderKind::Summary,
					enabled: true,
					pattern: Pattern::Name(matcher.text_name().into()),
				},
				Printer {
					name: matcher.sequence_name().into(),
					kind: ValueKind::Sequence,
					provider: ProviderKind::Synthetic,
					enabled: true,
					pattern: Pattern::Name(matcher.sequence_name().into()),
				},
			],
		};

		let entry = Category {
			name: category.into(),
			flavor,
			enabled: true,
			printers,
		};

		let idx = match self.categories.iter().position(|item| item.name.as_ref() == category) {
			Some(idx) => {
				debug!(category, flavor = flavor.as_str(), "replacing printer category");
				self.categories[idx] = entry;
				idx
			}
			None => {
				debug!(category, flavor = flavor.as_str(), "installing printer category");
				self.categories.push(entry);
				self.categories.len() - 1
			}
		};
		Ok(&self.categories[idx])
	}

	/// Enable a category. Returns `false` when it is not registered.
	pub fn enable(&mut self, category: &str) -> bool {
		self.set_enabled(category, true)
	}

	/// Disable a category. Returns `false` when it is not registered.
	pub fn disable(&mut self, category: &str) -> bool {
		self.set_enabled(category, false)
	}

	/// Toggle one printer inside a category. Returns `false` when either is not registered.
	pub fn set_printer_enabled(&mut self, category: &str, printer: &str, enabled: bool) -> bool {
		let Some(entry) = self.categories.iter_mut().find(|item| item.name.as_ref() == category) else {
			return false;
		};
		let Some(item) = entry.printers.iter_mut().find(|item| item.name.as_ref() == printer) else {
			return false;
		};
		item.enabled = enabled;
		true
	}

	/// Registered category by name.
	pub fn category(&self, name: &str) -> Option<&Category> {
		self.categories.iter().find(|item| item.name.as_ref() == name)
	}

	/// Categories in installation order.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// First enabled printer accepting `type_name`, searching categories in installation order.
	pub fn lookup(&self, type_name: &str) -> Option<PrinterMatch<'_>> {
		self.categories.iter().filter(|category| category.enabled).find_map(|category| {
			category
				.printers
				.iter()
				.find(|printer| printer.enabled && printer.matches(type_name))
				.map(|printer| PrinterMatch { category, printer })
		})
	}

	/// Host command lines reproducing the current registrations.
	pub fn commands(&self) -> Vec<String> {
		let mut out = Vec::new();
		for category in &self.categories {
			match category.flavor {
				HostFlavor::Lldb => {
					for printer in &category.printers {
						let line = match printer.provider {
							ProviderKind::Summary => format!(
								"type summary add -F rtview.{}_summary -x \"{}\" -w {}",
								printer.kind.as_str(),
								printer.pattern(),
								category.name
							),
							ProviderKind::Synthetic => format!(
								"type synthetic add -l rtview.{}_children -x \"{}\" -w {}",
								printer.kind.as_str(),
								printer.pattern(),
								category.name
							),
						};
						out.push(line);
					}
					let toggle = if category.enabled { "enable" } else { "disable" };
					out.push(format!("type category {toggle} {}", category.name));
				}
				HostFlavor::Gdb => {
					for printer in &category.printers {
						let toggle = if category.enabled && printer.enabled { "enable" } else { "disable" };
						out.push(format!("{toggle} pretty-printer global {};{}", category.name, printer.name));
					}
				}
			}
		}
		out
	}

	fn set_enabled(&mut self, category: &str, enabled: bool) -> bool {
		match self.categories.iter_mut().find(|item| item.name.as_ref() == category) {
			Some(entry) => {
				entry.enabled = enabled;
				true
			}
			None => false,
		}
	}
}

/// Anchored pattern for the text type, its nullable unions, and trailing pointer markers.
pub fn text_regex(matcher: &TypeMatcher) -> String {
	let text = regex::escape(matcher.text_name());
	let nil = regex::escape(matcher.nil_name());
	format!(r"^({text}|\(\s*{text}\s*\|\s*{nil}\s*\)|\(\s*{nil}\s*\|\s*{text}\s*\))(\s*\**)?$")
}

/// Anchored pattern for the sequence type, its parametric instantiations, and trailing pointer markers.
pub fn sequence_regex(matcher: &TypeMatcher) -> String {
	let sequence = regex::escape(matcher.sequence_name());
	format!(r"^{sequence}(\(.+\))?(\s*\**)?$")
}

fn compile(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| ViewError::InvalidPattern {
		pattern: pattern.to_owned(),
		source,
	})
}

fn name_matches(name: &str, type_name: &str) -> bool {
	if parse_type_name(type_name).ptr_depth > 1 {
		return false;
	}
	let stripped = type_name.trim();
	let stripped = stripped.strip_suffix('*').unwrap_or(stripped).trim_end();
	stripped == name || stripped.strip_prefix(name).is_some_and(|rest| rest.starts_with('('))
}
