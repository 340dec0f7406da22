//! Navigation bar items

use crate::adapters::RequestContext;
use rampart_forms::escape_html;
use serde::Serialize;
use std::sync::Arc;

/// One entry of the navigation bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavBarItem {
	pub name: String,
	pub link: Option<String>,
	pub bold: bool,
	/// Set on every non-bold item except the last one
	pub append_slash: bool,
}

impl NavBarItem {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn with_link(mut self, link: impl Into<String>) -> Self {
		self.link = Some(link.into());
		self
	}

	pub fn bold(mut self) -> Self {
		self.bold = true;
		self
	}

	/// Renders the item. An item with an empty name renders as nothing.
	pub fn html(&self) -> String {
		let mut html = escape_html(&self.name).into_owned();
		if html.is_empty() {
			return html;
		}
		if self.bold {
			html = format!(
				r#"<h2 class="text-2xl lg:block hidden font-semibold ml-2 pr-2">{}</h2>"#,
				html
			);
		}
		if let Some(link) = self.link.as_deref().filter(|l| !l.is_empty()) {
			html = format!(r#"<a class="link" href="{}">{}</a>"#, escape_html(link), html);
		}
		html
	}
}

/// Produces a navigation bar item for the current request
pub type NavBarGenerator = Arc<dyn Fn(&RequestContext) -> NavBarItem + Send + Sync>;

/// Rendered form of a [`NavBarItem`], as handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNavBarItem {
	pub html: String,
	pub append_slash: bool,
}

/// Runs every generator and drops items that render empty.
pub fn nav_bar_items(generators: &[NavBarGenerator], ctx: &RequestContext) -> Vec<RenderedNavBarItem> {
	let last = generators.len().saturating_sub(1);
	generators
		.iter()
		.enumerate()
		.filter_map(|(idx, generator)| {
			let mut item = generator(ctx);
			if idx != last && !item.bold {
				item.append_slash = true;
			}
			let html = item.html();
			(!html.is_empty()).then_some(RenderedNavBarItem {
				html,
				append_slash: item.append_slash,
			})
		})
		.collect()
}
