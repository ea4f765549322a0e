//! Visual theming for the force graph.

use super::types::NodeCategory;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill per category.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub central: Color,
	pub content: Color,
	/// Outline drawn around every circle.
	pub stroke: Color,
	/// How far the fill brightens at full hover (0.0 = not at all).
	pub hover_lighten: f64,
}

impl NodeStyle {
	pub fn fill(&self, category: NodeCategory) -> Color {
		match category {
			NodeCategory::Central => self.central,
			NodeCategory::Content => self.content,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub edge: Color,
	pub node: NodeStyle,
	pub label: Color,
}

impl Theme {
	/// Dark zinc background, coral hub, steel-blue leaves.
	pub fn default_theme() -> Self {
		Self {
			background: Color::rgb(0x18, 0x18, 0x1b),
			edge: Color::rgb(0x6e, 0xa3, 0xd9).with_alpha(0.6),
			node: NodeStyle {
				central: Color::rgb(0xff, 0x6b, 0x6b),
				content: Color::rgb(0x6e, 0xa3, 0xd9),
				stroke: Color::rgb(0x11, 0x11, 0x11),
				hover_lighten: 0.15,
			},
			label: Color::rgb(0xe6, 0xe6, 0xe6),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
