use {
	crate::{
		color::{resolveColor, Rgb},
		Result,
	},
	serde::Deserialize,
};

/// Built-in four-color palettes: the monochrome defaults plus the twelve palettes the
/// Game Boy Color offers for original Game Boy games (d-pad direction, optionally
/// held with A or B, during the boot logo).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Deserialize, clap::ValueEnum)]
pub enum PalettePreset {
	#[default]
	BlackAndWhite,
	Gameboy,
	GameboyPlayer,
	GameboyColorUp,
	GameboyColorUpA,
	GameboyColorUpB,
	GameboyColorDown,
	GameboyColorDownA,
	GameboyColorDownB,
	GameboyColorLeft,
	GameboyColorLeftA,
	GameboyColorLeftB,
	GameboyColorRight,
	GameboyColorRightA,
	GameboyColorRightB,
}

impl PalettePreset {
	pub const ALL: [Self; 15] = [
		Self::BlackAndWhite,
		Self::Gameboy,
		Self::GameboyPlayer,
		Self::GameboyColorUp,
		Self::GameboyColorUpA,
		Self::GameboyColorUpB,
		Self::GameboyColorDown,
		Self::GameboyColorDownA,
		Self::GameboyColorDownB,
		Self::GameboyColorLeft,
		Self::GameboyColorLeftA,
		Self::GameboyColorLeftB,
		Self::GameboyColorRight,
		Self::GameboyColorRightA,
		Self::GameboyColorRightB,
	];

	/// Lightest first: index 0 is pixel value 0.
	#[must_use]
	pub const fn colors(self) -> [&'static str; 4] {
		match self {
			Self::BlackAndWhite => ["#ffffff", "#cccccc", "#666666", "#000000"],
			Self::Gameboy => ["#9bbc0f", "#8bac0f", "#306230", "#0f380f"],
			Self::GameboyPlayer => ["#ffffff", "#ffc000", "#a06000", "#000000"],
			Self::GameboyColorUp => ["#ffffff", "#ffad63", "#843100", "#000000"],
			Self::GameboyColorUpA => ["#ffffff", "#ff8484", "#943a3a", "#000000"],
			Self::GameboyColorUpB => ["#ffe7c5", "#cc9c85", "#846b29", "#5b3109"],
			Self::GameboyColorDown => ["#ffffa5", "#ff9494", "#9494ff", "#000000"],
			Self::GameboyColorDownA => ["#ffffff", "#ffff00", "#ff0000", "#000000"],
			Self::GameboyColorDownB => ["#ffffff", "#ffff00", "#7b4a00", "#000000"],
			Self::GameboyColorLeft => ["#ffffff", "#63a5ff", "#0000ff", "#000000"],
			Self::GameboyColorLeftA => ["#ffffff", "#8c8cde", "#52528c", "#000000"],
			Self::GameboyColorLeftB => ["#ffffff", "#a5a5a5", "#525252", "#000000"],
			Self::GameboyColorRight => ["#ffffff", "#7bff31", "#0063c5", "#000000"],
			Self::GameboyColorRightA => ["#ffffff", "#52ff00", "#ff4200", "#000000"],
			Self::GameboyColorRightB => ["#000000", "#008484", "#ffde00", "#ffffff"],
		}
	}
}

/// Maps each 2-bit pixel value to a color expression.
///
/// Expressions are kept as given and only checked when a decode resolves them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Palette {
	colors: [String; 4],
}

impl Palette {
	#[must_use]
	pub fn fromPreset(preset: PalettePreset) -> Self {
		Self { colors: preset.colors().map(String::from) }
	}

	pub fn fromColors(
		colorOne: impl Into<String>,
		colorTwo: impl Into<String>,
		colorThree: impl Into<String>,
		colorFour: impl Into<String>,
	) -> Self {
		Self { colors: [colorOne.into(), colorTwo.into(), colorThree.into(), colorFour.into()] }
	}

	/// # Panics
	///
	/// If `pixelValue` is not a 2-bit value.
	#[must_use]
	pub fn colorForPixelValue(&self, pixelValue: u8) -> &str {
		assert!(pixelValue < 4, "pixel value {pixelValue} is not 2-bit");
		&self.colors[usize::from(pixelValue)]
	}

	#[must_use]
	pub fn colors(&self) -> &[String; 4] {
		&self.colors
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::fromPreset(PalettePreset::default())
	}
}

impl From<PalettePreset> for Palette {
	fn from(preset: PalettePreset) -> Self {
		Self::fromPreset(preset)
	}
}

impl From<[String; 4]> for Palette {
	fn from(colors: [String; 4]) -> Self {
		Self { colors }
	}
}

/// Per-image view of a [`Palette`] that resolves each expression on first use.
pub struct LazyPalette<'a> {
	palette: &'a Palette,
	resolved: [Option<Rgb>; 4],
}

impl<'a> LazyPalette<'a> {
	#[must_use]
	pub fn new(palette: &'a Palette) -> Self {
		Self { palette, resolved: [None; 4] }
	}

	/// # Errors
	///
	/// [`crate::Error::InvalidColorCode`] if the expression for `pixelValue` does not parse.
	pub fn rgbFor(&mut self, pixelValue: u8) -> Result<Rgb> {
		let expression = self.palette.colorForPixelValue(pixelValue);
		let slot = &mut self.resolved[usize::from(pixelValue)];
		if let Some(rgb) = *slot {
			return Ok(rgb);
		}
		let rgb = resolveColor(expression)?;
		*slot = Some(rgb);
		Ok(rgb)
	}
}
