use {
	crate::{Error, Palette, PalettePreset, Result},
	serde::Deserialize,
	std::{fs, path::Path},
};

/// Palette file, e.g.
///
/// ```toml
/// preset = "GameboyColorRightA"
/// # overrides the preset
/// colors = ["#fff", "rgb(50%,50%,50%)", "#666", "transparent"]
/// ```
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PaletteConfig {
	pub preset: Option<PalettePreset>,
	pub colors: Option<[String; 4]>,
}

impl PaletteConfig {
	/// # Errors
	///
	/// [`crate::Error::Config`] for malformed TOML or unknown keys.
	pub fn fromToml(toml: &str) -> Result<Self> {
		Ok(toml::from_str(toml)?)
	}

	/// # Errors
	///
	/// [`crate::Error::Io`] if the file cannot be read, otherwise as [`Self::fromToml`].
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		Self::fromToml(&fs::read_to_string(path)?)
	}

	#[must_use]
	pub fn palette(self) -> Palette {
		match self {
			Self { colors: Some(colors), .. } => Palette::from(colors),
			Self { preset, .. } => Palette::fromPreset(preset.unwrap_or_default()),
		}
	}
}

/// A palette source that lost to a higher-precedence one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
	Preset,
	PaletteFile,
	/// Count of color expressions past the fourth.
	ExtraColors(usize),
}

/// Picks the palette: explicit colors, then a preset, then a palette file, then the default.
/// Every source shadowed by a higher one is returned alongside, so the caller can say so.
///
/// # Errors
///
/// [`Error::InvalidColorCode`] when fewer than four colors are given, otherwise as
/// [`PaletteConfig::load`]. The palette file is not read when something shadows it.
pub fn choosePalette(
	colors: Option<&[String]>,
	preset: Option<PalettePreset>,
	paletteFile: Option<&Path>,
) -> Result<(Palette, Vec<Ignored>)> {
	let mut ignored = Vec::new();
	let palette = match colors {
		Some([c1, c2, c3, c4, extra @ ..]) => {
			if preset.is_some() {
				ignored.push(Ignored::Preset);
			}
			if !extra.is_empty() {
				ignored.push(Ignored::ExtraColors(extra.len()));
			}
			Palette::fromColors(&**c1, &**c2, &**c3, &**c4)
		}
		Some(short) => return Err(Error::InvalidColorCode(short.join(" "))),
		None => match preset {
			Some(preset) => Palette::fromPreset(preset),
			None => match paletteFile {
				Some(paletteFile) => return Ok((PaletteConfig::load(paletteFile)?.palette(), ignored)),
				None => Palette::default(),
			},
		},
	};
	if paletteFile.is_some() {
		ignored.push(Ignored::PaletteFile);
	}
	Ok((palette, ignored))
}
