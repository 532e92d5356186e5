use {
	crate::{Error, Result},
	regex::{Captures, Regex},
	std::sync::OnceLock,
};

/// Alias for "no color"; renders as white.
pub const TRANSPARENT: &str = "transparent";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
	pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);

	#[must_use]
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	#[must_use]
	pub const fn toArray(self) -> [u8; 3] {
		[self.r, self.g, self.b]
	}

	/// ITU-R BT.601 luma.
	#[must_use]
	#[allow(clippy::cast_possible_truncation)]
	pub fn luma(self) -> u8 {
		((299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b)) / 1000) as u8
	}
}

impl From<[u8; 3]> for Rgb {
	fn from([r, g, b]: [u8; 3]) -> Self {
		Self::new(r, g, b)
	}
}

static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
static RGB_REGEX: OnceLock<Regex> = OnceLock::new();
static RGB_PERCENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn hexRegex() -> &'static Regex {
	HEX_REGEX.get_or_init(|| Regex::new(r"(?i)^#?([0-9a-f]{3}|[0-9a-f]{6})$").expect("invalid hex color regex"))
}

// components admit up to 299 (and 199%), see `components`.
// Both `rgb(...)` forms are anchored at the start as well as the end, unlike an
// end-only match: leading text such as `xrgb(1,2,3)` or ` rgb(1,2,3)` is rejected.
fn rgbRegex() -> &'static Regex {
	RGB_REGEX.get_or_init(|| {
		Regex::new(
			r"(?ix)
			^rgb\(
			\s*((?:[0-2]?[0-9])?[0-9])\s*,
			\s*((?:[0-2]?[0-9])?[0-9])\s*,
			\s*((?:[0-2]?[0-9])?[0-9])\s*
			\)$",
		)
		.expect("invalid rgb color regex")
	})
}

fn rgbPercentRegex() -> &'static Regex {
	RGB_PERCENT_REGEX.get_or_init(|| {
		Regex::new(
			r"(?ix)
			^rgb\(
			\s*((?:[0-1]?[0-9])?[0-9])%\s*,
			\s*((?:[0-1]?[0-9])?[0-9])%\s*,
			\s*((?:[0-1]?[0-9])?[0-9])%\s*
			\)$",
		)
		.expect("invalid rgb percent color regex")
	})
}

/// Resolves a color expression: `#rgb`/`#rrggbb` (the `#` is optional),
/// `rgb(r, g, b)`, `rgb(r%, g%, b%)` or `transparent`.
///
/// # Errors
///
/// [`Error::InvalidColorCode`] when the expression matches none of the forms, or when
/// an `rgb(...)` component lands outside a byte.
pub fn resolveColor(expression: &str) -> Result<Rgb> {
	let code = if expression == TRANSPARENT { "#FFF" } else { expression };
	let invalid = || Error::InvalidColorCode(expression.to_owned());

	if let Some(captures) = hexRegex().captures(code) {
		#[allow(clippy::cast_possible_truncation)]
		let nibbles: Vec<u8> = captures[1].chars().filter_map(|digit| digit.to_digit(16)).map(|n| n as u8).collect();
		return match nibbles[..] {
			[r, g, b] => Ok(Rgb::new(r * 0x11, g * 0x11, b * 0x11)),
			[r1, r0, g1, g0, b1, b0] => Ok(Rgb::new(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
			_ => Err(invalid()),
		};
	}
	if let Some(captures) = rgbRegex().captures(code) {
		return components(&captures, |value| value).ok_or_else(invalid);
	}
	if let Some(captures) = rgbPercentRegex().captures(code) {
		// exact integer form of truncating `percent * 2.55`
		return components(&captures, |percent| percent * 255 / 100).ok_or_else(invalid);
	}
	Err(invalid())
}

fn components(captures: &Captures<'_>, convert: fn(u32) -> u32) -> Option<Rgb> {
	let mut rgb = [0; 3];
	for (component, capture) in rgb.iter_mut().zip(captures.iter().skip(1)) {
		*component = u8::try_from(convert(capture?.as_str().parse().ok()?)).ok()?;
	}
	Some(Rgb::from(rgb))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rejected(expression: &str) -> bool {
		matches!(resolveColor(expression), Err(Error::InvalidColorCode(code)) if code == expression)
	}

	#[test]
	fn hex_forms() {
		assert_eq!(resolveColor("#FFFFFF").unwrap(), Rgb::WHITE);
		assert_eq!(resolveColor("#fff").unwrap(), Rgb::WHITE);
		assert_eq!(resolveColor("#9bbc0f").unwrap(), Rgb::new(0x9B, 0xBC, 0x0F));
		assert_eq!(resolveColor("#A5c").unwrap(), Rgb::new(0xAA, 0x55, 0xCC));
		assert_eq!(resolveColor("306230").unwrap(), Rgb::new(0x30, 0x62, 0x30));
		assert_eq!(resolveColor("000").unwrap(), Rgb::BLACK);
	}

	#[test]
	fn transparent_is_white() {
		assert_eq!(resolveColor(TRANSPARENT).unwrap(), Rgb::WHITE);
		assert!(rejected("Transparent"));
	}

	#[test]
	fn rgb_triples() {
		assert_eq!(resolveColor("rgb(0,0,0)").unwrap(), Rgb::BLACK);
		assert_eq!(resolveColor("rgb( 12 , 34,56 )").unwrap(), Rgb::new(12, 34, 56));
		assert_eq!(resolveColor("RGB(255,128,7)").unwrap(), Rgb::new(255, 128, 7));
		assert_eq!(resolveColor("rgb(007,0,0)").unwrap(), Rgb::new(7, 0, 0));
	}

	#[test]
	fn rgb_percent_triples_truncate() {
		assert_eq!(resolveColor("rgb(100%,0%,0%)").unwrap(), Rgb::new(255, 0, 0));
		assert_eq!(resolveColor("rgb(50%, 20%, 1%)").unwrap(), Rgb::new(127, 51, 2));
		assert_eq!(resolveColor("rgb(0%,0%,0%)").unwrap(), Rgb::BLACK);
	}

	#[test]
	fn components_that_overflow_a_byte_are_rejected() {
		assert!(rejected("rgb(256,0,0)"));
		assert!(rejected("rgb(0,299,0)"));
		assert!(rejected("rgb(101%,0%,0%)"));
		assert!(rejected("rgb(199%,0%,0%)"));
	}

	#[test]
	fn rgb_forms_are_anchored_at_both_ends() {
		for expression in ["xrgb(1,2,3)", " rgb(1,2,3)", "color: rgb(1,2,3)", "xrgb(1%,2%,3%)", "rgb(1,2,3) "] {
			assert!(rejected(expression), "{expression}");
		}
		assert_eq!(resolveColor("rgb(1,2,3)").unwrap(), Rgb::new(1, 2, 3));
	}

	#[test]
	fn grammar_mismatches_are_rejected() {
		assert!(rejected("notacolor"));
		assert!(rejected(""));
		assert!(rejected("#ffff"));
		assert!(rejected("#gggggg"));
		assert!(rejected("rgb(300,0,0)"));
		assert!(rejected("rgb(200%,0%,0%)"));
		assert!(rejected("rgba(0,0,0,1)"));
		assert!(rejected("rgb(0,0)"));
		assert!(rejected("rgb(10%,0,0)"));
		assert!(rejected("white"));
		assert!(rejected("xrgb(0,0,0)"));
	}
}
