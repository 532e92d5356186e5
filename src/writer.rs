use {
	crate::{save::Photo, Result, Rgb, HEIGHT, WIDTH},
	image::ImageFormat,
	png::{BitDepth, ColorType},
	std::{
		fs::File,
		io::{BufWriter, Write},
		path::{Path, PathBuf},
	},
};

pub const OUTPUT_PREFIX: &str = "output";

/// Encodes one photo into `<outputDir>/<baseName>.<extension>`.
pub trait ImageWriter {
	fn extension(&self) -> &'static str;

	/// Returns the path written.
	///
	/// # Errors
	///
	/// Whatever creating the file or encoding the image reports.
	fn write(&self, photo: &Photo, baseName: &str, outputDir: Option<&Path>) -> Result<PathBuf>;

	fn fileName(&self, baseName: &str, outputDir: Option<&Path>) -> PathBuf {
		let fileName = format!("{baseName}.{}", self.extension());
		match outputDir {
			Some(outputDir) => outputDir.join(fileName),
			None => PathBuf::from(fileName),
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
	#[default]
	Png,
	Jpeg,
	Gif,
	Bmp,
	Webp,
	Avif,
	Xbm,
	Wbmp,
}

impl OutputFormat {
	#[must_use]
	pub fn writer(self) -> Box<dyn ImageWriter> {
		match self {
			Self::Png => Box::new(PngWriter),
			Self::Jpeg => Box::new(EncodedWriter::new(ImageFormat::Jpeg, "jpeg")),
			Self::Gif => Box::new(EncodedWriter::new(ImageFormat::Gif, "gif")),
			Self::Bmp => Box::new(EncodedWriter::new(ImageFormat::Bmp, "bmp")),
			Self::Webp => Box::new(EncodedWriter::new(ImageFormat::WebP, "webp")),
			Self::Avif => Box::new(EncodedWriter::new(ImageFormat::Avif, "avif")),
			Self::Xbm => Box::new(XbmWriter),
			Self::Wbmp => Box::new(WbmpWriter),
		}
	}
}

/// Writes photo n (1-based, in decode order) as `output_<n>`.
///
/// # Errors
///
/// Stops at the first photo `imageWriter` fails on.
pub fn storeAll(photos: &[Photo], imageWriter: &dyn ImageWriter, outputDir: Option<&Path>) -> Result<Vec<PathBuf>> {
	photos
		.iter()
		.enumerate()
		.map(|(i, photo)| imageWriter.write(photo, &format!("{OUTPUT_PREFIX}_{}", i + 1), outputDir))
		.collect()
}

/// Indexed 2-bit PNG; photos carrying more than four colors fall back to 8-bit RGB.
pub struct PngWriter;

impl ImageWriter for PngWriter {
	fn extension(&self) -> &'static str {
		"png"
	}

	fn write(&self, photo: &Photo, baseName: &str, outputDir: Option<&Path>) -> Result<PathBuf> {
		let (path, colors) = (self.fileName(baseName, outputDir), photo.distinctColors());
		let mut png = png::Encoder::new(BufWriter::new(File::create(&path)?), WIDTH as _, HEIGHT as _);
		if colors.len() <= 4 {
			png.set_color(ColorType::Indexed);
			png.set_depth(BitDepth::Two);
			png.set_palette(colors.iter().flat_map(|rgb| rgb.toArray()).collect::<Vec<_>>());
			png.write_header()?.write_image_data(&packIndices(photo.pixels(), &colors))?;
		} else {
			png.set_color(ColorType::Rgb);
			png.write_header()?.write_image_data(&photo.toRgbBytes())?;
		}
		Ok(path)
	}
}

// four pixels per byte, leftmost in the high bits; WIDTH keeps rows byte-aligned
#[allow(clippy::cast_possible_truncation)]
fn packIndices(pixels: &[Rgb], colors: &[Rgb]) -> Vec<u8> {
	pixels
		.chunks_exact(4)
		.map(|quad| {
			quad.iter().fold(0, |byte, rgb| (byte << 2) | colors.iter().position(|color| color == rgb).unwrap_or(0) as u8)
		})
		.collect()
}

/// Anything the `image` crate encodes from 8-bit RGB.
pub struct EncodedWriter {
	format: ImageFormat,
	extension: &'static str,
}

impl EncodedWriter {
	#[must_use]
	pub const fn new(format: ImageFormat, extension: &'static str) -> Self {
		Self { format, extension }
	}
}

impl ImageWriter for EncodedWriter {
	fn extension(&self) -> &'static str {
		self.extension
	}

	#[allow(clippy::cast_possible_truncation)]
	fn write(&self, photo: &Photo, baseName: &str, outputDir: Option<&Path>) -> Result<PathBuf> {
		let path = self.fileName(baseName, outputDir);
		let image = image::RgbImage::from_fn(WIDTH as _, HEIGHT as _, |x, y| {
			image::Rgb(photo.pixel(x as _, y as _).toArray())
		});
		image.save_with_format(&path, self.format)?;
		Ok(path)
	}
}

/// Dark pixels are ink in the monochrome formats.
#[must_use]
pub fn isInk(rgb: Rgb) -> bool {
	rgb.luma() < 0x80
}

// rows padded to whole bytes
fn packMonochrome(pixels: &[Rgb], bitFor: impl Fn(Rgb) -> bool, lsbFirst: bool) -> Vec<u8> {
	let mut bytes = Vec::with_capacity(HEIGHT * WIDTH.div_ceil(8));
	for row in pixels.chunks_exact(WIDTH) {
		for octet in row.chunks(8) {
			bytes.push(octet.iter().enumerate().fold(0, |byte, (i, &rgb)| {
				byte | (u8::from(bitFor(rgb)) << if lsbFirst { i } else { 7 - i })
			}));
		}
	}
	bytes
}

/// X11 bitmap: C source, ink bits set, least significant bit leftmost.
pub struct XbmWriter;

impl ImageWriter for XbmWriter {
	fn extension(&self) -> &'static str {
		"xbm"
	}

	fn write(&self, photo: &Photo, baseName: &str, outputDir: Option<&Path>) -> Result<PathBuf> {
		let path = self.fileName(baseName, outputDir);
		let name: String =
			baseName.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect();
		let out = &mut BufWriter::new(File::create(&path)?);
		writeln!(out, "#define {name}_width {WIDTH}")?;
		writeln!(out, "#define {name}_height {HEIGHT}")?;
		write!(out, "static unsigned char {name}_bits[] = {{")?;
		for (i, byte) in packMonochrome(photo.pixels(), isInk, true).into_iter().enumerate() {
			let separator = match i {
				0 => "\n  ",
				_ if i % 12 == 0 => ",\n  ",
				_ => ", ",
			};
			write!(out, "{separator}0x{byte:02x}")?;
		}
		writeln!(out, "}};")?;
		out.flush()?;
		Ok(path)
	}
}

/// Wireless bitmap, type 0: white bits set, most significant bit leftmost.
pub struct WbmpWriter;

impl ImageWriter for WbmpWriter {
	fn extension(&self) -> &'static str {
		"wbmp"
	}

	fn write(&self, photo: &Photo, baseName: &str, outputDir: Option<&Path>) -> Result<PathBuf> {
		let path = self.fileName(baseName, outputDir);
		let out = &mut BufWriter::new(File::create(&path)?);
		// type, fixed header
		out.write_all(&[0, 0])?;
		out.write_all(&multiByteInt(WIDTH))?;
		out.write_all(&multiByteInt(HEIGHT))?;
		out.write_all(&packMonochrome(photo.pixels(), |rgb| !isInk(rgb), false))?;
		out.flush()?;
		Ok(path)
	}
}

/*
	WBMP multi-byte integer :

	7 bits per byte, most significant group first,
	continuation bit (0x80) set on every byte but the last.
*/
#[allow(clippy::cast_possible_truncation)]
fn multiByteInt(mut value: usize) -> Vec<u8> {
	let mut bytes = vec![(value & 0x7F) as u8];
	value >>= 7;
	while value != 0 {
		bytes.push((value & 0x7F) as u8 | 0x80);
		value >>= 7;
	}
	bytes.reverse();
	bytes
}
