use {
	crate::{
		palette::LazyPalette,
		tile::{self, PixelGrid},
		writer::{self, ImageWriter},
		Error, Palette, Result, Rgb, ACTIVE_FLAGS_OFFSET, SAVE_SIZE, SLOT_COUNT, WIDTH,
	},
	byteorder::ReadBytesExt,
	slog::Logger,
	std::{
		fs::{self, File},
		io::{self, Read},
		path::{Path, PathBuf},
	},
};

/// Flag byte of a deleted slot.
pub const DELETED: i8 = -1;

/// One decoded photo: the slot it came from and its 128x112 RGB pixels, row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Photo {
	pub slot: usize,
	pixels: Vec<Rgb>,
}

impl Photo {
	fn render(slot: usize, grid: &PixelGrid, palette: &Palette) -> Result<Self> {
		let mut lazy = LazyPalette::new(palette);
		let pixels = grid.values().iter().map(|&value| lazy.rgbFor(value)).collect::<Result<_>>()?;
		Ok(Self { slot, pixels })
	}

	#[must_use]
	pub fn pixel(&self, x: usize, y: usize) -> Rgb {
		self.pixels[y * WIDTH + x]
	}

	#[must_use]
	pub fn pixels(&self) -> &[Rgb] {
		&self.pixels
	}

	#[must_use]
	pub fn toRgbBytes(&self) -> Vec<u8> {
		self.pixels.iter().flat_map(|rgb| rgb.toArray()).collect()
	}

	/// In order of first appearance.
	#[must_use]
	pub fn distinctColors(&self) -> Vec<Rgb> {
		let mut colors = Vec::with_capacity(4);
		for &rgb in &self.pixels {
			if !colors.contains(&rgb) {
				colors.push(rgb);
			}
		}
		colors
	}
}

/// Reads the signed active-flag table.
///
/// # Errors
///
/// Only if the table cannot be read, which a full-size save rules out.
pub fn readActiveFlags(save: &[u8; SAVE_SIZE]) -> io::Result<[i8; SLOT_COUNT]> {
	let mut cursor = io::Cursor::new(&save[..]);
	cursor.set_position(ACTIVE_FLAGS_OFFSET as _);
	let mut flags = [0; SLOT_COUNT];
	cursor.read_i8_into(&mut flags)?;
	Ok(flags)
}

pub struct SaveDecoder {
	logger: Logger,
}

impl Default for SaveDecoder {
	fn default() -> Self {
		Self::new(Logger::root(slog::Discard, slog::o!()))
	}
}

impl SaveDecoder {
	#[must_use]
	pub fn new(logger: Logger) -> Self {
		Self { logger }
	}

	/// Decodes every active photo (or all 30 with `includeInactiveSlots`) in slot order.
	/// `palette` defaults to [`crate::PalettePreset::BlackAndWhite`].
	///
	/// # Errors
	///
	/// [`Error::InvalidFileSize`] for a save that is not exactly [`SAVE_SIZE`] bytes,
	/// [`Error::InvalidColorCode`] for a palette expression a decoded pixel needs.
	pub fn decode(&self, save: &[u8], palette: Option<&Palette>, includeInactiveSlots: bool) -> Result<Vec<Photo>> {
		let save = <&[u8; SAVE_SIZE]>::try_from(save)
			.map_err(|_| Error::InvalidFileSize { expected: SAVE_SIZE, actual: save.len() })?;
		let fallback;
		let palette = match palette {
			Some(palette) => palette,
			None => {
				fallback = Palette::default();
				&fallback
			}
		};

		let mut photos = Vec::with_capacity(SLOT_COUNT);
		for (slot, flag) in readActiveFlags(save)?.into_iter().enumerate() {
			if flag == DELETED && !includeInactiveSlots {
				slog::debug!(self.logger, "skipping deleted slot"; "slot" => slot);
				continue;
			}
			slog::debug!(self.logger, "decoding slot"; "slot" => slot, "flag" => flag);
			photos.push(Photo::render(slot, &tile::decodeSlot(save, slot), palette)?);
		}
		slog::info!(
			self.logger, "decoded save";
			"photos" => photos.len(), "includeInactiveSlots" => includeInactiveSlots
		);
		Ok(photos)
	}

	/// Checks the file's length, reads it, then [`Self::decode`]s it.
	///
	/// # Errors
	///
	/// [`Error::FileNotFound`] for a missing path. [`Error::InvalidFileSize`] when the
	/// metadata length is not [`SAVE_SIZE`]: directories and devices report their own
	/// length (usually 0) and are never read. Otherwise as [`Self::decode`].
	pub fn decodeFile(
		&self,
		path: impl AsRef<Path>,
		palette: Option<&Palette>,
		includeInactiveSlots: bool,
	) -> Result<Vec<Photo>> {
		let path = path.as_ref();
		let length = fs::metadata(path)
			.map_err(|err| match err.kind() {
				io::ErrorKind::NotFound => Error::FileNotFound(path.to_owned()),
				_ => Error::Io(err),
			})?
			.len();
		if length != SAVE_SIZE as u64 {
			return Err(Error::InvalidFileSize {
				expected: SAVE_SIZE,
				actual: usize::try_from(length).unwrap_or(usize::MAX),
			});
		}

		// the file may grow between the two calls; one extra byte is enough to notice
		let mut save = Vec::with_capacity(SAVE_SIZE + 1);
		File::open(path)?.take(SAVE_SIZE as u64 + 1).read_to_end(&mut save)?;
		slog::debug!(self.logger, "read save file"; "path" => %path.display(), "size" => save.len());
		self.decode(&save, palette, includeInactiveSlots)
	}

	/// [`Self::decodeFile`], then [`writer::storeAll`].
	///
	/// # Errors
	///
	/// As [`Self::decodeFile`], plus whatever `imageWriter` reports; nothing is written
	/// unless the whole save decodes.
	pub fn extractAndStore(
		&self,
		path: impl AsRef<Path>,
		palette: Option<&Palette>,
		includeInactiveSlots: bool,
		imageWriter: &dyn ImageWriter,
		outputDir: Option<&Path>,
	) -> Result<Vec<PathBuf>> {
		let photos = self.decodeFile(path, palette, includeInactiveSlots)?;
		let paths = writer::storeAll(&photos, imageWriter, outputDir)?;
		for path in &paths {
			slog::info!(self.logger, "wrote photo"; "path" => %path.display());
		}
		Ok(paths)
	}
}

#[cfg(test)]
mod tests {
	use {super::*, crate::{PalettePreset, HEIGHT}};

	fn blankSave() -> Vec<u8> {
		vec![0; SAVE_SIZE]
	}

	#[test]
	fn wrong_sizes_are_rejected_with_the_actual_length() {
		let decoder = SaveDecoder::default();
		for actual in [0, SAVE_SIZE - 1, SAVE_SIZE + 1] {
			match decoder.decode(&vec![0; actual], None, false) {
				Err(Error::InvalidFileSize { expected, actual: reported }) => {
					assert_eq!((expected, reported), (SAVE_SIZE, actual));
				}
				other => panic!("{actual}: {other:?}"),
			}
		}
	}

	#[test]
	fn active_flags_are_signed() {
		let mut save = blankSave();
		save[ACTIVE_FLAGS_OFFSET] = 0xFF;
		save[ACTIVE_FLAGS_OFFSET + 1] = 0x80;
		save[ACTIVE_FLAGS_OFFSET + SLOT_COUNT - 1] = 0x7F;
		let flags = readActiveFlags(save.as_slice().try_into().unwrap()).unwrap();
		assert_eq!(&flags[..2], &[DELETED, i8::MIN]);
		assert_eq!(flags[SLOT_COUNT - 1], i8::MAX);
	}

	#[test]
	fn only_0xff_marks_a_slot_deleted() {
		let mut save = blankSave();
		for slot in [0, 5, 29] {
			save[ACTIVE_FLAGS_OFFSET + slot] = 0xFF;
		}
		save[ACTIVE_FLAGS_OFFSET + 6] = 0xFE;
		let photos = SaveDecoder::default().decode(&save, None, false).unwrap();
		let slots: Vec<_> = photos.iter().map(|photo| photo.slot).collect();
		assert_eq!(slots, (1..29).filter(|&slot| slot != 5).collect::<Vec<_>>());
	}

	#[test]
	fn inactive_slots_can_be_included() {
		let save = vec![0xFF; SAVE_SIZE];
		let decoder = SaveDecoder::default();
		assert!(decoder.decode(&save, None, false).unwrap().is_empty());
		let photos = decoder.decode(&save, None, true).unwrap();
		assert_eq!(photos.len(), SLOT_COUNT);
		assert!(photos.iter().enumerate().all(|(i, photo)| photo.slot == i));
	}

	#[test]
	fn pixels_map_through_the_palette() {
		let save = blankSave();
		let palette = Palette::fromPreset(PalettePreset::Gameboy);
		let photos = SaveDecoder::default().decode(&save, Some(&palette), false).unwrap();
		assert_eq!(photos.len(), SLOT_COUNT);
		assert!(photos[0].pixels().iter().all(|&rgb| rgb == Rgb::new(0x9B, 0xBC, 0x0F)));
		assert_eq!(photos[0].pixels().len(), WIDTH * HEIGHT);
		assert_eq!(photos[0].distinctColors(), [Rgb::new(0x9B, 0xBC, 0x0F)]);
	}

	#[test]
	fn invalid_color_stops_the_decode() {
		let save = blankSave();
		let palette = Palette::fromColors("notacolor", "#ccc", "#666", "#000");
		assert!(matches!(
			SaveDecoder::default().decode(&save, Some(&palette), false),
			Err(Error::InvalidColorCode(code)) if code == "notacolor"
		));
	}

	#[test]
	fn unused_invalid_color_is_never_resolved() {
		let save = blankSave();
		let palette = Palette::fromColors("#fff", "#ccc", "#666", "notacolor");
		assert!(SaveDecoder::default().decode(&save, Some(&palette), false).is_ok());
	}

	#[test]
	fn missing_file_is_reported_with_its_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nothing.sav");
		match SaveDecoder::default().decodeFile(&path, None, false) {
			Err(Error::FileNotFound(reported)) => assert_eq!(reported, path),
			other => panic!("{other:?}"),
		}
	}

	#[test]
	fn file_size_is_checked_before_reading() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("short.sav");
		fs::write(&path, [0_u8; 64]).unwrap();
		assert!(matches!(
			SaveDecoder::default().decodeFile(&path, None, false),
			Err(Error::InvalidFileSize { actual: 64, .. })
		));
	}

	#[test]
	fn oversized_file_is_rejected_by_its_length() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("huge.sav");
		// sparse, nothing is allocated on disk
		File::create(&path).unwrap().set_len(64 * SAVE_SIZE as u64).unwrap();
		match SaveDecoder::default().decodeFile(&path, None, false) {
			Err(Error::InvalidFileSize { expected, actual }) => {
				assert_eq!(expected, SAVE_SIZE);
				assert_eq!(actual, 64 * SAVE_SIZE);
			}
			other => panic!("{other:?}"),
		}
	}

	#[test]
	fn directory_is_an_invalid_size_not_an_io_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(
			SaveDecoder::default().decodeFile(dir.path(), None, false),
			Err(Error::InvalidFileSize { expected: SAVE_SIZE, .. })
		));
	}

	#[cfg(unix)]
	#[test]
	fn endless_device_is_never_read() {
		assert!(matches!(
			SaveDecoder::default().decodeFile("/dev/zero", None, false),
			Err(Error::InvalidFileSize { actual: 0, .. })
		));
	}
}
