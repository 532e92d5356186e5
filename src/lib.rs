#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub mod color;
pub mod config;
pub mod error;
pub mod palette;
pub mod save;
pub mod writer;

pub use {
	color::{resolveColor, Rgb},
	error::{Error, Result},
	palette::{Palette, PalettePreset},
	save::{Photo, SaveDecoder},
	writer::{ImageWriter, OutputFormat},
};

/// Size of a Game Boy Camera save (battery-backed SRAM dump).
pub const SAVE_SIZE: usize = 0x20000;
pub const SLOT_COUNT: usize = 30;

/// One signed byte per slot; -1 marks a deleted photo.
pub const ACTIVE_FLAGS_OFFSET: usize = 0x11B2;
pub const SLOTS_OFFSET: usize = 0x2000;
pub const SLOT_SIZE: usize = 0x1000;

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 112;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

pub mod tile {
	use crate::{HEIGHT, PIXEL_COUNT, SAVE_SIZE, SLOTS_OFFSET, SLOT_COUNT, SLOT_SIZE, WIDTH};

	pub const TILE_SIZE: usize = 8;
	pub const TILE_BYTES: usize = 2 * TILE_SIZE;
	pub const TILE_COLUMNS: usize = WIDTH / TILE_SIZE;
	pub const TILE_ROWS: usize = HEIGHT / TILE_SIZE;

	const WIDTH_LOG2: usize = WIDTH.trailing_zeros() as _;

	pub trait DrawDestination {
		fn widthLog2(&self) -> usize;
		fn putpixel(&mut self, atIndex: usize, withValue: u8);

		/*
			2bpp planar Tile :

			8 pixel-rows of 2 bytes each : the low bitplane, then the high bitplane.
			bit 7 of both bytes is the leftmost pixel of the row.
		*/
		fn drawTile(&mut self, x0: usize, y0: usize, data: &[u8]) {
			// a tile is 16 bytes, no more, no less
			assert_eq!(data.len(), TILE_BYTES);

			let widthLog2 = self.widthLog2();
			for (y, planes) in data.chunks_exact(2).enumerate() {
				let (planeLow, planeHigh, j) = (planes[0], planes[1], ((y0 + y) << widthLog2) + x0);
				for i in 0..TILE_SIZE {
					let bit = 7 - i;
					self.putpixel(j + i, ((planeLow >> bit) & 1) | (((planeHigh >> bit) & 1) << 1));
				}
			}
		}
	}

	/// Dense 128x112 grid of 2-bit pixel values, row-major.
	pub struct PixelGrid {
		data: Box<[u8; PIXEL_COUNT]>,
	}

	impl PixelGrid {
		#[must_use]
		pub fn new() -> Self {
			Self { data: Box::new([0; PIXEL_COUNT]) }
		}

		#[must_use]
		pub fn get(&self, x: usize, y: usize) -> u8 {
			self.data[y * WIDTH + x]
		}

		#[must_use]
		pub fn values(&self) -> &[u8] {
			&self.data[..]
		}
	}

	impl Default for PixelGrid {
		fn default() -> Self {
			Self::new()
		}
	}

	impl DrawDestination for PixelGrid {
		#[inline(always)]
		fn widthLog2(&self) -> usize {
			WIDTH_LOG2
		}
		#[inline(always)]
		fn putpixel(&mut self, atIndex: usize, withValue: u8) {
			self.data[atIndex] = withValue;
		}
	}

	#[must_use]
	pub const fn slotOffset(slotIndex: usize) -> usize {
		SLOTS_OFFSET + slotIndex * SLOT_SIZE
	}

	/// Unpacks the 16x14 tile region of one photo slot.
	///
	/// # Panics
	///
	/// If `slotIndex` is not below [`SLOT_COUNT`].
	#[must_use]
	pub fn decodeSlot(save: &[u8; SAVE_SIZE], slotIndex: usize) -> PixelGrid {
		assert!(slotIndex < SLOT_COUNT, "slot index {slotIndex} out of range");
		let (mut grid, region) = (PixelGrid::new(), &save[slotOffset(slotIndex)..][..SLOT_SIZE]);
		for (tileIndex, tile) in region.chunks_exact(TILE_BYTES).take(TILE_COLUMNS * TILE_ROWS).enumerate() {
			grid.drawTile((tileIndex % TILE_COLUMNS) * TILE_SIZE, (tileIndex / TILE_COLUMNS) * TILE_SIZE, tile);
		}
		grid
	}

}
