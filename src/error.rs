use std::{io, path::PathBuf};

pub type Result<T> = core::result::Result<T, Error>;

/// Everything that stops a decode or a store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("file [{}] not found", .0.display())]
	FileNotFound(PathBuf),

	#[error("expected file size [{expected}] but got file size [{actual}]")]
	InvalidFileSize { expected: usize, actual: usize },

	#[error("color code [{0}] is not valid")]
	InvalidColorCode(String),

	#[error("invalid palette file: {0}")]
	Config(#[from] toml::de::Error),

	#[error("png encoding error: {0}")]
	PngEncoding(#[from] png::EncodingError),

	#[error("image encoding error: {0}")]
	ImageEncoding(#[from] image::ImageError),

	#[error("io error: {0}")]
	Io(#[from] io::Error),
}
