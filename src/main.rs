#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	const_format::formatcp,
	gbcam_extract::{
		config::{self, Ignored},
		OutputFormat, PalettePreset, Result, SaveDecoder, SAVE_SIZE,
	},
	slog::{Drain, Level, Logger},
	std::{path::PathBuf, process::ExitCode},
};

#[derive(Parser, Debug)]
#[clap(version, about = formatcp!("Extracts the photos of a {}-byte Game Boy Camera save", SAVE_SIZE))]
struct Args {
	/// Save file to read
	save: PathBuf,
	/// Directory the images are written into (defaults to the working directory)
	#[clap(short, long)]
	outputDir: Option<PathBuf>,
	#[clap(short, long, value_enum, default_value_t)]
	format: OutputFormat,
	#[clap(short, long, value_enum)]
	preset: Option<PalettePreset>,
	/// Four color expressions, lightest pixel value first
	#[clap(long, number_of_values = 4, value_names = &["C1", "C2", "C3", "C4"])]
	colors: Option<Vec<String>>,
	/// TOML file with a `preset` and/or `colors`
	#[clap(long)]
	paletteFile: Option<PathBuf>,
	/// Also extract photos flagged as deleted
	#[clap(long)]
	includeDeleted: bool,
	#[clap(short, long)]
	verbose: bool,
}

fn main() -> ExitCode {
	let args = Args::parse();
	let logger = terminalLogger(if args.verbose { Level::Debug } else { Level::Info });
	match run(&args, &logger) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			slog::error!(logger, "{err}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: &Args, logger: &Logger) -> Result<()> {
	let (palette, ignored) =
		config::choosePalette(args.colors.as_deref(), args.preset, args.paletteFile.as_deref())?;
	for source in ignored {
		match source {
			Ignored::Preset => slog::warn!(logger, "--colors given, ignoring --preset"),
			Ignored::PaletteFile => slog::warn!(logger, "ignoring --palette-file, a higher-precedence palette was given"),
			Ignored::ExtraColors(count) => slog::warn!(logger, "ignoring color expressions past the fourth"; "count" => count),
		}
	}
	slog::debug!(logger, "palette"; "colors" => ?palette.colors());
	let paths = SaveDecoder::new(logger.new(slog::o!("save" => args.save.display().to_string())))
		.extractAndStore(
			&args.save,
			Some(&palette),
			args.includeDeleted,
			&*args.format.writer(),
			args.outputDir.as_deref(),
		)?;
	slog::info!(logger, "done"; "images" => paths.len());
	Ok(())
}

fn terminalLogger(level: Level) -> Logger {
	let decorator = slog_term::TermDecorator::new().stderr().build();
	let drain = slog_term::CompactFormat::new(decorator)
		.use_custom_timestamp(|_: &mut dyn std::io::Write| Ok(()))
		.build()
		.fuse();
	Logger::root(
		slog_async::Async::new(drain.filter_level(level).fuse())
			.overflow_strategy(slog_async::OverflowStrategy::Block)
			.thread_name("async logger".to_string())
			.build()
			.fuse(),
		slog::o!(),
	)
}
