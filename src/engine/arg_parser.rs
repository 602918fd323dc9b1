use clap::Parser;
use std::path::PathBuf;

/// Batch-convert JPEG, PNG and GIF trees to WebP with cwebp.
#[derive(Clone, Debug, Parser)]
#[command(name = "webpify")]
#[command(
    version,
    about = "Convert every image under INPUT to WebP under OUTPUT, keeping the directory layout."
)]
pub struct Cli {
    /// Directory to read images from.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory to write WebP files to. Created if missing.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Encoder quality, 0-100. Default: 80.
    #[arg(long, short = 'q', value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,

    /// Lossless encoding.
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub lossless: Option<bool>,

    /// Encode JPEG files. If no kind flag is given, all kinds are encoded.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub jpegs: Option<bool>,

    /// Encode PNG files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub pngs: Option<bool>,

    /// Encode GIF files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub gifs: Option<bool>,

    /// Max concurrent encoder processes. Default: one per core.
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// cwebp binary to run. Default: `cwebp` from PATH.
    #[arg(long, value_name = "PATH")]
    pub cwebp: Option<PathBuf>,

    /// Scan and print what would be encoded; write nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    pub fn kind_flags(&self) -> (Option<bool>, Option<bool>, Option<bool>) {
        (self.jpegs, self.pngs, self.gifs)
    }
}
