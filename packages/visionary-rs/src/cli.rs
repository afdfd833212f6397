//! Command line arguments backing the `visionary` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "visionary",
  about = "Analyze images with Azure AI Vision: tags, caption, objects, people and text",
  version
)]
pub struct Args {
  /// Log request details to stderr
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Analyze an image and print what was found
  Analyze {
    /// Image file to analyze (JPEG or PNG)
    image: PathBuf,

    /// Directory to write objects.png and people.png into
    #[arg(long, short = 'o')]
    out_dir: Option<PathBuf>,

    /// TrueType/OpenType font for box labels instead of the bundled DejaVu Sans Mono
    #[arg(long, env = "VISIONARY_FONT")]
    font: Option<PathBuf>,

    /// Print the results as JSON instead of text
    #[arg(long)]
    json: bool,
  },
}
