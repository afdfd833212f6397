mod cli;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Args, Commands};
use tracing::info;
use tracing_subscriber::EnvFilter;
use visionary_rs::{encode_png, render_report, Annotator, MediaAnalyzer, VisionConfig};

#[tokio::main]
async fn main() {
  let args = Args::parse();
  init_tracing(args.verbose);

  if let Err(e) = run(args).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

async fn run(args: Args) -> Result<()> {
  match args.command {
    Commands::Version => {
      println!("visionary {}", env!("CARGO_PKG_VERSION"));
      Ok(())
    }
    Commands::Analyze {
      image,
      out_dir,
      font,
      json,
    } => analyze(&image, out_dir.as_deref(), font, json).await,
  }
}

async fn analyze(image: &Path, out_dir: Option<&Path>, font: Option<PathBuf>, json: bool) -> Result<()> {
  dotenv::dotenv().ok();

  let config = VisionConfig::from_env().context("vision service is not configured")?;
  let client = config
    .build_client()
    .context("failed to create vision client")?;

  let annotator = match font {
    Some(path) => Annotator::from_font_file(&path)?,
    None => Annotator::new(),
  };

  let bytes = tokio::fs::read(image)
    .await
    .with_context(|| format!("failed to read {}", image.display()))?;

  info!(image = %image.display(), bytes = bytes.len(), endpoint = %config.endpoint, "analyzing image");
  let analyzer = MediaAnalyzer::new(client).with_annotator(annotator);
  let report = analyzer.process(&bytes).await?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report.summary())?);
  } else {
    print!("{}", render_report(&report));
  }

  if let Some(dir) = out_dir {
    tokio::fs::create_dir_all(dir)
      .await
      .with_context(|| format!("failed to create {}", dir.display()))?;

    let outputs = [
      ("objects.png", &report.objects_image),
      ("people.png", &report.people_image),
    ];
    for (name, annotated) in outputs {
      let Some(annotated) = annotated else {
        continue;
      };
      let path = dir.join(name);
      tokio::fs::write(&path, encode_png(annotated)?)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
      info!(path = %path.display(), "wrote annotated image");
    }
  }

  if report.analysis.is_err() && report.text.is_err() {
    bail!("vision service unavailable");
  }

  Ok(())
}
