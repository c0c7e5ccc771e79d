//! CLI binary for memegen.
//!
//! A thin shim over the library crate that maps CLI flags to `MemeConfig`
//! and `MemeRequest`, makes one meme and prints where it was written.

use anyhow::{Context, Result};
use clap::Parser;
use memegen::{MemeConfig, MemeEngine, MemeRequest};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Random image, random quote
  meme

  # Explicit quote on a random image
  meme --body "To bork or not to bork" --author Bork

  # Everything explicit, narrower output
  meme --path _data/photos/dog/xander_1.jpg --body "Hi" --author Rex --width 300

  # Image from a URL
  meme --path https://example.com/dog.png

  # Custom corpora, reproducible selection
  meme --images ./photos --quotes ./quotes --seed 42

  # Path of the last meme written
  meme --latest

QUOTE FILES:
  .txt    one "<body> - <author>" per line
  .pdf    same, extracted with `pdftotext -raw` (poppler-utils)
  .docx   same, one quote per paragraph
  .csv    header row with `body` and `author` columns

ENVIRONMENT VARIABLES:
  Every flag can also be set through MEME_<FLAG>, e.g. MEME_IMAGES,
  MEME_OUTPUT_DIR, MEME_SEED. RUST_LOG overrides --verbose / --quiet.
"#;

/// Caption a photo with a quote and archive it as a numbered JPEG.
#[derive(Parser, Debug)]
#[command(
    name = "meme",
    version,
    about = "Caption a photo with a quote and archive it as a numbered JPEG",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image path or HTTP/HTTPS URL. Random from --images when unset.
    #[arg(long, env = "MEME_PATH")]
    path: Option<String>,

    /// Quote body. Requires --author.
    #[arg(long, env = "MEME_BODY")]
    body: Option<String>,

    /// Quote author.
    #[arg(long, env = "MEME_AUTHOR")]
    author: Option<String>,

    /// Output width in pixels (1–500). Default: 500.
    #[arg(long, env = "MEME_WIDTH")]
    width: Option<u32>,

    /// Caption font size in pixels. Default: 30.
    #[arg(long, env = "MEME_TEXT_SIZE")]
    text_size: Option<u32>,

    /// Image corpus directory.
    #[arg(long, env = "MEME_IMAGES")]
    images: Option<PathBuf>,

    /// Quote corpus directory.
    #[arg(long, env = "MEME_QUOTES")]
    quotes: Option<PathBuf>,

    /// TrueType/OpenType font for the caption.
    #[arg(long, env = "MEME_FONT")]
    font: Option<PathBuf>,

    /// Directory memes are written to.
    #[arg(long, env = "MEME_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Sequence counter file.
    #[arg(long, env = "MEME_INDEX_FILE")]
    index_file: Option<PathBuf>,

    /// pdftotext executable.
    #[arg(long, env = "MEME_PDFTOTEXT")]
    pdftotext: Option<PathBuf>,

    /// Seed for random image and quote selection.
    #[arg(long, env = "MEME_SEED")]
    seed: Option<u64>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "MEME_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print the path of the latest meme and exit.
    #[arg(long)]
    latest: bool,

    /// Print the full result as JSON instead of just the path.
    #[arg(long, env = "MEME_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MEME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MEME_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let engine = MemeEngine::new(config).context("Failed to set up meme engine")?;

    // ── Latest-only mode ─────────────────────────────────────────────────
    if cli.latest {
        match engine.latest_meme().context("Failed to read meme index")? {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("No memes have been made yet"),
        }
        return Ok(());
    }

    // ── Make the meme ────────────────────────────────────────────────────
    let request = MemeRequest {
        width: cli.width,
        text_size: cli.text_size,
        image: None,
        body: cli.body.clone(),
        author: cli.author.clone(),
    };

    let artifact = match cli.path.as_deref() {
        Some(input) => engine.make_meme_from_input(input, request).await,
        None => tokio::task::block_in_place(|| engine.make_meme(request)),
    }
    .context("Failed to make meme")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&artifact).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        println!("{}", artifact.path.display());
    }

    Ok(())
}

/// Map CLI args to `MemeConfig`. Unset flags keep the library defaults.
fn build_config(cli: &Cli) -> Result<MemeConfig> {
    let mut builder = MemeConfig::builder().download_timeout_secs(cli.download_timeout);

    if let Some(ref dir) = cli.images {
        builder = builder.image_dir(dir);
    }
    if let Some(ref dir) = cli.quotes {
        builder = builder.quote_dir(dir);
    }
    if let Some(ref font) = cli.font {
        builder = builder.font_path(font);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref file) = cli.index_file {
        builder = builder.index_path(file);
    }
    if let Some(ref bin) = cli.pdftotext {
        builder = builder.pdftotext(bin);
    }
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_from([
            "meme",
            "--images",
            "pics",
            "--quotes",
            "q",
            "--output-dir",
            "out",
            "--seed",
            "5",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.image_dir, PathBuf::from("pics"));
        assert_eq!(config.quote_dir, PathBuf::from("q"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.font_path, MemeConfig::default().font_path);
    }
}
