use archive_browser::browser::Browser;
use archive_browser::config::{self, ArchiveConfig};
use archive_browser::filter::{FilterEvent, Selection};
use archive_browser::lazy::{GridGeometry, ViewportObserver};
use archive_browser::render::View;
use archive_browser::{output, page, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Height of one grid row in pixels, used for first-screen estimates.
const ROW_HEIGHT: u32 = 300;

/// Filter flags shared by commands that show a view. An omitted flag shows
/// every value of that field.
#[derive(clap::Args, Clone)]
struct FilterArgs {
    /// Year to show
    #[arg(long)]
    year: Option<String>,

    /// Medium to show, in raw form (e.g. "behind-the-scenes")
    #[arg(long)]
    medium: Option<String>,

    /// Artist display name to show (e.g. "Alban Ovanessian")
    #[arg(long)]
    artist: Option<String>,
}

#[derive(Parser)]
#[command(name = "archive-browser")]
#[command(about = "Index and browse a year/artist/medium image archive")]
#[command(long_about = "\
Index and browse a year/artist/medium image archive

Images live in one folder per year and follow a fixed naming scheme:

  img/Archive/
  ├── 2022/
  │   ├── 2022-alban_ovanessian-01-bts.jpeg
  │   └── 2022-alban_ovanessian-02-final.png
  ├── 2023/                                  # Missing folders are allowed
  └── 2024/
      └── 2024-kim-01-behind-the-scenes.gif

  <year>-<artist_slug>-<sequence>-<medium>.<ext>

'scan' writes the JSON index; 'browse' and 'render' read it back and apply
the year/medium/artist filters.

Run 'archive-browser gen-config' to generate a documented archive.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when absent)
    #[arg(long, default_value = "archive.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the year folders and write the JSON index
    Scan,
    /// Print the filtered view as text
    Browse {
        #[command(flatten)]
        filters: FilterArgs,

        /// Report which images a viewport this many rows tall loads first
        #[arg(long, value_name = "ROWS")]
        viewport: Option<u32>,
    },
    /// Write the filtered view as a static HTML page
    Render {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file
        #[arg(long, default_value = "index.html")]
        out: PathBuf,
    },
    /// Scan without writing the index
    Check,
    /// Print a stock archive.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let config = config::load_config(&cli.config)?;
            let root = Path::new(&config.scan.root);
            let output_path = Path::new(&config.scan.output);
            println!("==> Scanning {}", root.display());
            let report = scan::scan(root, &config.scan);
            scan::write_index(&report.index, output_path)?;
            output::print_scan_output(&report);
            println!("==> Wrote {}", output_path.display());
        }
        Command::Browse { filters, viewport } => {
            let config = config::load_config(&cli.config)?;
            let mut browser = open_browser(&config, viewport.unwrap_or(0))?;
            apply_filters(&mut browser, &filters)?;
            output::print_view(browser.view());
            if viewport.is_some() {
                output::print_first_screen(&browser.image_slots());
            }
        }
        Command::Render { filters, out } => {
            let config = config::load_config(&cli.config)?;
            let mut browser = open_browser(&config, 0)?;
            apply_filters(&mut browser, &filters)?;
            page::write_page(&browser, &config.browser, &out)?;
            output::print_view(browser.view());
            println!("==> Wrote {}", out.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            let root = Path::new(&config.scan.root);
            println!("==> Checking {}", root.display());
            let report = scan::scan(root, &config.scan);
            output::print_scan_output(&report);
            println!("==> {} media items indexed", report.index.total());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Open the configured index behind a viewport `rows` tall.
///
/// A load failure ends the command with the error view's message.
fn open_browser(
    config: &ArchiveConfig,
    rows: u32,
) -> Result<Browser<ViewportObserver>, Box<dyn std::error::Error>> {
    let geometry = GridGeometry {
        columns: config.browser.columns,
        row_height: ROW_HEIGHT,
        viewport_height: rows.saturating_mul(ROW_HEIGHT),
        margin: config.browser.lazy_margin,
    };
    let browser = Browser::open(
        Path::new(&config.browser.index),
        ViewportObserver::new(geometry),
    );
    if let View::Error { message } = browser.view() {
        return Err(message.clone().into());
    }
    Ok(browser)
}

/// Feed each given flag into the browser as a control event.
fn apply_filters(
    browser: &mut Browser<ViewportObserver>,
    filters: &FilterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(catalog) = browser.catalog() else {
        return Ok(());
    };
    let vocab = catalog.vocabularies();
    let year = checked("year", filters.year.as_deref(), catalog.index_years())?;
    let medium = checked("medium", filters.medium.as_deref(), &vocab.media)?;
    let artist = checked("artist", filters.artist.as_deref(), &vocab.artists)?;

    for event in [
        FilterEvent::YearClicked(year),
        FilterEvent::MediumClicked(medium),
        FilterEvent::ArtistChanged(artist),
    ] {
        if !event_is_noop(&event) {
            browser.handle(event);
        }
    }
    Ok(())
}

fn event_is_noop(event: &FilterEvent) -> bool {
    matches!(
        event,
        FilterEvent::YearClicked(Selection::All)
            | FilterEvent::MediumClicked(Selection::All)
            | FilterEvent::ArtistChanged(Selection::All)
    )
}

/// Turn a flag into a selection, rejecting values the controls would not offer.
fn checked(
    field: &str,
    value: Option<&str>,
    choices: &[String],
) -> Result<Selection, Box<dyn std::error::Error>> {
    match value {
        None => Ok(Selection::All),
        Some(v) if choices.iter().any(|c| c == v) => Ok(Selection::only(v)),
        Some(v) => Err(format!("unknown {field} '{v}'. Available: {}", choices.join(", ")).into()),
    }
}
