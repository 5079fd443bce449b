use clap::{Parser, Subcommand};
use fitpack::collection::UploadCollection;
use fitpack::config::{self, AppConfig, NamingPolicy};
use fitpack::imaging::{ImageBackend, RustBackend, SizePreset};
use fitpack::{archive, naming, output, preview, scan};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inputs shared by every command that builds a collection.
#[derive(clap::Args, Clone)]
struct UploadArgs {
    /// Image files or directories, appended in order (duplicate names are skipped)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Drop the upload at this position (as shown by `list`); repeatable
    #[arg(long = "remove", value_name = "POS")]
    remove: Vec<usize>,
}

/// Pipeline flags shared by `export` and `preview`. Unset flags fall back to
/// the config file, then to stock defaults.
#[derive(clap::Args, Clone)]
struct PipelineArgs {
    /// Output size preset
    #[arg(long, value_enum)]
    size: Option<SizePreset>,

    /// Apply the sharpening kernel before resizing
    #[arg(long, overrides_with = "no_sharpen")]
    sharpen: bool,

    /// Skip sharpening
    #[arg(long, overrides_with = "sharpen")]
    no_sharpen: bool,

    /// Archive naming: sequenced (c001.jpg, ...) or original upload names
    #[arg(long, value_enum)]
    naming: Option<NamingPolicy>,
}

#[derive(Parser)]
#[command(name = "fitpack")]
#[command(about = "Sharpen, center-crop and resize images into one zip")]
#[command(long_about = "\
Sharpen, center-crop and resize images into one zip

Every image is sharpened, scaled to cover the chosen output box, cropped
around its center to exactly that box, and re-encoded. Export packs the
results into <output>/YYYYMMDD.zip.

Sizes:
  web     1200 x 628    c001.jpg, c002.jpg, ...
  social  1080 x 1080   s001.jpg, ...
  blog     600 x 400    m001.jpg, ...

With --naming original, entries keep their upload name and source format.

Run 'fitpack gen-config' to generate a documented fitpack.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log pipeline details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process every upload and write one dated zip archive
    Export {
        #[command(flatten)]
        uploads: UploadArgs,
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// First sequence number (sequenced naming only)
        #[arg(long, value_name = "N")]
        start: Option<String>,
        /// Directory the archive is written to
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Process every upload on its own and write the results to a directory
    Preview {
        #[command(flatten)]
        uploads: UploadArgs,
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Directory preview images are written to
        #[arg(long, default_value = "preview")]
        out_dir: PathBuf,
    },
    /// Show the deduplicated upload collection
    List {
        #[command(flatten)]
        uploads: UploadArgs,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the size presets
    Sizes,
    /// Print a stock fitpack.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Export {
            uploads,
            pipeline,
            start,
            output: out,
        } => {
            let app = load_app_config(&cli.config, &pipeline, start.as_deref())?;
            // Refuse a bad start number before any file is read.
            let export = app.export.resolve()?;
            let collection = build_collection(&uploads)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_lines(&output::format_archive_event(&event));
                }
            });
            let result = archive::build(&collection, &export, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let built = result?;

            std::fs::create_dir_all(&out)?;
            let filename = naming::archive_filename(chrono::Local::now().date_naive());
            let path = out.join(&filename);
            std::fs::write(&path, &built.bytes)?;
            tracing::info!(path = %path.display(), len = built.bytes.len(), "Archive written");
            println!(
                "{}",
                output::format_export_summary(built.files.len(), &path.display().to_string())
            );
        }
        Command::Preview {
            uploads,
            pipeline,
            out_dir,
        } => {
            let app = load_app_config(&cli.config, &pipeline, None)?;
            init_thread_pool(&app.processing);
            let collection = build_collection(&uploads)?;
            let params = app.export.transform_params();

            let outcomes = preview::preview_all(&RustBackend::new(), &collection, &params);
            std::fs::create_dir_all(&out_dir)?;
            for outcome in &outcomes {
                if let Ok(t) = &outcome.result {
                    let path = out_dir.join(preview_filename(
                        outcome.index,
                        &outcome.name,
                        t.format.extension(),
                    ));
                    std::fs::write(&path, &t.bytes)?;
                }
            }
            output::print_lines(&output::format_preview_outcomes(&outcomes));
        }
        Command::List { uploads, json } => {
            let collection = build_collection(&uploads)?;
            let backend = RustBackend::new();
            if json {
                let rows = list_rows(&backend, &collection);
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                output::print_lines(&output::format_collection(&collection, |bytes| {
                    backend.identify(bytes)
                }));
            }
        }
        Command::Sizes => {
            output::print_lines(&output::format_sizes());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "fitpack=debug" } else { "fitpack=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Express the pipeline flags as a sparse TOML table and layer it over the
/// config file.
fn load_app_config(
    path: &Path,
    pipeline: &PipelineArgs,
    start: Option<&str>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut export = toml::Table::new();
    if let Some(size) = pipeline.size {
        export.insert("size".into(), toml::Value::try_from(size)?);
    }
    if let Some(naming) = pipeline.naming {
        export.insert("naming".into(), toml::Value::try_from(naming)?);
    }
    if pipeline.sharpen {
        export.insert("sharpen".into(), toml::Value::Boolean(true));
    } else if pipeline.no_sharpen {
        export.insert("sharpen".into(), toml::Value::Boolean(false));
    }
    if let Some(start) = start {
        export.insert("start_number".into(), toml::Value::String(start.to_string()));
    }

    let mut overrides = toml::Table::new();
    if !export.is_empty() {
        overrides.insert("export".into(), toml::Value::Table(export));
    }
    Ok(config::load_config(path, toml::Value::Table(overrides))?)
}

/// Read inputs into a fresh collection and apply `--remove` positions.
///
/// Positions refer to the listing before any removal, so they are applied
/// from the highest down.
fn build_collection(args: &UploadArgs) -> Result<UploadCollection, Box<dyn std::error::Error>> {
    let mut collection = UploadCollection::new();
    let entries = scan::read_uploads(&args.inputs)?;
    let read = entries.len();
    let added = collection.append(entries);
    if added < read {
        tracing::info!(skipped = read - added, "Skipped duplicate upload names");
    }

    let mut positions = args.remove.clone();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    for pos in positions {
        let index = pos
            .checked_sub(1)
            .ok_or("--remove positions start at 1")?;
        let removed = collection.remove_at(index)?;
        tracing::debug!(position = pos, name = %removed.name(), "Removed upload");
    }
    Ok(collection)
}

fn preview_filename(index: usize, name: &str, extension: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{:03}-{}.{}", index + 1, stem, extension)
}

#[derive(Serialize)]
struct ListRow<'a> {
    position: usize,
    name: &'a str,
    len: usize,
    width: Option<u32>,
    height: Option<u32>,
    error: Option<String>,
}

fn list_rows<'a>(backend: &impl ImageBackend, collection: &'a UploadCollection) -> Vec<ListRow<'a>> {
    collection
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let (width, height, error) = match backend.identify(entry.bytes()) {
                Ok(d) => (Some(d.width), Some(d.height), None),
                Err(e) => (None, None, Some(e.to_string())),
            };
            ListRow {
                position: i + 1,
                name: entry.name(),
                len: entry.bytes().len(),
                width,
                height,
                error,
            }
        })
        .collect()
}
