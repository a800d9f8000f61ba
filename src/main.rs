//! Command line front end for Qt Linguist translation catalogs.

use std::fs::File;
use std::io::{
    self,
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use ts_catalog::config::{
    ConfigError,
    SettingsStore,
};
use ts_catalog::{
    Catalog,
    CatalogError,
    CatalogRegistry,
    LocaleCode,
};

/// Inspect and query Qt Linguist `.ts` catalogs.
#[derive(Debug, Parser)]
#[command(name = "ts-catalog", version, about)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Look up one message; prints the source text when it is not translated
    Lookup {
        /// Catalog file
        file: PathBuf,
        /// Context name
        context: String,
        /// Source text
        source: String,
        /// Disambiguation comment
        #[arg(long, default_value = "")]
        comment: String,
        /// Count for numerus messages
        #[arg(long)]
        count: Option<u64>,
    },
    /// Print message counts of each catalog
    Stats {
        /// Catalog files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Re-serialize a catalog
    Dump {
        /// Catalog file
        file: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the catalogs found in a translations directory
    Locales {
        /// Translations directory; taken from the settings when omitted
        dir: Option<PathBuf>,
        /// Directory holding `ts-catalog.json`
        #[arg(long, value_name = "ROOT")]
        settings: Option<PathBuf>,
    },
    /// Show or change the persisted UI language
    Language {
        /// New locale
        #[arg(conflicts_with = "source")]
        locale: Option<String>,
        /// Switch back to the source language
        #[arg(long)]
        source: bool,
        /// Directory holding `ts-catalog.json`
        #[arg(long, value_name = "ROOT", default_value = ".")]
        settings: PathBuf,
    },
}

/// Errors reported by the command line tool
#[derive(Debug, Error)]
enum CliError {
    /// Loading or writing a catalog failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Settings could not be read or saved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output could not be written
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    /// Some of the `stats` inputs failed
    #[error("{0} of {1} catalogs failed to load")]
    PartialFailure(usize, usize),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match init_logging(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            let _ = writeln!(io::stderr(), "error: cannot open log file: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            let _ = writeln!(io::stderr(), "error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the tracing subscriber. Level comes from `RUST_LOG`.
fn init_logging(log_file: Option<&Path>) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
        return Ok(None);
    };

    let file = File::options().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(writer).init();
    Ok(Some(guard))
}

/// Runs one subcommand.
fn run(command: Command) -> Result<(), CliError> {
    let mut out = io::stdout().lock();

    match command {
        Command::Lookup { file, context, source, comment, count } => {
            let catalog = Catalog::load_file(&file)?;
            let text = match count {
                Some(count) => catalog.lookup_plural(&context, &source, &comment, count),
                None => catalog.lookup_disambiguated(&context, &source, &comment).to_string(),
            };
            writeln!(out, "{text}")?;
        }
        Command::Stats { files } => {
            let mut failed = 0;
            for file in &files {
                match Catalog::load_file(file) {
                    Ok(catalog) => {
                        let stats = catalog.stats();
                        writeln!(
                            out,
                            "{}\t{}\tcontexts={} finished={} unfinished={} vanished={} untranslated={}",
                            file.display(),
                            catalog.locale(),
                            stats.contexts,
                            stats.finished,
                            stats.unfinished,
                            stats.vanished,
                            stats.untranslated,
                        )?;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to load catalog");
                        writeln!(io::stderr(), "error: {e}")?;
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                return Err(CliError::PartialFailure(failed, files.len()));
            }
        }
        Command::Dump { file, output } => {
            let catalog = Catalog::load_file(&file)?;
            match output {
                Some(path) => {
                    let mut sink = BufWriter::new(File::create(&path)?);
                    catalog.write_ts(&mut sink)?;
                    sink.flush()?;
                    tracing::info!(path = %path.display(), "Catalog written");
                }
                None => catalog.write_ts(&mut out)?,
            }
        }
        Command::Locales { dir, settings } => {
            let mut store = SettingsStore::new();
            store.load_settings(settings)?;
            let dir = dir.unwrap_or_else(|| store.translations_dir());

            let registry = CatalogRegistry::discover(&dir, store.get_settings())?;
            let selected = store.get_settings().language.as_deref().map(LocaleCode::new);
            for entry in registry.entries() {
                let marker =
                    if selected.as_ref().is_some_and(|locale| locale.matches(&entry.locale)) { "*" } else { " " };
                writeln!(out, "{marker} {}\t{}", entry.locale, entry.path.display())?;
            }
        }
        Command::Language { locale, source, settings } => {
            let mut store = SettingsStore::new();
            store.load_settings(Some(settings))?;

            if locale.is_none() && !source {
                let current = store.get_settings().language.as_deref();
                writeln!(out, "{}", current.unwrap_or(&store.get_settings().source_language))?;
                return Ok(());
            }

            let change = store.set_language(locale)?;
            store.save()?;
            if change.restart_required {
                writeln!(out, "Language saved. Restart the application to apply it.")?;
            } else {
                writeln!(out, "Language saved.")?;
            }
        }
    }

    Ok(())
}
