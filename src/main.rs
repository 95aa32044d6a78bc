//! Entry point for the `i18n-coverage` command.

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use i18n_runtime::DiagnosticsMode;
use i18n_runtime::config::{
    ConfigError,
    ConfigManager,
    SourceLocation,
};
use i18n_runtime::coverage::{
    CoverageAnalyzer,
    log_missing_keys,
    print_coverage_report,
};
use i18n_runtime::input::source::DEFAULT_PATH_TEMPLATE;
use i18n_runtime::input::{
    DirectorySource,
    HttpSource,
    TranslationSource,
};
use i18n_runtime::loader::{
    LoaderOptions,
    TranslationLoader,
};
use i18n_runtime::locale::Locale;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Reports how completely each supported locale is translated.
#[derive(Debug, Parser)]
#[command(name = "i18n-coverage", version)]
struct Cli {
    /// Workspace root containing `.i18n.json`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// List the missing keys under each locale
    #[arg(long)]
    details: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Only print the missing keys of one locale (`--locale`, else `defaultLocale`)
    #[arg(long)]
    missing: bool,

    /// Locale for `--missing`; implies `--missing`
    #[arg(long)]
    locale: Option<Locale>,

    /// Fetch translations from this origin instead of the configured source
    #[arg(long, conflicts_with = "locales_dir")]
    base_url: Option<String>,

    /// Path appended to `--base-url`; `{locale}` is replaced by the locale code
    #[arg(long, requires = "base_url", default_value = DEFAULT_PATH_TEMPLATE)]
    path_template: String,

    /// Read `{code}.json` files from this directory instead of the configured source
    #[arg(long)]
    locales_dir: Option<PathBuf>,

    /// Exit with status 1 when a locale's coverage is below this percentage
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=100))]
    min_coverage: u32,
}

/// Failures that end the command
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Loads settings and dispatches on the configured transport
async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(cli.root.clone()))?;
    if let Some(location) = cli.source_override() {
        config_manager.override_source(location)?;
    }
    let settings = config_manager.get_settings();
    let options = LoaderOptions { fetch_timeout: settings.fetch_timeout() };
    let target = Target {
        missing: cli.locale.or_else(|| cli.missing.then(|| settings.default_locale())),
        mode: settings.mode,
    };

    match config_manager.source_location() {
        SourceLocation::Http { base_url, path_template } => {
            tracing::info!(%base_url, "Fetching translations over HTTP");
            let source = HttpSource::new(base_url).with_path_template(path_template);
            analyze(TranslationLoader::with_options(source, options), cli, target).await
        }
        SourceLocation::Directory(dir) => {
            tracing::info!(dir = %dir.display(), "Reading translations from directory");
            let source = DirectorySource::new(dir);
            analyze(TranslationLoader::with_options(source, options), cli, target).await
        }
    }
}

impl Cli {
    /// Source given on the command line, overriding `.i18n.json`
    fn source_override(&self) -> Option<SourceLocation> {
        if let Some(base_url) = &self.base_url {
            return Some(SourceLocation::Http {
                base_url: base_url.clone(),
                path_template: self.path_template.clone(),
            });
        }
        self.locales_dir.clone().map(SourceLocation::Directory)
    }
}

/// What to analyze, resolved from the arguments and settings
#[derive(Debug, Clone, Copy)]
struct Target {
    /// Locale whose missing keys are listed instead of the full report
    missing: Option<Locale>,
    /// Whether each missing key is also logged
    mode: DiagnosticsMode,
}

/// Runs the analysis and writes the result to stdout
async fn analyze<S: TranslationSource>(
    loader: TranslationLoader<S>,
    cli: &Cli,
    target: Target,
) -> Result<ExitCode, CliError> {
    let analyzer = CoverageAnalyzer::new(&loader);

    if let Some(locale) = target.missing {
        let missing = analyzer.get_missing_translations(locale).await;
        let mut out = io::stdout().lock();
        if cli.json {
            serde_json::to_writer_pretty(&mut out, &missing)?;
            writeln!(out)?;
        } else {
            for key in &missing {
                writeln!(out, "{key}")?;
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = analyzer.generate_coverage_report().await;
    let logged = log_missing_keys(&report, target.mode);
    tracing::debug!(logged, mode = ?target.mode, "Missing keys logged");
    let mut out = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        print_coverage_report(&report, cli.details, &mut out)?;
    }
    out.flush()?;

    let below = report.below(cli.min_coverage);
    if below.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    for record in below {
        tracing::warn!(
            locale = %record.locale,
            coverage = record.coverage_percent,
            minimum = cli.min_coverage,
            "Coverage below minimum"
        );
    }
    Ok(ExitCode::FAILURE)
}
