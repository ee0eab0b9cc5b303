//! docmark CLI - document cleaning tool

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use docmark::{CleanOptions, CleanerRegistry, Error, ErrorKind, HtmlBackend};

#[derive(Parser)]
#[command(name = "docmark")]
#[command(version)]
#[command(about = "Clean PDF, HTML and Markdown documents into normalized Markdown", long_about = None)]
struct Cli {
    /// Input document (.pdf, .html, .htm, .md, .markdown)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Directory receiving <stem>.txt
    #[arg(short, long, value_name = "DIR", default_value = "data/clean", env = "DOCMARK_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// JSON options file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTML parser backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Print the cleaned text instead of writing a file
    #[arg(long)]
    stdout: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    /// html5ever tree (default)
    Full,
    /// Built-in lightweight parser
    Minimal,
}

impl From<BackendArg> for HtmlBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Full => HtmlBackend::Full,
            BackendArg::Minimal => HtmlBackend::Minimal,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> docmark::Result<()> {
    log::info!("Processing file {}", cli.input.display());
    if !cli.input.exists() {
        return Err(Error::NotFound(cli.input.clone()));
    }

    let options = load_options(cli.config.as_deref(), cli.backend)?;
    let content = CleanerRegistry::with_options(&options).clean(&cli.input)?;

    if cli.stdout {
        println!("{content}");
        return Ok(());
    }

    let output_path = write_output(&cli.output_dir, &cli.input, &content)?;
    log::info!("Output written to {}", output_path.display());
    println!("{} {}", "Saved".green().bold(), output_path.display());
    Ok(())
}

fn load_options(config: Option<&Path>, backend: Option<BackendArg>) -> docmark::Result<CleanOptions> {
    let mut options = match config {
        Some(path) => CleanOptions::from_json_file(path)?,
        None => CleanOptions::default(),
    };
    if let Some(backend) = backend {
        options.html.backend = backend.into();
    }
    Ok(options)
}

/// Write `<dir>/<stem>.txt`, creating the directory as needed.
fn write_output(dir: &Path, input: &Path, content: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let output_path = dir.join(format!("{stem}.txt"));
    fs::write(&output_path, content)?;
    Ok(output_path)
}

fn exit_code(err: &Error) -> u8 {
    match err.kind() {
        ErrorKind::NotFound => 1,
        ErrorKind::Unsupported => 2,
        _ => 3,
    }
}
