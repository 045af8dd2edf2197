use bulkimg::format::FormatPolicy;
use bulkimg::keyword::{self, NamingScheme};
use bulkimg::quality::QualityTier;
use bulkimg::run::{self, JitterPacer, RunOptions};
use bulkimg::transport::UreqTransport;
use bulkimg::{output, search};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "bulkimg")]
#[command(version)]
#[command(about = "Download one validated image per keyword from Bing image search")]
#[command(long_about = "\
Download one validated image per keyword from Bing image search

For each keyword the tool scrapes the Bing Images result page, then tries
candidate URLs in rank order until one downloads, decodes, and passes the
format and quality checks. The first hit is saved and the run moves on to
the next keyword; keywords with no acceptable candidate are listed in the
final report.

Any of --format, --quality, --naming, or --keywords not given on the
command line is asked for interactively.")]
struct Cli {
    /// Acceptable image format
    #[arg(long, value_enum)]
    format: Option<FormatPolicy>,

    /// Minimum image resolution
    #[arg(long, value_enum)]
    quality: Option<QualityTier>,

    /// Filename scheme for saved images
    #[arg(long, value_enum)]
    naming: Option<NamingScheme>,

    /// Comma-separated keyword list
    #[arg(long)]
    keywords: Option<String>,

    /// Destination directory [default: <home>/Desktop/DownloadedImages]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Candidate URLs collected per keyword
    #[arg(long, default_value_t = search::DEFAULT_LIMIT)]
    limit: usize,
}

#[derive(Error, Debug)]
enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected a number, got {0:?}")]
    NotANumber(String),
}

/// Interactive stdin prompts for settings missing from the command line.
///
/// Out-of-range numeric choices re-prompt in a loop; non-numeric input is
/// fatal to the run. Remembers whether it was used so `main` only holds the
/// terminal open after an interactive session.
struct Prompter {
    used: bool,
}

impl Prompter {
    fn new() -> Self {
        Self { used: false }
    }

    fn was_used(&self) -> bool {
        self.used
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.used = true;
        print!("{prompt}");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn choice(&mut self, prompt: &str, retry: &str, valid: &[u32]) -> Result<u32, PromptError> {
        let mut input = self.read_line(prompt)?;
        loop {
            let n = input
                .parse::<u32>()
                .map_err(|_| PromptError::NotANumber(input.clone()))?;
            if valid.contains(&n) {
                return Ok(n);
            }
            input = self.read_line(retry)?;
        }
    }

    fn format(&mut self) -> Result<FormatPolicy, PromptError> {
        let n = self.choice(
            "Desired format (0 = any, 1 = jpg, 2 = png with transparency, 3 = any except png): ",
            "Invalid format. Enter 0 (any), 1 (jpg), 2 (png with transparency), or 3 (any except png): ",
            &[0, 1, 2, 3],
        )?;
        Ok(format_from_choice(n))
    }

    fn quality(&mut self) -> Result<QualityTier, PromptError> {
        let n = self.choice(
            "Minimum image quality (0 = any, 1 = medium, 2 = high): ",
            "Invalid quality. Enter 0 (any), 1 (medium) or 2 (high): ",
            &[0, 1, 2],
        )?;
        Ok(quality_from_choice(n))
    }

    fn naming(&mut self) -> Result<NamingScheme, PromptError> {
        let n = self.choice(
            "Naming format (1 = keyword_number, 2 = sequential number): ",
            "Invalid choice. Enter 1 (keyword_number) or 2 (sequential number): ",
            &[1, 2],
        )?;
        Ok(naming_from_choice(n))
    }

    fn keywords(&mut self) -> Result<String, PromptError> {
        self.read_line("Enter a list of words separated by commas: ")
    }
}

fn format_from_choice(n: u32) -> FormatPolicy {
    match n {
        1 => FormatPolicy::JpegOnly,
        2 => FormatPolicy::TransparentPngOnly,
        3 => FormatPolicy::AnyExceptPng,
        _ => FormatPolicy::Any,
    }
}

fn quality_from_choice(n: u32) -> QualityTier {
    match n {
        1 => QualityTier::Medium,
        2 => QualityTier::High,
        _ => QualityTier::Any,
    }
}

fn naming_from_choice(n: u32) -> NamingScheme {
    match n {
        2 => NamingScheme::Sequential,
        _ => NamingScheme::Keyword,
    }
}

fn default_dest_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Desktop").join("DownloadedImages"))
        .unwrap_or_else(|| PathBuf::from("DownloadedImages"))
}

fn main() {
    let cli = Cli::parse();
    let mut prompter = Prompter::new();

    if let Err(e) = run_cli(cli, &mut prompter) {
        println!("An error occurred: {e}");
    }

    // Interactive sessions are often launched from a file manager; keep the
    // window open until the user has read the report.
    if prompter.was_used() {
        print!("Press Enter to close the program...");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).ok();
    }
}

fn run_cli(cli: Cli, prompter: &mut Prompter) -> Result<(), Box<dyn std::error::Error>> {
    let format = match cli.format {
        Some(f) => f,
        None => prompter.format()?,
    };
    let quality = match cli.quality {
        Some(q) => q,
        None => prompter.quality()?,
    };
    let naming = match cli.naming {
        Some(n) => n,
        None => prompter.naming()?,
    };
    let raw_keywords = match cli.keywords {
        Some(k) => k,
        None => prompter.keywords()?,
    };

    let keywords = keyword::parse_keyword_list(&raw_keywords);
    if keywords.is_empty() {
        println!("No usable keywords given.");
        return Ok(());
    }

    let options = RunOptions {
        format,
        quality,
        naming,
        dest_dir: cli.output.unwrap_or_else(default_dest_dir),
        candidate_limit: cli.limit,
    };

    let transport = UreqTransport::new();
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_run_event(&event);
        }
    });
    let report = run::run(&transport, &JitterPacer, &keywords, &options, Some(tx))?;
    printer.join().unwrap();

    output::print_report(&report);
    Ok(())
}
