mod echo;
mod prompt;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use seogeo_core::competitor::{DEFAULT_LOCATION, DEFAULT_PAGE_LIMIT};
use seogeo_core::credentials::decode_base64_pair;
use seogeo_core::linking::{DEFAULT_MAX_SUGGESTIONS, DEFAULT_MIN_RELEVANCE};
use seogeo_core::{
    AnalysisProgress, ApiConfig, AppPaths, CompetitorAnalyzer, CredentialResolver, DataForSeoClient,
    InternalLinkingAnalyzer, KeywordCache, KeywordResearcher, MetricsFetcher, OutputMode, ResolvedCredential,
    SecretPrompt, SeoGeoError, format_analysis, format_keywords, format_suggestions, format_validation,
    load_site_content, mask_key, read_credential_config, read_draft, validate_post, write_credential_config,
};
use tracing_subscriber::EnvFilter;

use crate::prompt::TerminalPrompt;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Keyword research, competitor analysis and structure checks for SEO/GEO blog writing
#[derive(Parser, Debug)]
#[command(name = "seogeo")]
#[command(version)]
#[command(about = "SEO/GEO research and checks for blog posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Keyword cache directory (default: ~/.dataforseo-skill/cache)
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Credential config file (default: ~/.dataforseo-skill/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Skip the keyword cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Research and score keywords for a topic
    Keywords(KeywordsArgs),
    /// Analyze the pages ranking for a keyword
    Competitors(CompetitorsArgs),
    /// Suggest internal links from a draft to existing posts
    Links(LinksArgs),
    /// Check a draft against the SEO/GEO structure checklist
    Validate(ValidateArgs),
    /// Store DataForSEO credentials in the config file
    Setup(SetupArgs),
    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Ways to supply the DataForSEO credential besides the env var and config file
#[derive(Args, Debug)]
struct CredentialArgs {
    /// DataForSEO API key ('login:password' or Base64-encoded)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Prompt for the API key when no other source has one
    #[arg(long)]
    interactive: bool,
}

#[derive(Args, Debug)]
struct KeywordsArgs {
    /// Topic or seed keyword to research
    topic: String,

    /// Maximum number of keyword suggestions
    #[arg(short, long, default_value = "5", value_name = "NUM")]
    limit: usize,

    #[command(flatten)]
    credential: CredentialArgs,

    /// Output format (json, markdown, simple)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputMode,
}

#[derive(Args, Debug)]
struct CompetitorsArgs {
    /// Target keyword
    keyword: String,

    /// Search location
    #[arg(long, default_value = DEFAULT_LOCATION, value_name = "NAME")]
    location: String,

    /// Number of ranking pages to analyze
    #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT, value_name = "NUM")]
    limit: usize,

    #[command(flatten)]
    credential: CredentialArgs,

    /// Output format (json, markdown)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT", value_parser = parse_report_format)]
    format: OutputMode,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LinksArgs {
    /// Draft blog post (markdown file)
    draft: PathBuf,

    /// Existing site content (markdown files or directories)
    #[arg(long, num_args = 1.., value_name = "PATH")]
    site_content: Vec<PathBuf>,

    /// Base URL for site pages (e.g. https://example.com/blog)
    #[arg(long, default_value = "", value_name = "URL")]
    base_url: String,

    /// Maximum number of suggestions
    #[arg(long, default_value_t = DEFAULT_MAX_SUGGESTIONS, value_name = "NUM")]
    max_suggestions: usize,

    /// Minimum relevance score 0-100
    #[arg(long, default_value_t = DEFAULT_MIN_RELEVANCE, value_name = "SCORE")]
    min_relevance: f64,

    /// Output format (json, markdown)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT", value_parser = parse_report_format)]
    format: OutputMode,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Markdown file to check
    file: PathBuf,

    /// Output format (json, or markdown/simple for the text report)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputMode,
}

#[derive(Args, Debug)]
struct SetupArgs {
    /// API key to store; prompted for when omitted
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Overwrite without asking
    #[arg(long)]
    force: bool,
}

/// Output modes for reports that have no one-line rendering.
fn parse_report_format(s: &str) -> Result<OutputMode, String> {
    match s.parse::<OutputMode>() {
        Ok(OutputMode::Simple) | Err(_) => Err(format!("unsupported format '{}' (expected json or markdown)", s)),
        Ok(mode) => Ok(mode),
    }
}

impl Cli {
    fn paths(&self) -> AppPaths {
        let mut paths = AppPaths::default_location();
        if let Some(dir) = &self.cache_dir {
            paths = paths.with_cache_dir(dir);
        }
        if let Some(file) = &self.config_file {
            paths = paths.with_config_file(file);
        }
        paths
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        echo::print_banner();
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            echo::print_error(&format!("{:#}", e));
            if let Some(guidance) = e.downcast_ref::<SeoGeoError>().and_then(SeoGeoError::guidance) {
                echo::print_hint(guidance);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let paths = cli.paths();

    match cli.command {
        Command::Keywords(args) => run_keywords(args, &paths, cli.no_cache),
        Command::Competitors(args) => run_competitors(args, &paths),
        Command::Links(args) => run_links(args),
        Command::Validate(args) => run_validate(args),
        Command::Setup(args) => run_setup(args, &paths),
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "seogeo", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_credential(paths: &AppPaths, args: &CredentialArgs) -> Option<ResolvedCredential> {
    let resolver = CredentialResolver::from_env(&paths.config_file);
    tracing::debug!("credential config file: {}", resolver.config_file().display());
    let prompt = TerminalPrompt;
    let prompt = args.interactive.then_some(&prompt as &dyn SecretPrompt);
    resolver.resolve(args.api_key.as_deref(), prompt)
}

fn print_credential_options() {
    if let Some(guidance) = SeoGeoError::MissingCredential.guidance() {
        echo::print_hint(guidance);
    }
}

fn emit(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn run_keywords(args: KeywordsArgs, paths: &AppPaths, no_cache: bool) -> anyhow::Result<ExitCode> {
    let fetcher = match resolve_credential(paths, &args.credential) {
        Some(resolved) => match DataForSeoClient::new(&resolved.credential, &ApiConfig::default()) {
            Ok(client) => {
                echo::print_info(&format!("Using DataForSEO API (key from {})", resolved.source));
                MetricsFetcher::new(Box::new(client))
            }
            Err(e) => {
                echo::print_warning(&format!("{}. Using heuristic fallback.", e));
                if let Some(guidance) = e.guidance() {
                    echo::print_hint(guidance);
                }
                MetricsFetcher::offline()
            }
        },
        None => {
            echo::print_warning("API key not found. Using heuristic fallback.");
            print_credential_options();
            MetricsFetcher::offline()
        }
    };

    let mut researcher = KeywordResearcher::new(fetcher);
    if !no_cache {
        let cache = KeywordCache::new(&paths.cache_dir);
        tracing::debug!("keyword cache directory: {}", cache.dir().display());
        researcher = researcher.with_cache(cache);
    }

    let research = researcher.research(&args.topic, args.limit);
    if research.records.is_empty() {
        echo::print_error("No keywords found");
        return Ok(ExitCode::FAILURE);
    }
    echo::print_research_source(&research.source, research.records.len());

    let output = format_keywords(&research.records, args.format)?;
    println!("{}", output);
    Ok(ExitCode::SUCCESS)
}

fn run_competitors(args: CompetitorsArgs, paths: &AppPaths) -> anyhow::Result<ExitCode> {
    let Some(resolved) = resolve_credential(paths, &args.credential) else {
        echo::print_error("DataForSEO API key required for competitor analysis");
        print_credential_options();
        return Ok(ExitCode::FAILURE);
    };

    let client = DataForSeoClient::new(&resolved.credential, &ApiConfig::default())?;
    let analysis = CompetitorAnalyzer::new(&client).analyze(
        &args.keyword,
        &args.location,
        args.limit,
        &mut |event| match event {
            AnalysisProgress::Searching { keyword, limit } => {
                echo::print_step(1, 3, &format!("Fetching top {} results for '{}'", limit, keyword))
            }
            AnalysisProgress::Page { index, total, url } => {
                if index == 1 {
                    echo::print_step(2, 3, &format!("Analyzing {} pages", total));
                }
                echo::print_detail(&format!("{}/{}", index, total), url);
            }
            AnalysisProgress::PageSkipped { url, error } => echo::print_warning(&format!("Skipped {}: {}", url, error)),
            AnalysisProgress::Aggregating { .. } => echo::print_step(3, 3, "Aggregating benchmarks"),
        },
    )?;
    echo::print_success(&format!("Analysis complete: {} pages analyzed", analysis.analyzed_pages.len()));

    let output = format_analysis(&analysis, args.format)?;
    emit(&output, args.output.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

fn run_links(args: LinksArgs) -> anyhow::Result<ExitCode> {
    let draft = read_draft(&args.draft).context("Failed to read draft")?;

    if args.site_content.is_empty() {
        echo::print_warning("No --site-content provided. No suggestions will be generated.");
        echo::print_hint("Example: --site-content blog/");
        return Ok(ExitCode::FAILURE);
    }

    let pages = load_site_content(&args.site_content, &args.base_url);
    if pages.is_empty() {
        echo::print_error("No site content loaded. Check paths.");
        return Ok(ExitCode::FAILURE);
    }
    echo::print_success(&format!("Loaded {} site pages", pages.len()));

    let analyzer = InternalLinkingAnalyzer::new(args.min_relevance);
    let suggestions = analyzer.suggest_links(&draft, &pages, args.max_suggestions);

    let output = format_suggestions(&suggestions, args.format)?;
    emit(&output, args.output.as_deref())?;

    if suggestions.is_empty() {
        echo::print_info(&format!("No suggestions met the relevance threshold ({}).", args.min_relevance));
        echo::print_hint("Try lowering --min-relevance or adding more site content.");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let content = read_draft(&args.file).context("Failed to read post")?;
    let report = validate_post(&content);

    println!("{}", format_validation(&report, args.format)?);
    echo::print_verdict(&report);

    Ok(if report.is_passing() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn run_setup(args: SetupArgs, paths: &AppPaths) -> anyhow::Result<ExitCode> {
    let config_file = &paths.config_file;
    echo::print_info("DataForSEO API credential setup");
    echo::print_detail("Config file", &config_file.display().to_string());

    if config_file.exists() {
        echo::print_warning("Config file already exists");
        if let Ok(config) = read_credential_config(config_file)
            && let Some(current) = config.api_key
        {
            echo::print_detail("Current API key", &mask_key(&current));
        }
        if !args.force && !prompt::confirm("Overwrite?") {
            echo::print_info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let api_key = args.api_key.or_else(prompt::read_api_key).map(|k| k.trim().to_string());
    let Some(api_key) = api_key.filter(|k| !k.is_empty()) else {
        echo::print_info("No API key provided. Cancelled.");
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(decoded) = decode_base64_pair(&api_key) {
        echo::print_success("Detected Base64-encoded credentials");
        echo::print_detail("Decoded format", &mask_key(&decoded));
    } else if !api_key.contains(':') {
        echo::print_warning("API key should be in format 'login:password' or Base64-encoded");
        if !args.force && !prompt::confirm("Continue anyway?") {
            echo::print_info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    write_credential_config(config_file, &api_key, "seogeo setup")
        .with_context(|| format!("Failed to write config file: {}", config_file.display()))?;

    echo::print_success("Config file created");
    echo::print_detail("Location", &config_file.display().to_string());
    echo::print_hint("Keyword research now finds the key without --api-key:\n  seogeo keywords \"your topic\" --limit 5");
    Ok(ExitCode::SUCCESS)
}
