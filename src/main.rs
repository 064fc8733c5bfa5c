use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use fresco_core::{FrescoConfig, PrReference};
use fresco_pipeline::github::GitHubClient;
use fresco_pipeline::openai::OpenAiClient;
use fresco_pipeline::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "fresco",
    version,
    about = "AI-painted pull request portraits",
    long_about = "Fresco turns a pull request's chatter into art: it aggregates the PR's\n\
                   comments and commit messages, asks a language model for a themed image\n\
                   description, renders it with an image model, and posts the result back\n\
                   onto the PR as a comment.\n\n\
                   Examples:\n  \
                     fresco run --pr owner/repo#123          Paint a portrait of a PR\n  \
                     fresco run --theme 'space opera'        Override the fantasy theme\n  \
                     fresco init                             Create a .fresco.toml config file\n  \
                     fresco doctor                           Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .fresco.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an image from a PR's content and post it as a comment
    #[command(long_about = "Generate an image from a PR's content and post it as a comment.\n\n\
        Aggregates the PR's discussion comments and commit messages, synthesizes a\n\
        themed image prompt with a completion model, generates the image, and posts\n\
        it back onto the PR. Runs once; repeated runs post additional comments.\n\n\
        Examples:\n  fresco run --pr owner/repo#123\n  fresco run --theme 'haunted library' --style 'oil painting'\n  \
        GITHUB_REPOSITORY=owner/repo PULL_REQUEST_NUMBER=123 fresco run")]
    Run {
        /// Pull request to paint (format: owner/repo#123)
        #[arg(
            long,
            long_help = "Pull request to paint.\n\nFormat: owner/repo#123\nFalls back to the GITHUB_REPOSITORY and PULL_REQUEST_NUMBER env vars."
        )]
        pr: Option<String>,
        /// Fantasy theme for the image (default: "wizard adventure")
        #[arg(long)]
        theme: Option<String>,
        /// Visual style for the image (default: "artistic")
        #[arg(long)]
        style: Option<String>,
        /// GitHub token (default: GITHUB_TOKEN env var)
        #[arg(long)]
        github_token: Option<String>,
        /// OpenAI API key (default: OPENAI_API_KEY env var)
        #[arg(long)]
        openai_api_key: Option<String>,
    },
    /// Create a default .fresco.toml configuration file
    #[command(long_about = "Create a default .fresco.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .fresco.toml already exists.")]
    Init,
    /// Check your Fresco setup and environment
    #[command(long_about = "Check your Fresco setup and environment.\n\n\
        Runs diagnostics for the config file, GitHub token, OpenAI API key,\n\
        and PR coordinates from the environment.")]
    Doctor,
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("fresco v{version} — AI-painted pull request portraits\n");

    println!("Quick start:");
    println!("  fresco init                     Create a .fresco.toml config file");
    println!("  fresco run --pr owner/repo#123  Paint a portrait of a PR\n");

    println!("All commands:");
    println!("  run     Aggregate PR content, generate an image, post it as a comment");
    println!("  doctor  Check your setup and environment");
    println!("  init    Create default configuration\n");

    println!("Run 'fresco <command> --help' for details.");
}

struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }
}

fn run_doctor(config: &FrescoConfig) {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    if std::path::Path::new(".fresco.toml").exists() {
        checks.push(CheckResult::pass("config_file", ".fresco.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".fresco.toml not found",
            "run 'fresco init' to create a default config",
        ));
    }

    // 2. GitHub token
    if std::env::var("GITHUB_TOKEN").is_ok() {
        checks.push(CheckResult::pass("github_token", "GITHUB_TOKEN set"));
    } else {
        checks.push(CheckResult::fail(
            "github_token",
            "GITHUB_TOKEN not set",
            "export GITHUB_TOKEN=... (needed to read and comment on the PR)",
        ));
    }

    // 3. OpenAI API key
    if config.openai.api_key.is_some() || std::env::var("OPENAI_API_KEY").is_ok() {
        checks.push(CheckResult::pass("openai_api_key", "OPENAI_API_KEY set"));
    } else {
        checks.push(CheckResult::fail(
            "openai_api_key",
            "OPENAI_API_KEY not set",
            "export OPENAI_API_KEY=... or set api_key in .fresco.toml [openai]",
        ));
    }

    // 4. PR coordinates from the environment
    let repository = std::env::var("GITHUB_REPOSITORY").ok();
    let number = std::env::var("PULL_REQUEST_NUMBER").ok();
    match (repository, number) {
        (Some(repository), Some(number)) => {
            match PrReference::from_env_parts(&repository, &number) {
                Ok(pr) => checks.push(CheckResult::pass("pr_coordinates", format!("{pr}"))),
                Err(e) => checks.push(CheckResult::fail(
                    "pr_coordinates",
                    e.to_string(),
                    "fix GITHUB_REPOSITORY (owner/repo) and PULL_REQUEST_NUMBER",
                )),
            }
        }
        _ => checks.push(CheckResult::info(
            "pr_coordinates",
            "GITHUB_REPOSITORY / PULL_REQUEST_NUMBER not set (pass --pr instead)",
        )),
    }

    // 5. Generation settings
    checks.push(CheckResult::info(
        "generation",
        format!(
            "theme '{}', style '{}', models {} / {}",
            config.generation.theme,
            config.generation.style,
            config.openai.completion_model,
            config.openai.image_model,
        ),
    ));

    let version = env!("CARGO_PKG_VERSION");
    println!("Fresco v{version} — Environment Check\n");

    for check in &checks {
        let label = check.name.replace('_', " ");
        println!("  {} {label:<18} {}", check.symbol(), check.detail);
        if let Some(hint) = &check.hint {
            println!("    hint: {hint}");
        }
    }

    let passed = checks.iter().filter(|c| c.status == "pass").count();
    let failed = checks.iter().filter(|c| c.status == "fail").count();
    let info = checks.iter().filter(|c| c.status == "info").count();
    println!("\n{passed} checks passed, {failed} failed, {info} info");
}

const DEFAULT_CONFIG: &str = r#"# Fresco Configuration

[generation]
# Fantasy theme embedded in the image prompt
# theme = "wizard adventure"
# Visual style embedded in the image prompt
# style = "artistic"
# Character cap applied to the synthesis instruction
# max_instruction_chars = 1000

[openai]
# api_key = "sk-..."            # or set OPENAI_API_KEY
# base_url = "https://api.openai.com"
# completion_model = "gpt-3.5-turbo-instruct"
# image_model = "dall-e-3"
# max_tokens = 200
# temperature = 0.7
"#;

fn resolve_pr(pr_flag: Option<&str>) -> Result<PrReference> {
    if let Some(pr_ref) = pr_flag {
        return pr_ref
            .parse()
            .map_err(|e| miette::miette!(help = "Use --pr owner/repo#123", "{e}"));
    }

    let repository = std::env::var("GITHUB_REPOSITORY").ok();
    let number = std::env::var("PULL_REQUEST_NUMBER").ok();
    match (repository, number) {
        (Some(repository), Some(number)) => PrReference::from_env_parts(&repository, &number)
            .map_err(|e| {
                miette::miette!(
                    help = "GITHUB_REPOSITORY must be owner/repo and PULL_REQUEST_NUMBER a positive integer",
                    "{e}"
                )
            }),
        _ => Err(miette::miette!(
            help = "Pass --pr owner/repo#123, or set GITHUB_REPOSITORY and PULL_REQUEST_NUMBER",
            "Pull request number is not provided"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FrescoConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".fresco.toml");
            if default_path.exists() {
                FrescoConfig::from_file(default_path)?
            } else {
                FrescoConfig::default()
            }
        }
    };

    match cli.command {
        None => {
            print_welcome();
        }
        Some(Command::Run {
            ref pr,
            ref theme,
            ref style,
            ref github_token,
            ref openai_api_key,
        }) => {
            let mut config = config.clone();

            // Layered resolution: CLI flags > env vars > config file > defaults.
            if let Ok(env_theme) = std::env::var("FANTASY_THEME") {
                if !env_theme.is_empty() {
                    config.generation.theme = env_theme;
                }
            }
            if let Ok(env_style) = std::env::var("IMAGE_STYLE") {
                if !env_style.is_empty() {
                    config.generation.style = env_style;
                }
            }
            if let Some(theme) = theme {
                config.generation.theme = theme.clone();
            }
            if let Some(style) = style {
                config.generation.style = style.clone();
            }
            if let Some(key) = openai_api_key {
                config.openai.api_key = Some(key.clone());
            } else if config.openai.api_key.is_none() {
                config.openai.api_key = std::env::var("OPENAI_API_KEY").ok();
            }

            if config.openai.api_key.is_none() {
                miette::bail!(miette::miette!(
                    help = "Set OPENAI_API_KEY, pass --openai-api-key, or add api_key in .fresco.toml under [openai]",
                    "No API key configured for OpenAI"
                ));
            }

            let pr = resolve_pr(pr.as_deref())?;

            if cli.verbose {
                eprintln!(
                    "Painting {pr}: theme '{}', style '{}', models {} / {}",
                    config.generation.theme,
                    config.generation.style,
                    config.openai.completion_model,
                    config.openai.image_model,
                );
            }

            let github = GitHubClient::new(github_token.as_deref())?;
            let openai = OpenAiClient::new(&config.openai)?;
            let pipeline = Pipeline::new(&github, &openai, &openai, &config);

            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap(),
                );
                pb.set_message(format!("Painting a portrait of {pr}..."));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let report = pipeline.run(&pr).await.map_err(|e| {
                if let Some(pb) = &spinner {
                    pb.finish_with_message("Failed");
                }
                miette::miette!("{} stage failed: {e}", e.stage())
            })?;

            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }

            if cli.verbose {
                eprintln!("Prompt: {}", report.prompt);
            }

            eprintln!("Comment posted successfully to {pr}");
            println!("Image: {}", report.image_url);
            if let Some(url) = &report.comment.html_url {
                println!("Comment: {url}");
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".fresco.toml");
            if path.exists() {
                miette::bail!(".fresco.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .fresco.toml with default configuration");
        }
        Some(Command::Doctor) => {
            run_doctor(&config);
        }
    }

    Ok(())
}
