//! genchm CLI - Build HTML Help projects from a directory of HTML pages.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use genchm::errors::{exit_code, GenchmError};
use genchm::manifest::collect_contents;
use genchm::output::{format_summary, format_toc, OutputFormat, RunSummary};
use genchm::project::{Project, ProjectBuilder};
use genchm::walker::WalkOptions;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "genchm")]
#[command(about = "Build HTML Help (.chm) projects from a directory of HTML pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a source tree.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Source HTML directory
    #[arg(short, long, value_name = "DIRECTORY")]
    source: Option<PathBuf>,

    /// Title of the help archive (default: source directory name)
    #[arg(short, long)]
    title: Option<String>,

    /// Default topic, relative to the archive (default: first index page found)
    #[arg(short, long, value_name = "INDEX")]
    index: Option<String>,

    /// Compiled archive name (default: <source directory name>.chm)
    #[arg(short, long, value_name = "CHM")]
    output: Option<String>,

    /// Language id written to the project file
    #[arg(long)]
    language: Option<String>,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Respect .gitignore patterns
    #[arg(long)]
    respect_gitignore: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl SourceArgs {
    fn project_builder(&self) -> ProjectBuilder {
        let mut builder = ProjectBuilder::new().walk_options(WalkOptions {
            include_hidden: !self.skip_hidden,
            respect_gitignore: self.respect_gitignore,
        });
        if let Some(source) = &self.source {
            builder = builder.source(source);
        }
        if let Some(title) = &self.title {
            builder = builder.title(title);
        }
        if let Some(index) = &self.index {
            builder = builder.default_topic(index);
        }
        if let Some(output) = &self.output {
            builder = builder.compiled_file(output);
        }
        if let Some(language) = &self.language {
            builder = builder.language(language);
        }
        builder
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::from_json_flag(self.json)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the manifests and run the help compiler
    Build {
        #[command(flatten)]
        args: SourceArgs,

        /// Help compiler executable
        #[arg(long, default_value = genchm::project::DEFAULT_COMPILER)]
        compiler: String,
    },

    /// Write the project, contents and index files without compiling
    Generate {
        #[command(flatten)]
        args: SourceArgs,
    },

    /// Print the table of contents that would be generated
    Toc {
        #[command(flatten)]
        args: SourceArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Build { .. } => "build",
            Commands::Generate { .. } => "generate",
            Commands::Toc { .. } => "toc",
            Commands::Completions { .. } => "completions",
        }
    }

    fn source_args(&self) -> Option<&SourceArgs> {
        match self {
            Commands::Build { args, .. } | Commands::Generate { args } | Commands::Toc { args } => {
                Some(args)
            }
            Commands::Completions { .. } => None,
        }
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let command_name = cli.command.name();
    let json_output = cli.command.source_args().is_some_and(|a| a.json);
    init_logging(cli.command.source_args().is_some_and(|a| a.quiet));

    let result = match cli.command {
        Commands::Build { args, compiler } => run_build(&args, compiler),
        Commands::Generate { args } => run_generate(&args),
        Commands::Toc { args } => run_toc(&args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "genchm", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
            if e.is_config() {
                print_usage(command_name);
            }
        }
        std::process::exit(exit_code(&e));
    }
}

fn print_usage(command_name: &str) {
    let mut cmd = Cli::command();
    cmd.build();
    if let Some(sub) = cmd.find_subcommand_mut(command_name) {
        eprintln!();
        eprintln!("{}", sub.render_help());
    }
}

fn build_project(args: &SourceArgs) -> Result<Project, GenchmError> {
    args.project_builder().build()
}

// --- Build command ---

fn run_build(args: &SourceArgs, compiler: String) -> Result<(), GenchmError> {
    let project = args.project_builder().compiler(compiler).build()?;
    let report = project.build()?;

    let summary = RunSummary::new(&project, &report.manifests).with_compile(&report.compile);
    print!("{}", format_summary(&summary, args.format())?);
    Ok(())
}

// --- Generate command ---

fn run_generate(args: &SourceArgs) -> Result<(), GenchmError> {
    let project = build_project(args)?;
    let manifests = project.generate()?;

    let summary = RunSummary::new(&project, &manifests);
    print!("{}", format_summary(&summary, args.format())?);
    Ok(())
}

// --- Toc command ---

fn run_toc(args: &SourceArgs) -> Result<(), GenchmError> {
    let project = build_project(args)?;
    let toc = collect_contents(&project)?;
    print!("{}", format_toc(&toc, args.format())?);
    Ok(())
}
