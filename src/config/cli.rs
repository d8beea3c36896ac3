use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the quire binary.
#[derive(Debug, Parser)]
#[command(
    name = "quire",
    version,
    about = "Render structured rich-text documents to HTML"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "QUIRE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render a serialized editor document.
    Render(RenderArgs),
    /// Classify a video URL the way the video block does.
    #[command(name = "classify-video")]
    ClassifyVideo(ClassifyVideoArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Document to render; `-` reads standard input.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Media library used to resolve uploads stored by id.
    #[arg(long = "media", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub media: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyVideoArgs {
    #[arg(value_name = "URL")]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Serialized HTML.
    Html,
    /// Full render output as JSON.
    Json,
    /// Heading outline, one line per heading.
    Outline,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Suffix repeated heading anchors with -2, -3, ...
    #[arg(long = "unique-heading-ids", action = clap::ArgAction::SetTrue)]
    pub unique_heading_ids: bool,

    /// Emit HTML without passing it through the sanitizer.
    #[arg(long = "no-sanitize", action = clap::ArgAction::SetTrue)]
    pub no_sanitize: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
