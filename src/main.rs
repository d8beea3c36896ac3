use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
    process,
    sync::Arc,
};

use quire::{
    application::{
        error::AppError,
        render::{
            DocumentRenderService, RenderOptions, RenderOutput, RenderRequest, RenderService,
            default_registry,
        },
    },
    config::{self, ClassifyVideoArgs, Command, OutputFormat, RenderArgs, Settings},
    domain::{
        document::Document,
        links::CollectionLinkResolver,
        media::{MediaResolver, NoMedia},
        video::classify_video_source,
    },
    infra::{error::InfraError, media_library::MediaLibrary, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

const STDIN_PATH: &str = "-";

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(source = report.source, error = %report.summary(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(source = report.source, error = %report.summary(), "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Render(args) => run_render(&settings, &args),
        Command::ClassifyVideo(args) => run_classify_video(&args),
    }
}

fn run_render(settings: &Settings, args: &RenderArgs) -> Result<(), AppError> {
    let document = Document::from_json(&read_input(&args.file)?)?;

    let media: Arc<dyn MediaResolver> = match args.media.as_deref() {
        Some(path) => Arc::new(MediaLibrary::from_path(path)?),
        None => Arc::new(NoMedia),
    };
    let links = Arc::new(CollectionLinkResolver::new(settings.links.routes.clone()));
    let service = DocumentRenderService::new(default_registry(), media, links);

    let options = RenderOptions {
        unique_heading_ids: settings.render.unique_heading_ids,
        sanitize_html: settings.render.sanitize_html,
        ..RenderOptions::default()
    };
    let output = service.render(&RenderRequest::new(document).with_options(options))?;

    info!(
        target = "quire::cli",
        file = %args.file.display(),
        degraded = output.metrics.degraded_nodes,
        "render complete"
    );

    write_stdout(&format_output(&output, args.format)?)
}

fn run_classify_video(args: &ClassifyVideoArgs) -> Result<(), AppError> {
    let source = classify_video_source(&args.url);
    let line = match source.embed_url() {
        Some(embed) => format!("{}\t{embed}\n", source.label()),
        None => format!("{}\n", source.label()),
    };
    write_stdout(&line)
}

fn format_output(output: &RenderOutput, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Html => Ok(format!("{}\n", output.html)),
        OutputFormat::Json => serde_json::to_string_pretty(output)
            .map(|json| format!("{json}\n"))
            .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}"))),
        OutputFormat::Outline => Ok(output
            .outline
            .iter()
            .map(|heading| {
                let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
                match heading.anchor.as_deref() {
                    Some(anchor) => format!("{indent}{} (#{anchor})\n", heading.text),
                    None => format!("{indent}{}\n", heading.text),
                }
            })
            .collect()),
    }
}

fn read_input(path: &Path) -> Result<String, InfraError> {
    if path == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    fs::read_to_string(path).map_err(|err| InfraError::read_file(path, err))
}

fn write_stdout(text: &str) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| AppError::from(InfraError::from(err)))
}
