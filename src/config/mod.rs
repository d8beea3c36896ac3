//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{collections::BTreeMap, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::links::CollectionRoutes;

pub use cli::{
    ClassifyVideoArgs, CliArgs, Command, LoggingOverrides, OutputFormat, RenderArgs,
    RenderOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quire";
const SLUG_PLACEHOLDER: &str = "{slug}";

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub render: RenderSettings,
    pub links: LinkSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub sanitize_html: bool,
    pub unique_heading_ids: bool,
}

#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Default routes with configured collections layered on top.
    pub routes: CollectionRoutes,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

impl LoadError {
    fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("QUIRE").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_logging_overrides(&cli.logging);
    if let Command::Render(args) = &cli.command {
        raw.apply_render_overrides(&args.overrides);
    }

    Settings::from_raw(raw)
}

pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    render: RawRenderSettings,
    links: RawLinkSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    sanitize_html: Option<bool>,
    unique_heading_ids: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLinkSettings {
    collections: BTreeMap<String, String>,
}

impl RawSettings {
    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if overrides.unique_heading_ids {
            self.render.unique_heading_ids = Some(true);
        }
        if overrides.no_sanitize {
            self.render.sanitize_html = Some(false);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            logging: build_logging_settings(raw.logging)?,
            render: build_render_settings(raw.render),
            links: build_link_settings(raw.links)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_render_settings(render: RawRenderSettings) -> RenderSettings {
    RenderSettings {
        sanitize_html: render.sanitize_html.unwrap_or(true),
        unique_heading_ids: render.unique_heading_ids.unwrap_or(false),
    }
}

fn build_link_settings(links: RawLinkSettings) -> Result<LinkSettings, LoadError> {
    let mut routes = CollectionRoutes::default();
    for (collection, template) in links.collections {
        let key = format!("links.collections.{collection}");
        let template = template.trim();
        if !template.starts_with('/') {
            return Err(LoadError::invalid(key, "route template must start with `/`"));
        }
        if !template.contains(SLUG_PLACEHOLDER) {
            return Err(LoadError::invalid(
                key,
                format!("route template must contain `{SLUG_PLACEHOLDER}`"),
            ));
        }
        routes = routes.with_route(collection, template);
    }

    Ok(LinkSettings { routes })
}
