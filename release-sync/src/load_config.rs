/// `load_config` module: turns the CI step's input map and environment into a [`ReleaseRequest`].
///
/// Inputs are collected from two places, later ones winning:
///   1. an optional YAML file holding a flat map of input name → scalar (`--inputs`)
///   2. GitHub Actions style `INPUT_<NAME>` environment variables
///
/// Empty values count as "not provided", matching how CI runners pass unset inputs.
/// `GITHUB_SHA` supplies the target commitish when the `commitish` input is absent.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary. Every check here
/// runs before any remote call is made.
use anyhow::{anyhow, bail, Context, Result};
use release_sync_core::config::{parse_bool_input, LookupStrategy, ReleaseRequest};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Input names understood by the step.
pub const INPUT_NAMES: &[&str] = &[
    "tag_name",
    "release_name",
    "body",
    "draft",
    "prerelease",
    "commitish",
    "asset_dir_path",
    "lookup",
];

pub type InputMap = BTreeMap<String, String>;

#[derive(Debug)]
pub struct CliConfig {
    pub request: ReleaseRequest,
    pub strategy: LookupStrategy,
}

/// Environment variable carrying input `name`, e.g. `tag_name` → `INPUT_TAG_NAME`.
pub fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Loads the input map from the optional YAML file, then overlays `INPUT_*` variables.
pub fn load_inputs(path: Option<&Path>) -> Result<InputMap> {
    let mut inputs = match path {
        Some(path) => read_input_file(path)?,
        None => InputMap::new(),
    };

    for name in INPUT_NAMES {
        if let Ok(value) = std::env::var(input_env_key(name)) {
            if !value.is_empty() {
                inputs.insert((*name).to_string(), value);
            }
        }
    }
    info!(inputs = ?inputs.keys().collect::<Vec<_>>(), "Collected step inputs");
    Ok(inputs)
}

fn read_input_file(path: &Path) -> Result<InputMap> {
    info!(inputs_path = ?path, "Loading inputs from file");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, inputs_path = ?path, "Failed to read inputs file");
        anyhow!("Failed to read inputs file {:?}: {}", path, e)
    })?;

    let raw: BTreeMap<String, serde_yaml::Value> =
        serde_yaml::from_str(&content).map_err(|e| {
            error!(error = ?e, inputs_path = ?path, "Failed to parse inputs YAML");
            anyhow!("Failed to parse inputs YAML: {e}")
        })?;

    let mut inputs = InputMap::new();
    for (name, value) in raw {
        let value = match value {
            serde_yaml::Value::Null => continue,
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::String(s) => s,
            other => bail!("input {name} must be a scalar, got {other:?}"),
        };
        inputs.insert(name, value);
    }
    Ok(inputs)
}

fn non_empty<'a>(inputs: &'a InputMap, name: &str) -> Option<&'a str> {
    inputs
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

fn required<'a>(inputs: &'a InputMap, name: &str) -> Result<&'a str> {
    non_empty(inputs, name).ok_or_else(|| {
        error!(input = name, "Required input missing");
        anyhow!("Input required and not supplied: {name}")
    })
}

/// Builds the release request from collected inputs.
///
/// `default_commitish` is used when the `commitish` input is absent (the triggering commit).
pub fn request_from_inputs(
    inputs: &InputMap,
    default_commitish: Option<&str>,
) -> Result<ReleaseRequest> {
    let tag = required(inputs, "tag_name")?;
    let asset_dir = PathBuf::from(required(inputs, "asset_dir_path")?);
    let draft = parse_bool_input("draft", non_empty(inputs, "draft").unwrap_or(""))?;
    let prerelease =
        parse_bool_input("prerelease", non_empty(inputs, "prerelease").unwrap_or(""))?;
    let commitish = non_empty(inputs, "commitish")
        .or(default_commitish.filter(|s| !s.trim().is_empty()))
        .context("No commitish input and GITHUB_SHA is not set")?;

    let request = ReleaseRequest::new(
        tag,
        non_empty(inputs, "release_name"),
        inputs.get("body").map(String::as_str),
        draft,
        prerelease,
        commitish,
        Some(asset_dir),
    )?;
    Ok(request)
}

/// Loads inputs and environment into a [`CliConfig`].
///
/// `lookup` from the command line takes precedence over the `lookup` input.
pub fn load_config(inputs_path: Option<&Path>, lookup: Option<LookupStrategy>) -> Result<CliConfig> {
    let inputs = load_inputs(inputs_path)?;
    let github_sha = std::env::var("GITHUB_SHA").ok();
    let request = request_from_inputs(&inputs, github_sha.as_deref())?;

    let strategy = match lookup {
        Some(strategy) => strategy,
        None => match non_empty(&inputs, "lookup") {
            Some(raw) => raw.parse::<LookupStrategy>()?,
            None => LookupStrategy::default(),
        },
    };

    request.trace_loaded();
    info!(?strategy, "Config loaded and merged successfully");

    Ok(CliConfig { request, strategy })
}
