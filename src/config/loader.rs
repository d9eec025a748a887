//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: application defaults, configuration file,
//! environment variables, command-line arguments.
//!
//! The layers are composed manually with `MergeComposer` rather than through
//! `OrthoConfig::load()` because the `Cli` struct owns subcommand dispatch,
//! and because typed environment variables must fail fast: a value such as
//! `LDAPBDD_SCENARIO_BIND_BEFORE=maybe` is an error, not a silent default.
//!
//! Environment access goes through `mockable::Env` so tests can supply
//! variables without touching the process environment.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{DefaultEnv, Env};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`).
    Bool,
    /// Unsigned 64-bit integer.
    U64,
}

/// Mapping from one environment variable to a configuration path.
struct EnvVarSpec {
    /// The environment variable name.
    env_var: &'static str,
    /// The JSON path segments, e.g. `["scenario", "bind_before"]`.
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Every environment variable the loader recognises.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "LDAPBDD_SERVER_URL",
        path: &["server_url"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "LDAPBDD_ROOT_DN",
        path: &["root_dn"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "LDAPBDD_SCENARIO_BIND_BEFORE",
        path: &["scenario", "bind_before"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "LDAPBDD_SCENARIO_PURGE_BEFORE",
        path: &["scenario", "purge_before"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "LDAPBDD_AUTHENTICATION_PRINCIPAL",
        path: &["authentication", "principal"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "LDAPBDD_AUTHENTICATION_PASSWORD",
        path: &["authentication", "password"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "LDAPBDD_CONNECTION_TIMEOUT_SECS",
        path: &["connection", "timeout_secs"],
        var_type: EnvVarType::U64,
    },
];

/// Returns the environment variable names recognised by the loader.
///
/// Tests use this to clear every `LDAPBDD_*` variable without keeping a
/// second list in sync.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Read a configuration file and push it to the composer.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value = toml::from_str::<Value>(&content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse {path}: {e}"),
    })?;

    debug!(path = %path, "loaded configuration file");
    composer.push_file(value, Some(path.to_path_buf()));
    Ok(())
}

/// Load configuration from all layers using the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - the `--config` path does not exist
/// - a configuration file is malformed
/// - a typed environment variable has an invalid value
/// - the merged layers do not form a valid configuration
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &DefaultEnv::new())
}

/// Load configuration from all layers, reading variables from `env`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: defaults.
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: configuration file. An explicit --config must exist.
    if let Some(path) = resolve_config_path(cli)? {
        load_config_file(&path, &mut composer)?;
    }

    // Layer 3: environment.
    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    Ok(config)
}

/// Picks the explicit `--config` path or the first discovered candidate.
fn resolve_config_path(cli: &Cli) -> Result<Option<Utf8PathBuf>> {
    if let Some(explicit) = &cli.config {
        if !explicit.exists() {
            return Err(ConfigError::FileNotFound {
                path: explicit.clone().into_std_path_buf(),
            }
            .into());
        }
        return Ok(Some(explicit.clone()));
    }

    let discovery = ConfigDiscovery::builder("ldapbdd")
        .env_var("LDAPBDD_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".ldapbdd.toml")
        .build();
    Ok(discovery
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok()))
}

/// Collect `LDAPBDD_*` variables into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable cannot be parsed.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        let json_value = parse_env_value(spec, raw_value)?;
        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

fn parse_env_value(spec: &EnvVarSpec, raw_value: String) -> Result<Value> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: spec.env_var.to_owned(),
        reason,
    };
    match spec.var_type {
        EnvVarType::String => Ok(Value::String(raw_value)),
        EnvVarType::Bool => raw_value
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid(format!("expected bool (true/false), got '{raw_value}'")).into()),
        EnvVarType::U64 => raw_value
            .parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid(format!("expected unsigned integer, got '{raw_value}'")).into()),
    }
}

/// Insert a value at a nested path, creating intermediate objects.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(url) = &cli.server_url {
        overrides.insert(String::from("server_url"), Value::String(url.clone()));
    }
    if let Some(root_dn) = &cli.root_dn {
        overrides.insert(String::from("root_dn"), Value::String(root_dn.clone()));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
