use std::path::{Path, PathBuf};

use brandcheck_lib::{BrandError, Config};

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub min_score: f64,
    pub store_path: PathBuf,
    pub audit_enabled: bool,
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_settings(
    raw_args: &[String],
    cli_min_score: f64,
    cli_store: Option<&Path>,
    no_audit: bool,
    config: &Config,
) -> ResolvedSettings {
    ResolvedSettings {
        min_score: if flag_present(raw_args, "--min-score") {
            cli_min_score
        } else {
            config.scoring.min_score
        },
        store_path: cli_store
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.store.path.clone()),
        audit_enabled: !no_audit,
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/brandcheck/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, BrandError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        BrandError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        BrandError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    config: &Config,
    settings: &ResolvedSettings,
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let weights = &config.scoring.weights;
    format!(
        "Effective config [{source}]: color_threshold={:.1}, heading_font_size={:.1}, weights: error={:.2}, warning={:.2}, info={:.2}, min_score={:.2}, store={}, audit={}",
        config.matching.color_threshold,
        config.matching.heading_font_size,
        weights.error,
        weights.warning,
        weights.info,
        settings.min_score,
        settings.store_path.display(),
        if settings.audit_enabled { "on" } else { "off" },
    )
}
