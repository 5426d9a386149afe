use std::path::PathBuf;
use std::process::ExitCode;

use brandcheck_lib::element::save_design;
use brandcheck_lib::output::BRAND_OUTPUT_VERSION;
use brandcheck_lib::{auto_fix, load_design, BrandError, BrandOutput, FixOutput, KitDescriptor};

use crate::cli::{KitSource, OutputFormat};
use crate::commands::resolve_kit;
use crate::formatting::{render_error, write_output};
use crate::settings::{format_effective_config, load_config, resolve_settings};

/// Run the fix command.
#[allow(clippy::too_many_arguments)]
pub async fn run_fix(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    design: PathBuf,
    source: KitSource,
    write: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let settings = resolve_settings(raw_args, 0.0, source.store.as_deref(), true, &config);
    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&config, &settings, config_path.as_deref())
        );
    }

    let kit = match resolve_kit(&source, &settings.store_path) {
        Ok(kit) => kit,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let elements = match load_design(&design) {
        Ok(elements) => elements,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let outcome = auto_fix(&elements, &kit, &config.matching);
    tracing::info!(
        design = %design.display(),
        kit = %kit.id,
        fixes = outcome.fixes.len(),
        "auto-fix computed"
    );

    if let Some(path) = &write {
        if let Err(err) = save_design(path, &outcome.elements) {
            return render_error(err, format, output.clone());
        }
    }

    let body = BrandOutput::Fix(FixOutput {
        version: BRAND_OUTPUT_VERSION.to_string(),
        design,
        kit: KitDescriptor::from(&kit),
        written_to: write,
        fixes: outcome.fixes,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(BrandError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
