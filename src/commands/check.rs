use std::path::PathBuf;
use std::process::ExitCode;

use brandcheck_lib::output::BRAND_OUTPUT_VERSION;
use brandcheck_lib::{
    load_design, AuditLog, AuditRecord, BrandError, BrandOutput, CheckOutput,
    ComplianceChecker, KitDescriptor,
};

use crate::cli::{KitSource, OutputFormat};
use crate::commands::resolve_kit;
use crate::formatting::{exit_code_for_check, render_error, write_output};
use crate::settings::{format_effective_config, load_config, resolve_settings};

/// Run the check command.
#[allow(clippy::too_many_arguments)]
pub async fn run_check(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    design: PathBuf,
    source: KitSource,
    project: Option<String>,
    min_score: f64,
    no_audit: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let settings = resolve_settings(
        raw_args,
        min_score,
        source.store.as_deref(),
        no_audit,
        &config,
    );
    if !(0.0..=1.0).contains(&settings.min_score) {
        return render_error(
            BrandError::Config(format!(
                "--min-score must be between 0 and 1 (got {})",
                settings.min_score
            )),
            format,
            output,
        );
    }
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
    tracing::info!(design = %design.display(), kit = %kit.id, "checking design");

    let checker = ComplianceChecker::from_config(&config);
    let check = checker.check(&elements, &kit, project.as_deref());
    let passed = check.passed(settings.min_score);

    let audit_log = if settings.audit_enabled {
        match AuditLog::from_config(&config.audit) {
            Ok(log) => log,
            Err(err) => return render_error(err, format, output.clone()),
        }
    } else {
        AuditLog::disabled()
    };
    // Spawned before the report is built; awaited so the process does not exit mid-write.
    let ticket = audit_log.emit(AuditRecord::new(kit.owner_id.clone(), check.clone()));
    let audit = ticket.wait().await;

    let body = BrandOutput::Check(CheckOutput {
        version: BRAND_OUTPUT_VERSION.to_string(),
        design,
        kit: KitDescriptor::from(&kit),
        min_score: settings.min_score,
        passed,
        check,
        audit,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(BrandError::Config(err.to_string()), format, output);
    }
    exit_code_for_check(passed)
}
