use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use brandcheck_lib::output::BRAND_OUTPUT_VERSION;
use brandcheck_lib::{BrandError, BrandKit, BrandOutput, ErrorOutput, IssueSeverity};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &BrandOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: BrandError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    let error_payload = err.to_payload();
    let payload = BrandOutput::Error(ErrorOutput {
        version: BRAND_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal errors; failing scores use 1.
    ExitCode::from(2)
}

fn write_json_output(
    body: &BrandOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_pretty_output(body: &BrandOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &BrandOutput, colorize: bool) -> String {
    match body {
        BrandOutput::Check(out) => {
            let mut buf = String::new();
            let status = if out.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if out.passed { "32" } else { "31" }, colorize);
            let score = color(
                &format!("{:.3} ({:.1}%)", out.check.score, out.check.score * 100.0),
                score_color_code(out.check.score),
                colorize,
            );
            writeln!(buf, "{} Brand compliance check", status_colored).ok();
            writeln!(buf, "Kit: {} ({})", out.kit.name, out.kit.id).ok();
            writeln!(
                buf,
                "Score: {} (min {:.1}%) over {} element{}",
                score,
                out.min_score * 100.0,
                out.check.total_elements,
                if out.check.total_elements == 1 { "" } else { "s" }
            )
            .ok();

            let counts = &out.check.counts;
            writeln!(
                buf,
                "Issues: {} (color {}, font {}, spacing {}, other {})",
                out.check.issues.len(),
                counts.color,
                counts.font,
                counts.spacing,
                counts.other
            )
            .ok();

            let mut issues: Vec<_> = out.check.issues.iter().collect();
            issues.sort_by_key(|i| i.severity);
            if !issues.is_empty() {
                writeln!(buf, "Top issues (max 10):").ok();
                for issue in issues.into_iter().take(10) {
                    let tag = color(
                        &format!("[{}]", issue.severity),
                        severity_color_code(issue.severity),
                        colorize,
                    );
                    writeln!(buf, "- {} {}", tag, issue.message).ok();
                }
            }
            if !out.check.suggestions.is_empty() {
                writeln!(buf, "Suggestions:").ok();
                for suggestion in &out.check.suggestions {
                    writeln!(buf, "- {suggestion}").ok();
                }
            }
            buf
        }
        BrandOutput::Fix(out) => {
            let mut buf = String::new();
            let header = color("[FIX]", "36", colorize);
            writeln!(
                buf,
                "{} {} change{} against kit {}",
                header,
                out.fixes.len(),
                if out.fixes.len() == 1 { "" } else { "s" },
                out.kit.name
            )
            .ok();
            for fix in &out.fixes {
                writeln!(
                    buf,
                    "- {} {}: {} -> {}",
                    fix.element_id, fix.property, fix.from, fix.to
                )
                .ok();
            }
            if let Some(path) = &out.written_to {
                writeln!(buf, "Wrote {}", path.display()).ok();
            }
            buf
        }
        BrandOutput::Kit(out) => {
            let header = color("[KIT]", "34", colorize);
            format!("{} {}", header, describe_kit(&out.kit))
        }
        BrandOutput::KitDeleted(out) => {
            let header = color("[DELETED]", "33", colorize);
            format!("{} {}", header, describe_kit(&out.kit))
        }
        BrandOutput::KitList(out) => {
            let mut buf = String::new();
            let header = color("[KITS]", "34", colorize);
            writeln!(buf, "{} {} kit(s) for {}", header, out.kits.len(), out.owner_id).ok();
            for kit in &out.kits {
                writeln!(buf, "- {}", describe_kit(kit)).ok();
            }
            buf
        }
        BrandOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn describe_kit(kit: &BrandKit) -> String {
    format!(
        "{} ({}){}: primary {}, fonts {}/{}, grid {}px{}",
        kit.name,
        kit.id,
        if kit.is_default { " [default]" } else { "" },
        kit.primary_color,
        kit.heading_font,
        kit.body_font,
        kit.spacing_unit,
        if kit.enforce_strict { ", strict" } else { "" }
    )
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map score to ANSI color code.
fn score_color_code(score: f64) -> &'static str {
    if score >= 0.9 {
        "32" // green
    } else if score >= 0.75 {
        "33" // yellow
    } else {
        "31" // red
    }
}

fn severity_color_code(severity: IssueSeverity) -> &'static str {
    match severity {
        IssueSeverity::Error => "31",
        IssueSeverity::Warning => "33",
        IssueSeverity::Info => "36",
    }
}

/// Determine exit code for the check command.
pub fn exit_code_for_check(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandcheck_lib::error::{ErrorCategory, ErrorPayload};
    use brandcheck_lib::{
        AppliedFix, AuditOutcome, CheckOutput, ComplianceChecker, DesignElement, FixOutput,
        KitDescriptor,
    };

    fn kit() -> BrandKit {
        serde_json::from_str(
            r##"{
                "id": "kit-1", "ownerId": "alice", "name": "Lumina",
                "primaryColor": "#6366f1", "headingFont": "Poppins", "bodyFont": "Inter",
                "spacingUnit": 8, "enforceStrict": true, "isDefault": true,
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn exit_code_for_check_maps_pass_fail() {
        assert_eq!(exit_code_for_check(true), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_check(false), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            BrandError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_check_lists_status_counts_and_issues() {
        let kit = kit();
        let design = vec![
            DesignElement::text("title", "Arial", 30.0).with_fill("#ff0000"),
            DesignElement::shape("box").at(3.0, 0.0),
        ];
        let check = ComplianceChecker::default().check(&design, &kit, None);
        let output = BrandOutput::Check(CheckOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            design: PathBuf::from("design.json"),
            kit: KitDescriptor::from(&kit),
            min_score: 0.8,
            passed: false,
            check,
            audit: AuditOutcome::Skipped,
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("FAIL Brand compliance check"));
        assert!(pretty.contains("Kit: Lumina (kit-1)"));
        assert!(pretty.contains("over 2 elements"));
        assert!(pretty.contains("color 1, font 1, spacing 1, other 0"));
        assert!(pretty.contains("[error] Fill #ff0000"));
        assert!(pretty.contains("[info]"));
        assert!(pretty.contains("Suggestions:"));
    }

    #[test]
    fn format_pretty_fix_lists_changes() {
        let kit = kit();
        let output = BrandOutput::Fix(FixOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            design: PathBuf::from("design.json"),
            kit: KitDescriptor::from(&kit),
            written_to: Some(PathBuf::from("fixed.json")),
            fixes: vec![AppliedFix {
                element_id: "title".into(),
                property: "fill".into(),
                from: "#ff0000".into(),
                to: "#6366f1".into(),
            }],
        });
        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[FIX] 1 change against kit Lumina"));
        assert!(pretty.contains("title fill: #ff0000 -> #6366f1"));
        assert!(pretty.contains("Wrote fixed.json"));
    }

    #[test]
    fn format_pretty_describes_kits() {
        let output = BrandOutput::Kit(brandcheck_lib::KitOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            kit: kit(),
        });
        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[KIT] Lumina (kit-1) [default]"));
        assert!(pretty.contains("fonts Poppins/Inter"));
        assert!(pretty.contains("grid 8px, strict"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = BrandOutput::Error(ErrorOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
