//! Terminal summary of an analysis report.

use super::report::Report;
use colored::*;

const RULE: &str = "---------------------------------------------------";

/// Render a human-readable summary of a report for the terminal
///
/// # Arguments
/// * `report` - Report to summarize
/// * `top` - Maximum rows per table
pub fn render_summary(report: &Report, top: usize) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_scopes(report, top));
    out.push_str(&render_resources(report, top));
    out.push_str(&render_status(report));

    out
}

fn render_header(report: &Report) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Profile Summary".bold().to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Frames:     {}\n", report.frame_count));
    if !report.skipped_chunks.is_empty() {
        out.push_str(&format!("Skipped:    {}\n", report.skipped_chunks.len()));
    }
    out.push_str(&format!("Frame time: {}\n", report.frame_time.summary()));
    out.push_str(RULE);
    out.push('\n');
    out
}

fn render_scopes(report: &Report, top: usize) -> String {
    let mut out = String::new();

    if report.scope_totals.is_empty() {
        return out;
    }

    let total: f64 = report.scope_totals.iter().map(|s| s.self_time).sum();

    out.push_str("\nSelf time by scope:\n");
    for scope in report.scope_totals.iter().take(top) {
        let share = if total > 0.0 {
            scope.self_time / total * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "  {:<24} {:>12.3} ({:>5.1}%) {:>8} samples\n",
            scope.scope, scope.self_time, share, scope.samples
        ));
    }
    out
}

fn render_resources(report: &Report, top: usize) -> String {
    let mut out = String::new();

    if report.resources.by_extension.is_empty() {
        return out;
    }

    out.push_str("\nResource time by extension (load / create):\n");
    for ext in report.resources.by_extension.iter().take(top) {
        out.push_str(&format!(
            "  {:<12} {:>10.3} / {:>10.3}\n",
            ext.extension, ext.time.load, ext.time.create
        ));
    }

    out.push_str("\nSlowest resources:\n");
    for res in report.resources.by_resource.iter().take(top) {
        out.push_str(&format!(
            "  {:>10.3}  {}\n",
            res.time.total(),
            shorten_path(&res.resource)
        ));
    }
    out
}

fn render_status(report: &Report) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    let status = if report.diagnostics.is_empty() {
        "OK: all intervals nested cleanly".green().bold()
    } else {
        format!(
            "WARNING: {} overlapping nodes in {} frames",
            report.diagnostics.len(),
            report.frames_with_diagnostics()
        )
        .yellow()
        .bold()
    };
    out.push_str(&status.to_string());
    out.push('\n');
    out
}

fn shorten_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() <= 3 {
        path.to_string()
    } else {
        format!(".../{}/{}", parts[parts.len() - 2], parts[parts.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{ExtensionTotal, LoadCreate, ResourceTotal, ResourceTotals, ScopeTotal, SeriesTable};
    use crate::output::report::DiagnosticRecord;
    use crate::aggregator::FrameTimeStats;

    fn report() -> Report {
        let time = LoadCreate {
            load: 2.0,
            create: 1.0,
        };
        Report {
            version: "1.0.0".to_string(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            frame_count: 2,
            skipped_chunks: Vec::new(),
            frame_time: FrameTimeStats::default(),
            scope_totals: vec![
                ScopeTotal {
                    scope: "Engine".to_string(),
                    self_time: 3.0,
                    samples: 4,
                },
                ScopeTotal {
                    scope: "Graphics".to_string(),
                    self_time: 1.0,
                    samples: 1,
                },
            ],
            series: SeriesTable {
                names: vec!["Other".to_string()],
                values: Vec::new(),
            },
            resources: ResourceTotals {
                by_extension: vec![ExtensionTotal {
                    extension: "texturec".to_string(),
                    time,
                }],
                by_resource: vec![ResourceTotal {
                    resource: "/assets/textures/ui/button.texturec".to_string(),
                    extension: "texturec".to_string(),
                    time,
                }],
            },
            diagnostics: Vec::new(),
            frames: None,
        }
    }

    #[test]
    fn test_summary_contents() {
        colored::control::set_override(false);
        let text = render_summary(&report(), 10);

        assert!(text.contains("Frames:     2"));
        assert!(text.contains("Engine"));
        assert!(text.contains("75.0%"));
        assert!(text.contains(".../ui/button.texturec"));
        assert!(text.contains("OK: all intervals nested cleanly"));
    }

    #[test]
    fn test_summary_reports_diagnostics() {
        colored::control::set_override(false);
        let mut report = report();
        report.diagnostics = vec![
            DiagnosticRecord {
                frame: 0,
                name: "Engine.Frame".to_string(),
                start: 0.0,
                self_time: -0.2,
            },
            DiagnosticRecord {
                frame: 0,
                name: "Engine.Sim".to_string(),
                start: 1.0,
                self_time: -0.1,
            },
        ];

        let text = render_summary(&report, 10);

        assert!(text.contains("2 overlapping nodes in 1 frames"));
    }

    #[test]
    fn test_top_limits_rows() {
        colored::control::set_override(false);
        let text = render_summary(&report(), 1);

        assert!(text.contains("Engine"));
        assert!(!text.contains("Graphics"));
    }
}
