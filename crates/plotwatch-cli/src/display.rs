//! Human-readable rendering of plot reports and region summaries.

use plotwatch_core::{PlotReport, RegionSummary, ToleranceTable};

pub fn print_report_line(report: &PlotReport) {
    match report {
        PlotReport::Evaluated(result) => {
            print!(
                "  {:<12} {:<20} iou={:.4}  dev={:+.1}%  risk={:.3} ({})",
                result.plot_id,
                result.verdict.as_str(),
                result.iou,
                result.deviation_pct,
                result.risk_score,
                result.severity.as_str(),
            );
            if result.encroachment_area_sqm > 0.0 {
                print!(
                    "  encroachment={:.0} m² (depth {:.1} m)",
                    result.encroachment_area_sqm, result.max_encroachment_depth_m
                );
            }
            println!();
        }
        PlotReport::NotEvaluable {
            plot_id,
            kind,
            reason,
        } => {
            println!("  {:<12} {:<20} {}", plot_id, kind.as_str(), reason);
        }
    }
}

pub fn print_summary(summary: &RegionSummary) {
    println!();
    println!("=== {} ===", summary.region_id);
    println!(
        "  plots: {} reported, {} evaluated, {} not evaluable",
        summary.plots_reported, summary.plots_evaluated, summary.not_evaluable
    );

    if !summary.verdict_counts.is_empty() {
        let verdicts: Vec<String> = summary
            .verdict_counts
            .iter()
            .map(|(verdict, count)| format!("{verdict}={count}"))
            .collect();
        println!("  verdicts: {}", verdicts.join(", "));
    }
    if !summary.severity_counts.is_empty() {
        let severities: Vec<String> = summary
            .severity_counts
            .iter()
            .map(|(severity, count)| format!("{severity}={count}"))
            .collect();
        println!("  severities: {}", severities.join(", "));
    }

    println!(
        "  encroachment: {:.1} m² total   mean iou: {:.4}   mean risk: {:.3}",
        summary.total_encroachment_sqm, summary.mean_iou, summary.mean_risk
    );
    println!("  category: {}", summary.category.as_str());
}

pub fn print_tolerances(table: &ToleranceTable) {
    println!("configured observation sources:");
    for (source, tolerance_m) in table.entries() {
        println!("  {:<12} {:>6.1} m", source, tolerance_m);
    }
}
