//! Plain-text rendering of plans and analyses for the terminal.

use std::fmt::Write;

use chrono::NaiveDate;

use blueline_core::analysis::AnalysisResult;
use blueline_core::plan::PlanRecord;

/// Dates the way he-IL locales print them: `15.1.2023`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d.%-m.%Y").to_string()
}

/// Truncate to `max` characters (not bytes; plan names are Hebrew).
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_owned()
    }
}

/// Full plan card.
pub fn render_plan(plan: &PlanRecord) -> String {
    let mut out = String::new();
    let approval = plan
        .approval_date
        .map(format_date)
        .unwrap_or_else(|| "-".to_owned());

    let _ = writeln!(out, "Plan: {} ({})", plan.plan_name, plan.plan_number);
    let _ = writeln!(
        out,
        "  Category:   {} [{}]",
        plan.category.label(),
        plan.category
    );
    let _ = writeln!(out, "  Status:     {} [{}]", plan.status.label(), plan.status);
    let _ = writeln!(out, "  Area:       {}", plan.area);
    let _ = writeln!(out, "  Location:   {}", plan.location);
    let _ = writeln!(out, "  Municipality: {}", plan.municipality);
    let _ = writeln!(out, "  Authority:  {}", plan.planning_authority);
    let _ = writeln!(out, "  Submitted:  {}", format_date(plan.submission_date));
    let _ = writeln!(out, "  Approved:   {approval}");
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", plan.description);
    out
}

/// One row per plan.
pub fn render_plan_table(plans: &[PlanRecord]) -> String {
    if plans.is_empty() {
        return "No plans found.\n".to_owned();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<16} {:<16} {:<16} NAME",
        "#", "NUMBER", "CATEGORY", "STATUS"
    );
    let _ = writeln!(out, "{}", "-".repeat(84));
    for (i, plan) in plans.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<16} {:<16} {:<16} {}",
            i + 1,
            plan.plan_number,
            plan.category.to_string(),
            plan.status.to_string(),
            truncate(&plan.plan_name, 40)
        );
    }
    out
}

fn bullets(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{title}:");
    for item in items {
        let _ = writeln!(out, "  • {item}");
    }
}

/// Full analysis report.
pub fn render_analysis(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analysis: {}", analysis.plan_type);
    let _ = writeln!(
        out,
        "Risk: {} [{}]   Confidence: {:.0}%   Processing: {} ms",
        analysis.risk_level.label(),
        analysis.risk_level,
        analysis.confidence_clamped() * 100.0,
        analysis.processing_time_ms
    );
    let _ = writeln!(out);
    bullets(&mut out, "Objectives", &analysis.objectives);
    let _ = writeln!(out, "Area impact:\n  {}", analysis.area_impact);
    bullets(&mut out, "Challenges", &analysis.challenges);
    bullets(&mut out, "Recommendations", &analysis.recommendations);
    bullets(&mut out, "Opportunities", &analysis.opportunities);
    bullets(&mut out, "Stakeholders", &analysis.stakeholders);
    let _ = writeln!(out, "Timeline: {}", analysis.timeline);
    let _ = writeln!(out, "Budget:   {}", analysis.budget_estimate);
    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:\n  {}", analysis.summary);
    out
}
