//! Plain-text rendering of an analysis report

use std::fmt::Write as FmtWrite;

use aeolens_core::{AnalyzerKind, AnalyzerResult, ErrorResult, OverallResult};

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;

/// Recommendations printed in the text report; JSON output carries all of them
const TOP_RECOMMENDATIONS: usize = 10;

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

pub fn render_report(result: &OverallResult) -> String {
    let mut output = String::new();

    push_section_header(&mut output, "🔎", &format!("AEO report: {}", result.url));
    push_key_value(
        &mut output,
        "Overall",
        &format!("{}/100 ({})", result.overall_score, result.overall_grade),
    );
    push_key_value(&mut output, "Keywords", &result.target_keywords.join(", "));
    push_key_value(&mut output, "Analyzed at", &result.analyzed_at.to_rfc3339());
    push_key_value(&mut output, "Processing", &format!("{} ms", result.processing_time));
    if let Some(block) = &result.block_detection {
        push_key_value(&mut output, "Warning", &format!("{} ({})", block.block_type, block.aeo_impact));
    }
    let _ = writeln!(&mut output);

    render_score_table(&mut output, result);
    render_recommendations(&mut output, result);
    output
}

fn render_score_table(buf: &mut String, result: &OverallResult) {
    push_section_header(buf, "📊", "Analyzers");

    let headers = ["Analyzer", "Score", "Grade", "Weight"];
    let mut rows: Vec<[String; 4]> = AnalyzerKind::PAGE_LEVEL
        .iter()
        .filter_map(|kind| {
            result.analyzers.page.get(*kind).map(|analyzer| {
                score_row(
                    *kind,
                    analyzer,
                    format!("{:.0}%", result.weights.of(*kind) * 100.0),
                )
            })
        })
        .collect();
    match &result.analyzers.site_level_eeat {
        Some(site) => rows.push(score_row(AnalyzerKind::SiteLevelEeat, site, "–".to_string())),
        None => rows.push([
            AnalyzerKind::SiteLevelEeat.label().to_string(),
            "–".to_string(),
            "–".to_string(),
            "–".to_string(),
        ]),
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| format!(" {:<width$} ", cell, width = widths[idx]))
            .collect();
        format!("|{}|", parts.join("|"))
    };

    let header_cells = headers.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let _ = writeln!(buf, "{}", format_row(&header_cells));
    let separator: Vec<String> = widths
        .iter()
        .map(|width| format!(" {:-<width$} ", "", width = *width))
        .collect();
    let _ = writeln!(buf, "|{}|", separator.join("|"));
    for row in &rows {
        let _ = writeln!(buf, "{}", format_row(row));
    }
    let _ = writeln!(buf);
}

fn score_row(kind: AnalyzerKind, result: &AnalyzerResult, weight: String) -> [String; 4] {
    [
        kind.label().to_string(),
        result.score.to_string(),
        result.grade.to_string(),
        weight,
    ]
}

fn render_recommendations(buf: &mut String, result: &OverallResult) {
    if result.recommendations.is_empty() {
        return;
    }
    push_section_header(buf, "🛠️", "Top recommendations");
    for (index, tagged) in result
        .recommendations
        .iter()
        .take(TOP_RECOMMENDATIONS)
        .enumerate()
    {
        let rec = &tagged.recommendation;
        let _ = writeln!(
            buf,
            "{}. [{}] {} ({})",
            index + 1,
            rec.priority,
            rec.text,
            tagged.analyzer
        );
        let _ = writeln!(buf, "   why: {}", rec.why);
        let _ = writeln!(buf, "   fix: {}", rec.how_to_fix);
    }
    let remaining = result.recommendations.len().saturating_sub(TOP_RECOMMENDATIONS);
    if remaining > 0 {
        let _ = writeln!(buf, "({remaining} more in --json output)");
    }
    let _ = writeln!(buf);
}

pub fn render_failure(error: &ErrorResult) -> String {
    let mut output = String::new();
    push_section_header(&mut output, "⛔", "Analysis failed");
    push_key_value(&mut output, "Error", &error.error);
    if let Some(block) = &error.block_detection {
        push_key_value(&mut output, "Block type", &block.block_type);
        push_key_value(&mut output, "Evidence", &block.evidence.join("; "));
        push_key_value(&mut output, "Impact", &block.aeo_impact);
        push_key_value(&mut output, "Fix", &block.recommendation);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeolens_core::analyzers::{AnalysisContext, ExecutionMode, run_page_analyzers};
    use aeolens_core::orchestrator::{AnalyzerResults, weighted_score};
    use aeolens_core::recommendations::{MAX_OVERALL_RECOMMENDATIONS, merge_recommendations};
    use aeolens_core::scoring::grade_from_score;
    use aeolens_core::{AeoError, BlockDetection, FetchError, Weights};
    use chrono::Utc;
    use url::Url;
    use uuid::Uuid;

    fn sample_result() -> OverallResult {
        let url = Url::parse("https://example.com/guide").unwrap();
        let ctx = AnalysisContext::new(vec!["compost".to_string()], Utc::now());
        let page = run_page_analyzers(
            "<html><head><title>Compost guide</title></head><body><p>Compost scraps.</p></body></html>",
            &url,
            &ctx,
            ExecutionMode::Sequential,
        );
        let weights = Weights::default();
        let scores = AnalyzerKind::PAGE_LEVEL.map(|kind| page.get(kind).map_or(0, |r| r.score));
        let overall_score = weighted_score(scores, &weights);
        let recommendations = merge_recommendations(
            page.iter()
                .map(|(kind, r)| (kind.name(), r.recommendations.as_slice())),
            MAX_OVERALL_RECOMMENDATIONS,
        );

        OverallResult {
            success: true,
            analysis_id: Uuid::new_v4(),
            url: url.to_string(),
            target_keywords: vec!["compost".to_string()],
            overall_score,
            overall_grade: grade_from_score(overall_score),
            processing_time: 12,
            analyzed_at: Utc::now(),
            analyzers: AnalyzerResults {
                page,
                site_level_eeat: None,
            },
            recommendations,
            weights,
            block_detection: None,
        }
    }

    #[test]
    fn report_lists_every_analyzer() {
        let result = sample_result();
        let report = render_report(&result);

        assert!(report.contains("AEO report: https://example.com/guide"));
        assert!(report.contains(&format!("{}/100", result.overall_score)));
        for kind in AnalyzerKind::PAGE_LEVEL {
            assert!(report.contains(kind.label()), "missing {}", kind.label());
        }
        assert!(report.contains("Site-Level E-E-A-T"));
        assert!(report.contains("| 25%"));
    }

    #[test]
    fn report_truncates_recommendations() {
        let result = sample_result();
        assert!(result.recommendations.len() > TOP_RECOMMENDATIONS);

        let report = render_report(&result);
        assert!(report.contains("1. ["));
        assert!(report.contains(&format!("{TOP_RECOMMENDATIONS}. [")));
        assert!(!report.contains(&format!("{}. [", TOP_RECOMMENDATIONS + 1)));
        assert!(report.contains("more in --json output"));
    }

    #[test]
    fn failure_shows_block_details() {
        let err = AeoError::from(FetchError::Blocked(BlockDetection {
            is_blocked: true,
            block_type: "captcha".to_string(),
            evidence: vec!["body contains \"g-recaptcha\"".to_string()],
            aeo_impact: "Crawlers see a CAPTCHA".to_string(),
            recommendation: "Exempt AI crawlers".to_string(),
        }));
        let output = render_failure(&ErrorResult::from(&err));

        assert!(output.contains("Analysis failed"));
        assert!(output.contains("captcha"));
        assert!(output.contains("Exempt AI crawlers"));
    }

    #[test]
    fn empty_values_are_skipped() {
        let mut buf = String::new();
        push_key_value(&mut buf, "Keywords", "");
        assert!(buf.is_empty());
    }
}
