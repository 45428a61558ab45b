use crate::run::RunSummary;

/// Render the end-of-run report: what was merged, then every listing or
/// category page that produced nothing, so the user can chase them by hand.
pub fn generate_run_report(summary: &RunSummary, rules_added: usize) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!(
        "  Listings resolved: {}/{}\n",
        summary.listings_resolved, summary.listings_attempted
    ));
    report.push_str(&format!(
        "  Hosts discovered this run: {}\n",
        summary.new_hosts.len()
    ));
    report.push_str(&format!("  Filter rules added: {}\n", rules_added));
    if summary.pauses > 0 {
        report.push_str(&format!("  Rate-limit pauses taken: {}\n", summary.pauses));
    }

    if !summary.failures.is_empty() {
        report.push_str(&format!(
            "\n# Unresolved ({}):\n",
            summary.failures.len()
        ));
        for failure in &summary.failures {
            report.push_str(&format!("  ✗ {}\n      {}\n", failure.url, failure.reason));
        }
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::RunFailure;

    #[test]
    fn test_report_lists_every_failure() {
        let summary = RunSummary {
            listings_attempted: 3,
            listings_resolved: 1,
            new_hosts: vec!["one.com".to_string()],
            failures: vec![
                RunFailure {
                    url: "https://mediabiasfactcheck.com/a/".to_string(),
                    reason: "no source domain found".to_string(),
                },
                RunFailure {
                    url: "https://mediabiasfactcheck.com/b/".to_string(),
                    reason: "unexpected status 500".to_string(),
                },
            ],
            pauses: 2,
        };

        let report = generate_run_report(&summary, 1);
        assert!(report.contains("Listings resolved: 1/3"));
        assert!(report.contains("Filter rules added: 1"));
        assert!(report.contains("Rate-limit pauses taken: 2"));
        assert!(report.contains("https://mediabiasfactcheck.com/a/"));
        assert!(report.contains("https://mediabiasfactcheck.com/b/"));
    }

    #[test]
    fn test_report_omits_failure_section_when_clean() {
        let summary = RunSummary {
            listings_attempted: 2,
            listings_resolved: 2,
            new_hosts: vec!["one.com".to_string(), "two.net".to_string()],
            failures: Vec::new(),
            pauses: 0,
        };

        let report = generate_run_report(&summary, 2);
        assert!(!report.contains("Unresolved"));
        assert!(!report.contains("pauses"));
    }
}
