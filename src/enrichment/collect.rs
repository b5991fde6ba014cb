use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::config::ReportSettings;

use super::parse::{ParsedReport, parse_json_records, parse_panther_report};
use super::term::EnrichmentReport;

pub fn load_report(path: &Path, settings: &ReportSettings) -> Result<EnrichmentReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read enrichment report {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let ParsedReport { metadata, terms } = if is_json {
        parse_json_records(&raw, settings.fold_enrichment_ceiling)
            .with_context(|| format!("failed to parse JSON records in {}", path.display()))?
    } else {
        parse_panther_report(&raw, settings.fold_enrichment_ceiling)
            .with_context(|| format!("failed to parse enrichment report {}", path.display()))?
    };

    if terms.is_empty() {
        return Err(anyhow!(
            "no enrichment terms were found in {}",
            path.display()
        ));
    }

    info!(
        source = %path.display(),
        terms = terms.len(),
        format = if is_json { "json" } else { "panther" },
        "loaded enrichment report"
    );

    Ok(EnrichmentReport {
        source: path.display().to_string(),
        metadata,
        terms,
    })
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use super::*;

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("enrichnet-{}-{name}", process::id()));
        fs::write(&path, contents).expect("scratch file is writable");
        path
    }

    #[test]
    fn json_extension_selects_record_parser() {
        let path = scratch_file(
            "records.json",
            r#"[{"term_name": "cell adhesion", "count": 3, "p_value": 0.01}]"#,
        );
        let report = load_report(&path, &ReportSettings::default()).expect("report loads");
        fs::remove_file(&path).ok();

        assert_eq!(report.term_count(), 1);
        assert_eq!(report.terms[0].term_name, "cell adhesion");
    }

    #[test]
    fn empty_reports_are_rejected() {
        let path = scratch_file("empty.json", "[]");
        let error = load_report(&path, &ReportSettings::default()).expect_err("no terms");
        fs::remove_file(&path).ok();

        assert!(error.to_string().contains("no enrichment terms"));
    }

    #[test]
    fn missing_files_carry_the_path() {
        let error = load_report(Path::new("/nonexistent/report.txt"), &ReportSettings::default())
            .expect_err("file is missing");
        assert!(error.to_string().contains("/nonexistent/report.txt"));
    }
}
