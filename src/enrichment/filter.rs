use tracing::debug;

use crate::config::FilterSettings;

use super::term::Term;

/// Keeps significant terms and ranks them by ascending p-value, ties by FDR.
/// The sort is stable so equal terms keep their report order.
pub fn select_significant(terms: &[Term], settings: &FilterSettings) -> Vec<Term> {
    let mut ranked = terms
        .iter()
        .filter(|term| term.fdr <= settings.fdr_cutoff)
        .filter(|term| term.p_value <= settings.p_value_cutoff)
        .filter(|term| term.over_represented || settings.include_under_represented)
        .cloned()
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| {
        a.p_value
            .total_cmp(&b.p_value)
            .then_with(|| a.fdr.total_cmp(&b.fdr))
    });

    debug!(
        supplied = terms.len(),
        kept = ranked.len(),
        fdr_cutoff = settings.fdr_cutoff,
        p_value_cutoff = settings.p_value_cutoff,
        "selected significant terms"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::term::fixtures::term;

    #[test]
    fn cutoffs_and_direction_filter_terms() {
        let mut under = term("synaptic signaling", 0.0001);
        under.over_represented = false;
        let terms = vec![
            term("cell migration", 0.004),
            term("cell adhesion", 0.0002),
            term("apoptosis", 0.2),
            under,
        ];

        let ranked = select_significant(&terms, &FilterSettings::default());
        let names = ranked
            .iter()
            .map(|term| term.term_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["cell adhesion", "cell migration"]);
    }

    #[test]
    fn under_represented_terms_can_be_included() {
        let mut under = term("synaptic signaling", 0.0001);
        under.over_represented = false;
        let settings = FilterSettings {
            include_under_represented: true,
            ..FilterSettings::default()
        };

        let ranked = select_significant(&[term("cell adhesion", 0.001), under], &settings);
        assert_eq!(ranked[0].term_name, "synaptic signaling");
    }

    #[test]
    fn equal_p_values_keep_report_order() {
        let terms = vec![term("b term", 0.001), term("a term", 0.001)];
        let ranked = select_significant(&terms, &FilterSettings::default());
        assert_eq!(ranked[0].term_name, "b term");
        assert_eq!(ranked[1].term_name, "a term");
    }
}
