pub fn neg_log10(value: f64) -> f64 {
    -value.max(f64::MIN_POSITIVE).log10()
}

pub fn format_p_value(value: f64) -> String {
    if value < 0.001 {
        format!("{value:.2e}")
    } else {
        format!("{value:.4}")
    }
}

pub fn short_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }

    let mut label = name
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    label.push('…');
    label
}

/// Inclusive range over `values`, `None` when the iterator is empty.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |range, value| match range {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_values_switch_to_scientific_below_a_thousandth() {
        assert_eq!(format_p_value(0.0125), "0.0125");
        assert_eq!(format_p_value(0.000012), "1.20e-5");
    }

    #[test]
    fn labels_are_truncated_on_char_boundaries() {
        assert_eq!(short_label("cell adhesion", 40), "cell adhesion");
        assert_eq!(short_label("régulation cellulaire", 5), "régu…");
    }

    #[test]
    fn value_range_covers_all_inputs() {
        assert_eq!(value_range([3.0, -1.0, 2.5]), Some((-1.0, 3.0)));
        assert_eq!(value_range(std::iter::empty()), None);
    }
}
