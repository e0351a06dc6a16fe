/// Converts a cohort pass rate (0.0–1.0) into a letter grade.
///
/// An A+ needs at least 95% of submissions passing a check, an A 90%,
/// a B 80%, a C 65%, a D 40%; anything lower is an F.
pub fn grade(pass_rate: f64) -> String {
    match pass_rate {
        p if p >= 0.95 => "A+".into(),
        p if p >= 0.90 => "A".into(),
        p if p >= 0.80 => "B".into(),
        p if p >= 0.65 => "C".into(),
        p if p >= 0.40 => "D".into(),
        _ => "F".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_thresholds() {
        // Each threshold is inclusive; just under it drops a band.
        let cases = [
            (1.00, "A+"),
            (0.95, "A+"),
            (0.949, "A"),
            (0.90, "A"),
            (0.899, "B"),
            (0.80, "B"),
            (0.799, "C"),
            (0.65, "C"),
            (0.649, "D"),
            (0.40, "D"),
            (0.399, "F"),
            (0.00, "F"),
        ];
        for (rate, expected) in cases {
            assert_eq!(grade(rate), expected, "pass rate {rate}");
        }
    }
}
