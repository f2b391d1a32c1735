use proptest::prelude::*;
use jsvar::script::{
    extract_all, extract_variable, segments, strip_comments, LiteralValue, Locator, SegmentKind,
};

/// A small alphabet heavy on the characters the stripper cares about.
const SCRIPTISH: &str = "[a-z0-9 =;'\"/*\\\\\n]{0,60}";

#[test]
fn strips_reference_page() {
    let page = "\
var accountId = 1234; // primary account
/* legacy block
   accountId = 0; */
var url = 'https://bank.example/api'; var label = \"a /* b */ c\";
";
    let expected = "\
var accountId = 1234; 

var url = 'https://bank.example/api'; var label = \"a /* b */ c\";
";
    assert_eq!(strip_comments(page), expected);
    assert_eq!(
        extract_variable(&strip_comments(page), "accountId", 1, None, None).ok(),
        None
    );
    assert_eq!(
        extract_variable(page, "accountId", 1, None, None),
        Ok(LiteralValue::Int(0))
    );
}

proptest! {
    /// Text without a slash has no comments to remove.
    #[test]
    fn strip_without_slash_is_identity(s in "[^/]{0,80}") {
        prop_assert_eq!(strip_comments(&s), s);
    }

    #[test]
    fn strip_is_idempotent(s in SCRIPTISH) {
        let once = strip_comments(&s);
        prop_assert_eq!(strip_comments(&once), once.clone());
    }

    /// Stripping never adds text; the output is never longer.
    #[test]
    fn strip_never_grows(s in "\\PC*") {
        prop_assert!(strip_comments(&s).len() <= s.len());
    }

    /// Comment markers inside a closed string survive stripping.
    #[test]
    fn quoted_text_survives(body in "[a-z /*]{0,30}") {
        let script = format!("x = '{body}'; // trailing");
        prop_assert_eq!(strip_comments(&script), format!("x = '{body}'; "));
    }

    /// Segments tile the input: contiguous, in order, nothing left over.
    #[test]
    fn segments_cover_input(s in SCRIPTISH) {
        let mut pos = 0;
        for seg in segments(&s) {
            prop_assert_eq!(seg.span.start, pos);
            prop_assert!(seg.span.end > seg.span.start);
            pos = seg.span.end;
        }
        prop_assert_eq!(pos, s.len());
    }

    /// Keeping only code and string segments is exactly what stripping does.
    #[test]
    fn strip_matches_segments(s in SCRIPTISH) {
        let kept: String = segments(&s)
            .filter(|seg| matches!(seg.kind, SegmentKind::Code | SegmentKind::Str))
            .map(|seg| &s[seg.span.start..seg.span.end])
            .collect();
        prop_assert_eq!(strip_comments(&s), kept);
    }

    #[test]
    fn extraction_does_not_panic(s in "\\PC*", name in "[a-z]{1,3}") {
        let _ = extract_variable(&s, &name, 0, None, None);
        let _ = extract_all(&s, &Locator::Variable(name));
    }

    #[test]
    fn int_values_come_back(n in any::<i64>()) {
        let script = format!("var amount = {n};\nrender();");
        prop_assert_eq!(extract_variable(&script, "amount", 0, None, None), Ok(LiteralValue::Int(n)));
    }

    #[test]
    fn float_values_come_back(x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        let script = format!("rate = {x:?};");
        prop_assert_eq!(extract_variable(&script, "rate", 0, None, None), Ok(LiteralValue::Float(x)));
    }

    /// Escaped quotes, backslashes and newlines decode back to the input.
    #[test]
    fn escaped_strings_come_back(s in "[a-zA-Z0-9 ,.'\"\\\\\n]{0,40}") {
        let escaped = s.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n");
        let script = format!("var label = '{escaped}';");
        prop_assert_eq!(extract_variable(&script, "label", 0, None, None), Ok(LiteralValue::Text(s)));
    }

    /// Occurrence `i` is the i-th assignment in source order.
    #[test]
    fn occurrences_follow_source_order(values in proptest::collection::vec(0i64..1000, 1..8)) {
        let script: String = values.iter().map(|v| format!("step = {v}; ")).collect();
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(extract_variable(&script, "step", i, None, None), Ok(LiteralValue::Int(*v)));
        }
        prop_assert!(extract_variable(&script, "step", values.len(), None, None).is_err());
    }
}
