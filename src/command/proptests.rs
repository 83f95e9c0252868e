//! Property-based tests for normalization and intent matching

use super::*;
use proptest::prelude::*;

const ISSUE_PHRASES: &[&str] = &["create issue", "new issue"];
const OTHER_PHRASES: &[&str] = &[
    "add comment",
    "comment on",
    "review",
    "code review",
    "documentation",
    "generate docs",
];

fn arb_filler() -> impl Strategy<Value = String> {
    "[a-z ]{0,20}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_normalize_is_idempotent(text in "\\PC{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalized_has_no_ascii_uppercase_or_outer_whitespace(text in "\\PC{0,40}") {
        let n = normalize(&text);
        prop_assert!(!n.chars().any(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(n.trim(), n.as_str());
    }

    // A create-issue phrase wins regardless of what else the text contains
    #[test]
    fn prop_create_issue_wins_over_any_other_phrase(
        issue in prop::sample::select(ISSUE_PHRASES),
        other in prop::sample::select(OTHER_PHRASES),
        a in arb_filler(),
        b in arb_filler(),
        issue_first in any::<bool>(),
    ) {
        let text = if issue_first {
            format!("{a} {issue} {b} {other}")
        } else {
            format!("{a} {other} {b} {issue}")
        };
        prop_assert_eq!(match_intent(&normalize(&text)), Intent::CreateIssue);
    }

    #[test]
    fn prop_text_without_phrases_is_chat(text in "[a-z ]{0,40}") {
        let has_phrase = ISSUE_PHRASES
            .iter()
            .chain(OTHER_PHRASES)
            .any(|p| text.contains(p));
        prop_assume!(!has_phrase);
        prop_assert_eq!(match_intent(&text), Intent::Chat);
    }

    #[test]
    fn prop_matching_is_case_insensitive_after_normalize(
        phrase in prop::sample::select(OTHER_PHRASES),
        upper in any::<bool>(),
    ) {
        let raw = if upper { phrase.to_ascii_uppercase() } else { phrase.to_string() };
        let expected = match_intent(phrase);
        prop_assert_eq!(match_intent(&normalize(&raw)), expected);
    }
}
