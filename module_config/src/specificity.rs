//! Total order used to keep rule lists sorted from least to most specific.
//!
//! Rules later in the order override earlier ones when fragments merge.
//! Precedence, in order:
//!
//! 1. lower `priority` sorts first;
//! 2. scanning criteria from `application` down to `user`, the first
//!    criterion constrained by exactly one of the rules puts that rule last;
//! 3. the earlier registration (smaller ordinal) sorts first.

use std::cmp::Ordering;

use crate::environment::Criterion;
use crate::rule::RegisteredRule;

/// Compare two registered rules by specificity.
#[must_use]
pub fn compare(a: &RegisteredRule, b: &RegisteredRule) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| compare_selectors(a, b))
        .then_with(|| a.ordinal.cmp(&b.ordinal))
}

fn compare_selectors(a: &RegisteredRule, b: &RegisteredRule) -> Ordering {
    Criterion::most_specific_first()
        .map(|criterion| {
            let has_a = a.select.criterion(criterion).is_some();
            let has_b = b.select.criterion(criterion).is_some();
            has_a.cmp(&has_b)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ConfigSource;
    use crate::selector::Selector;
    use rstest::rstest;
    use serde_json::Value;

    fn registered(ordinal: u64, priority: i64, select: Selector) -> RegisteredRule {
        RegisteredRule {
            ordinal,
            priority,
            select,
            source: ConfigSource::Constant(Value::Null),
        }
    }

    fn plain() -> Selector {
        Selector::module("m")
    }

    #[rstest]
    #[case::priority_wins_over_criteria(
        registered(1, 0, plain().with(Criterion::Application, "a")),
        registered(0, 1, plain()),
    )]
    #[case::application_beats_everything_else(
        registered(0, 0, plain()
            .with(Criterion::User, "u")
            .with(Criterion::Theme, "t")
            .with(Criterion::Locale, "l")),
        registered(1, 0, plain().with(Criterion::Application, "a")),
    )]
    #[case::locale_beats_theme(
        registered(5, 0, plain().with(Criterion::Theme, "t")),
        registered(1, 0, plain().with(Criterion::Locale, "l")),
    )]
    #[case::user_beats_nothing(
        registered(9, 0, plain()),
        registered(1, 0, plain().with(Criterion::User, "u")),
    )]
    #[case::ordinal_breaks_ties(
        registered(1, 0, plain().with(Criterion::Locale, "l")),
        registered(2, 0, plain().with(Criterion::Locale, "x")),
    )]
    #[case::negative_priority_first(registered(7, -1, plain()), registered(3, 0, plain()))]
    fn less_specific_sorts_first(#[case] less: RegisteredRule, #[case] more: RegisteredRule) {
        assert_eq!(compare(&less, &more), Ordering::Less);
        assert_eq!(compare(&more, &less), Ordering::Greater);
    }

    #[test]
    fn a_rule_equals_itself() {
        let rule = registered(3, 2, plain().with(Criterion::Theme, "t"));
        assert_eq!(compare(&rule, &rule), Ordering::Equal);
    }

    #[test]
    fn shared_criteria_defer_to_the_next_one() {
        let a = registered(1, 0, plain().with(Criterion::Application, "a").with(Criterion::User, "u"));
        let b = registered(0, 0, plain().with(Criterion::Application, "b"));
        assert_eq!(compare(&b, &a), Ordering::Less);
    }
}
