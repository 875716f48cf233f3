// src/compat.rs

//! Build-range compatibility matching
//!
//! Decides whether a plugin version's declared build span fits any of the
//! configured target build ranges. Candidate bounds may carry a fractional
//! minor-version component ("243.1"); they are parsed as floats and floored
//! before comparison, so matching happens at whole-build granularity.
//! Target bounds are plain integers (or "*" for unbounded above).

use crate::catalog::BuildSpan;
use crate::config::BuildRange;
use tracing::debug;

/// Sentinel standing in for an unbounded upper build
const OPEN_ENDED_BUILD: i64 = 999_999;

/// Normalize a candidate until-build: strip one trailing ".*" any-minor
/// wildcard, then treat an empty string as unbounded above.
fn normalize_until_build(until_build: &str) -> i64 {
    let trimmed = until_build.strip_suffix(".*").unwrap_or(until_build);
    if trimmed.is_empty() {
        return OPEN_ENDED_BUILD;
    }
    // An unparsable until-build degrades to 0, which only matches when the
    // target range reaches down to build 0.
    trimmed.parse::<f64>().map(|v| v.floor() as i64).unwrap_or(0)
}

/// Check whether a candidate build span is contained by at least one
/// target range.
///
/// A candidate matches a target range when `floor(candidate.since) >=
/// target.since` and `floor(candidate.until) <= target.until` (target until
/// of "*" meaning unbounded). Any one matching range suffices. A candidate
/// whose since-build does not parse is incompatible regardless of targets.
pub fn is_compatible(candidate: &BuildSpan, targets: &[BuildRange]) -> bool {
    debug!(
        "Checking compatibility: since-build {}, until-build {}",
        candidate.since_build, candidate.until_build
    );

    let candidate_since = match candidate.since_build.parse::<f64>() {
        Ok(v) => v.floor() as i64,
        Err(_) => {
            debug!(
                "Skipping candidate with unparsable since-build '{}'",
                candidate.since_build
            );
            return false;
        }
    };

    let candidate_until = normalize_until_build(&candidate.until_build);

    for target in targets {
        let target_since = target.since_build.parse::<i64>().unwrap_or(0);
        let target_until = if target.until_build == "*" {
            OPEN_ENDED_BUILD
        } else {
            target.until_build.parse::<i64>().unwrap_or(0)
        };

        debug!(
            "Comparing candidate (since: {candidate_since}, until: {candidate_until}) \
             with target (since: {target_since}, until: {target_until})"
        );

        if candidate_since >= target_since && candidate_until <= target_until {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(since: &str, until: &str) -> BuildSpan {
        BuildSpan {
            since_build: since.to_string(),
            until_build: until.to_string(),
        }
    }

    fn range(since: &str, until: &str) -> BuildRange {
        BuildRange {
            since_build: since.to_string(),
            until_build: until.to_string(),
        }
    }

    #[test]
    fn test_compatible_within_open_ended_range() {
        // Scenario: candidate 243.1 .. 243.* against target 243 .. *
        let targets = vec![range("243", "*")];
        assert!(is_compatible(&span("243.1", "243.*"), &targets));
    }

    #[test]
    fn test_incompatible_below_target_since() {
        // floor(230) >= 243 is false
        let targets = vec![range("243", "*")];
        assert!(!is_compatible(&span("230", "232"), &targets));
    }

    #[test]
    fn test_incompatible_above_target_until() {
        let targets = vec![range("231", "233")];
        assert!(!is_compatible(&span("232", "241.*"), &targets));
    }

    #[test]
    fn test_compatible_within_bounded_range() {
        let targets = vec![range("231", "243")];
        assert!(is_compatible(&span("232.1", "241.*"), &targets));
    }

    #[test]
    fn test_minor_version_floored_before_comparison() {
        // floor(243.9999) == 243, which still satisfies since >= 243
        let targets = vec![range("243", "243")];
        assert!(is_compatible(&span("243.9999", "243.2"), &targets));
    }

    #[test]
    fn test_any_minor_wildcard_normalizes_to_base_build() {
        // "243.*" must behave exactly like "243"
        let targets = vec![range("200", "243")];
        assert!(is_compatible(&span("241", "243.*"), &targets));
        assert!(is_compatible(&span("241", "243"), &targets));

        let tight = vec![range("200", "242")];
        assert!(!is_compatible(&span("241", "243.*"), &tight));
    }

    #[test]
    fn test_empty_until_build_is_open_ended() {
        // Open-ended candidates only fit open-ended targets
        let open = vec![range("243", "*")];
        assert!(is_compatible(&span("243", ""), &open));

        let bounded = vec![range("243", "250")];
        assert!(!is_compatible(&span("243", ""), &bounded));
    }

    #[test]
    fn test_unparsable_since_build_fails_closed() {
        let targets = vec![range("0", "*")];
        assert!(!is_compatible(&span("not-a-build", "243.*"), &targets));
    }

    #[test]
    fn test_any_target_range_suffices() {
        // OR over target ranges: second range matches
        let targets = vec![range("231", "233"), range("243", "*")];
        assert!(is_compatible(&span("243.1", "243.*"), &targets));
    }

    #[test]
    fn test_no_target_ranges_never_matches() {
        assert!(!is_compatible(&span("243", "243.*"), &[]));
    }

    #[test]
    fn test_wildcard_target_equivalent_to_large_until() {
        let wildcard = vec![range("100", "*")];
        let sentinel = vec![range("100", "999999")];
        for until in ["120", "500.3", "999998.*", ""] {
            let candidate = span("100", until);
            assert_eq!(
                is_compatible(&candidate, &wildcard),
                is_compatible(&candidate, &sentinel),
                "wildcard and sentinel targets disagree for until '{until}'"
            );
        }
    }

    #[test]
    fn test_wildcard_stripped_only_once() {
        // "5.*.*" loses a single ".*", leaving "5.*", which does not parse
        // and degrades to 0 rather than normalizing all the way to 5.
        let bounded = vec![range("0", "3")];
        assert!(is_compatible(&span("0", "5.*.*"), &bounded));
        // A single wildcard normalizes to 5, which exceeds the bound
        assert!(!is_compatible(&span("0", "5.*"), &bounded));
    }

    #[test]
    fn test_unparsable_target_since_degrades_to_zero() {
        let targets = vec![range("garbage", "*")];
        assert!(is_compatible(&span("1", "2"), &targets));
    }
}
