//! Final statistics report, rendered as a human table or as JSON for CI
//! consumption — mirrors `decy-oracle::metrics::OracleMetrics`'s dual
//! human/machine shape.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use shrinkc_core::{MethodId, MethodStats};

/// Per-method counters plus the run-level totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Successes/failures keyed by method name.
    pub methods: HashMap<String, MethodCounters>,
    /// Successes/failures keyed by `replace_regex` rule name, zero-
    /// suppressed on render.
    pub rules: HashMap<String, MethodCounters>,
    /// Trials short-circuited by the Trial Cache.
    pub cache_hits: u64,
    /// Length of the input file at startup, sentinels included.
    pub original_length: usize,
    /// Length of the last-accepted program at the end of the run.
    pub final_length: usize,
    /// Number of outer passes executed before reaching fixpoint.
    pub rounds: u32,
}

/// Success/failure counters for one method or one `replace_regex` rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MethodCounters {
    /// Trials accepted.
    pub successes: u64,
    /// Trials rejected.
    pub failures: u64,
}

impl From<MethodStats> for MethodCounters {
    fn from(stats: MethodStats) -> Self {
        Self { successes: stats.successes, failures: stats.failures }
    }
}

impl Report {
    /// Build a report from the registry's per-method stats plus the
    /// `replace_regex` per-rule stats and harness-level counters.
    pub fn new(
        method_stats: &HashMap<MethodId, MethodStats>,
        rule_stats: &HashMap<&'static str, MethodStats>,
        cache_hits: u64,
        original_length: usize,
        final_length: usize,
        rounds: u32,
    ) -> Self {
        let methods = method_stats
            .iter()
            .map(|(id, stats)| (id.name().to_string(), (*stats).into()))
            .collect();
        let rules = rule_stats
            .iter()
            .map(|(name, stats)| (name.to_string(), (*stats).into()))
            .collect();
        Self { methods, rules, cache_hits, original_length, final_length, rounds }
    }

    /// Percent reduction relative to `original_length`.
    pub fn percent_reduction(&self) -> f64 {
        if self.original_length == 0 {
            return 0.0;
        }
        let saved = self.original_length.saturating_sub(self.final_length);
        100.0 * saved as f64 / self.original_length as f64
    }

    /// Serialize as pretty JSON, for `--stats-json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "reduced {} -> {} bytes ({:.1}% smaller) over {} pass{}, {} cache hit{}",
            self.original_length,
            self.final_length,
            self.percent_reduction(),
            self.rounds,
            if self.rounds == 1 { "" } else { "es" },
            self.cache_hits,
            if self.cache_hits == 1 { "" } else { "s" },
        )?;

        let mut methods: Vec<_> = self.methods.iter().filter(|(_, c)| c.successes > 0 || c.failures > 0).collect();
        methods.sort_by(|a, b| a.0.cmp(b.0));
        for (name, counters) in methods {
            writeln!(f, "  {name:<14} {:>5} ok  {:>5} rejected", counters.successes, counters.failures)?;
        }

        let mut rules: Vec<_> = self.rules.iter().filter(|(_, c)| c.successes > 0 || c.failures > 0).collect();
        rules.sort_by(|a, b| a.0.cmp(b.0));
        for (name, counters) in rules {
            writeln!(f, "    {name:<28} {:>5} ok  {:>5} rejected", counters.successes, counters.failures)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_reduction_matches_byte_delta() {
        let report = Report { original_length: 100, final_length: 40, ..Default::default() };
        assert!((report.percent_reduction() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn display_suppresses_zero_counters() {
        let mut rules = HashMap::new();
        rules.insert("del_semicolon".to_string(), MethodCounters { successes: 3, failures: 1 });
        rules.insert("del_unary_op".to_string(), MethodCounters::default());
        let report = Report { rules, original_length: 10, final_length: 5, rounds: 2, ..Default::default() };
        let text = report.to_string();
        assert!(text.contains("del_semicolon"));
        assert!(!text.contains("del_unary_op"));
    }
}
