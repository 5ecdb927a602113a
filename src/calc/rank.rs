//! Result ranking: column sort with ascending/descending toggle.

use std::cmp::Ordering;

use super::cost::CostResult;

// ---------------------------------------------------------------------------
// Sort configuration
// ---------------------------------------------------------------------------

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortKey {
    Provider,
    ModelName,
    InputCost,
    OutputCost,
    PerCallCost,
    TotalCost,
}

impl SortKey {
    /// Parse a user-facing key name (CLI flag or REPL argument).
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "provider" => Some(Self::Provider),
            "model" | "name" => Some(Self::ModelName),
            "input" | "input-cost" => Some(Self::InputCost),
            "output" | "output-cost" => Some(Self::OutputCost),
            "per-call" | "call" => Some(Self::PerCallCost),
            "total" | "total-cost" => Some(Self::TotalCost),
            _ => None,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::ModelName => "model",
            Self::InputCost => "input",
            Self::OutputCost => "output",
            Self::PerCallCost => "per-call",
            Self::TotalCost => "total",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current sort state of the results table.
///
/// `key == None` means unsorted: rows stay in catalogue order. Once a key is
/// chosen the table never returns to the unsorted state; re-selecting the
/// active key only flips the direction.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Apply one header click: same key flips direction, a new key sorts
    /// ascending.
    pub(crate) fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort cost rows by the configured column.
///
/// The sort is stable: tied rows keep their original relative order. The
/// per-call key is an internal ranking quantity `input_cost*input_tokens +
/// output_cost*output_tokens` — deliberately NOT divided by one million,
/// since only relative order matters here; the displayed per-call cost is
/// the divided figure.
pub(crate) fn sort_results(
    results: &[CostResult],
    config: &SortConfig,
    input_tokens: u64,
    output_tokens: u64,
) -> Vec<CostResult> {
    let mut rows = results.to_vec();
    let Some(key) = config.key else {
        return rows;
    };

    rows.sort_by(|a, b| match key {
        SortKey::Provider => cmp_str(&a.provider, &b.provider, config.direction),
        SortKey::ModelName => cmp_str(&a.model_name, &b.model_name, config.direction),
        SortKey::InputCost => cmp_num(a.input_cost, b.input_cost, config.direction),
        SortKey::OutputCost => cmp_num(a.output_cost, b.output_cost, config.direction),
        SortKey::PerCallCost => cmp_num(
            per_call_rank(a, input_tokens, output_tokens),
            per_call_rank(b, input_tokens, output_tokens),
            config.direction,
        ),
        SortKey::TotalCost => cmp_num(a.total_cost, b.total_cost, config.direction),
    });
    rows
}

fn per_call_rank(row: &CostResult, input_tokens: u64, output_tokens: u64) -> f64 {
    row.input_cost * input_tokens as f64 + row.output_cost * output_tokens as f64
}

fn cmp_str(a: &str, b: &str, direction: SortDirection) -> Ordering {
    let ord = a.to_lowercase().cmp(&b.to_lowercase());
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Numeric comparison with missing values (NaN) last under BOTH directions.
fn cmp_num(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, provider: &str, input_cost: f64, output_cost: f64) -> CostResult {
        CostResult {
            model_name: name.to_string(),
            provider: provider.to_string(),
            input_tokens: 1_000,
            output_tokens: 500,
            input_cost,
            output_cost,
            total_cost: (1_000.0 * input_cost + 500.0 * output_cost) / 1_000_000.0,
            context_window: 128_000,
        }
    }

    fn names(rows: &[CostResult]) -> Vec<&str> {
        rows.iter().map(|r| r.model_name.as_str()).collect()
    }

    // -- Key parsing --------------------------------------------------------

    #[test]
    fn parse_key_names() {
        assert_eq!(SortKey::parse("provider"), Some(SortKey::Provider));
        assert_eq!(SortKey::parse("model"), Some(SortKey::ModelName));
        assert_eq!(SortKey::parse("INPUT"), Some(SortKey::InputCost));
        assert_eq!(SortKey::parse("per-call"), Some(SortKey::PerCallCost));
        assert_eq!(SortKey::parse("total"), Some(SortKey::TotalCost));
        assert_eq!(SortKey::parse("bogus"), None);
    }

    // -- Direction state machine --------------------------------------------

    #[test]
    fn toggle_new_key_sorts_ascending() {
        let mut config = SortConfig::default();
        config.toggle(SortKey::TotalCost);
        assert_eq!(config.key, Some(SortKey::TotalCost));
        assert_eq!(config.direction, SortDirection::Ascending);
    }

    #[test]
    fn toggle_same_key_flips_direction() {
        let mut config = SortConfig::default();
        config.toggle(SortKey::TotalCost);
        config.toggle(SortKey::TotalCost);
        assert_eq!(config.direction, SortDirection::Descending);
    }

    #[test]
    fn toggle_twice_returns_to_original_direction() {
        let mut config = SortConfig::default();
        config.toggle(SortKey::Provider);
        let start = config.direction;
        config.toggle(SortKey::Provider);
        config.toggle(SortKey::Provider);
        assert_eq!(config.direction, start);
    }

    #[test]
    fn toggle_switching_key_resets_to_ascending() {
        let mut config = SortConfig::default();
        config.toggle(SortKey::TotalCost);
        config.toggle(SortKey::TotalCost);
        assert_eq!(config.direction, SortDirection::Descending);
        config.toggle(SortKey::Provider);
        assert_eq!(config.key, Some(SortKey::Provider));
        assert_eq!(config.direction, SortDirection::Ascending);
    }

    #[test]
    fn toggle_never_returns_to_unsorted() {
        let mut config = SortConfig::default();
        config.toggle(SortKey::ModelName);
        for _ in 0..5 {
            config.toggle(SortKey::ModelName);
            assert!(config.key.is_some());
        }
    }

    // -- Sorting ------------------------------------------------------------

    #[test]
    fn unsorted_keeps_original_order() {
        let rows = vec![row("c", "Z", 3.0, 3.0), row("a", "A", 1.0, 1.0)];
        let sorted = sort_results(&rows, &SortConfig::default(), 1_000, 500);
        assert_eq!(names(&sorted), ["c", "a"]);
    }

    #[test]
    fn sort_by_model_name_ascending() {
        let rows = vec![
            row("Charlie", "X", 1.0, 1.0),
            row("alpha", "X", 2.0, 2.0),
            row("Bravo", "X", 3.0, 3.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::ModelName),
            direction: SortDirection::Ascending,
        };
        let sorted = sort_results(&rows, &config, 1_000, 500);
        // Case-insensitive: "alpha" sorts before "Bravo".
        assert_eq!(names(&sorted), ["alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn sort_by_total_descending() {
        let rows = vec![
            row("cheap", "X", 0.1, 0.1),
            row("pricy", "X", 10.0, 30.0),
            row("mid", "X", 2.0, 5.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::TotalCost),
            direction: SortDirection::Descending,
        };
        let sorted = sort_results(&rows, &config, 1_000, 500);
        assert_eq!(names(&sorted), ["pricy", "mid", "cheap"]);
    }

    #[test]
    fn per_call_key_weighs_tokens() {
        // in=1000 out=0: ordering must follow input price alone.
        let rows = vec![
            row("expensive-out", "X", 1.0, 100.0),
            row("expensive-in", "X", 5.0, 0.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::PerCallCost),
            direction: SortDirection::Ascending,
        };
        let sorted = sort_results(&rows, &config, 1_000, 0);
        assert_eq!(names(&sorted), ["expensive-out", "expensive-in"]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let rows = vec![
            row("first", "Same", 1.0, 1.0),
            row("second", "Same", 1.0, 1.0),
            row("third", "Same", 1.0, 1.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::Provider),
            direction: SortDirection::Ascending,
        };
        let sorted = sort_results(&rows, &config, 1_000, 500);
        assert_eq!(names(&sorted), ["first", "second", "third"]);
    }

    #[test]
    fn sort_is_idempotent() {
        let rows = vec![
            row("b", "Y", 2.0, 2.0),
            row("a", "X", 1.0, 1.0),
            row("c", "Z", 3.0, 3.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::TotalCost),
            direction: SortDirection::Descending,
        };
        let once = sort_results(&rows, &config, 1_000, 500);
        let twice = sort_results(&once, &config, 1_000, 500);
        assert_eq!(once, twice);
    }

    #[test]
    fn nan_sorts_last_ascending() {
        let rows = vec![
            row("missing", "X", f64::NAN, 0.0),
            row("five", "X", 5.0, 0.0),
            row("three", "X", 3.0, 0.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::InputCost),
            direction: SortDirection::Ascending,
        };
        let sorted = sort_results(&rows, &config, 1_000, 500);
        assert_eq!(names(&sorted), ["three", "five", "missing"]);
    }

    #[test]
    fn nan_sorts_last_descending_too() {
        let rows = vec![
            row("missing", "X", f64::NAN, 0.0),
            row("five", "X", 5.0, 0.0),
            row("three", "X", 3.0, 0.0),
        ];
        let config = SortConfig {
            key: Some(SortKey::InputCost),
            direction: SortDirection::Descending,
        };
        let sorted = sort_results(&rows, &config, 1_000, 500);
        assert_eq!(names(&sorted), ["five", "three", "missing"]);
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let rows = vec![row("b", "Y", 2.0, 2.0), row("a", "X", 1.0, 1.0)];
        let config = SortConfig {
            key: Some(SortKey::ModelName),
            direction: SortDirection::Ascending,
        };
        let _ = sort_results(&rows, &config, 1_000, 500);
        assert_eq!(names(&rows), ["b", "a"]);
    }
}
