use alloc::string::String;
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use clap::Args;

/// Run settings shared by the test suites, benches and the harness binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Args))]
#[serde(default)]
pub struct HarnessSettings {
    /// Randomized iterations per accuracy check
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 10_000))]
    pub reps: u32,

    /// Iterations per check in smoke mode
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 1_000))]
    pub smoke_reps: u32,

    /// Run the reduced iteration count
    #[cfg_attr(feature = "cli", arg(long))]
    pub smoke_test: bool,

    /// Measure and report per-call timings
    #[cfg_attr(feature = "cli", arg(long))]
    pub time_funcs: bool,

    /// Log each operation name before it runs
    #[cfg_attr(feature = "cli", arg(long))]
    pub print_func_names: bool,

    /// Seed for the test-vector generator
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 1))]
    pub seed: u64,

    /// Append per-operation results to this CSV file
    #[cfg_attr(feature = "cli", arg(long))]
    pub csv_path: Option<String>,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            reps: 10_000,
            smoke_reps: 1_000,
            smoke_test: false,
            time_funcs: false,
            print_func_names: false,
            seed: 1,
            csv_path: None,
        }
    }
}

impl HarnessSettings {
    /// Iteration count after applying smoke mode.
    pub fn effective_reps(&self) -> u32 {
        if self.smoke_test {
            self.smoke_reps
        } else {
            self.reps
        }
    }

    /// Apply `FIXMATH_*` overrides read through `get`. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        let flag = |key: &str, slot: &mut bool| {
            if let Some(v) = get(key) {
                match v.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => *slot = true,
                    "0" | "false" | "no" | "off" => *slot = false,
                    other => log::warn!("ignoring {}={:?}", key, other),
                }
            }
        };
        flag("FIXMATH_SMOKE_TEST", &mut self.smoke_test);
        flag("FIXMATH_TIME_FUNCS", &mut self.time_funcs);
        flag("FIXMATH_PRINT_FUNC_NAMES", &mut self.print_func_names);

        if let Some(v) = get("FIXMATH_REPS") {
            match v.trim().parse() {
                Ok(n) => self.reps = n,
                Err(_) => log::warn!("ignoring FIXMATH_REPS={:?}", v),
            }
        }
        if let Some(v) = get("FIXMATH_SEED") {
            match v.trim().parse() {
                Ok(n) => self.seed = n,
                Err(_) => log::warn!("ignoring FIXMATH_SEED={:?}", v),
            }
        }
        if let Some(v) = get("FIXMATH_CSV") {
            self.csv_path = if v.is_empty() { None } else { Some(v) };
        }
    }

    /// Settings from defaults plus the process environment.
    #[cfg(feature = "std")]
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("FIXMATH_SMOKE_TEST", "1"),
            ("FIXMATH_REPS", "abc"),
            ("FIXMATH_SEED", "42"),
            ("FIXMATH_TIME_FUNCS", "maybe"),
            ("FIXMATH_CSV", "out.csv"),
        ]
        .into_iter()
        .collect();
        let mut s = HarnessSettings::default();
        s.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert!(s.smoke_test);
        assert_eq!(s.effective_reps(), 1_000);
        assert_eq!(s.reps, 10_000);
        assert_eq!(s.seed, 42);
        assert!(!s.time_funcs);
        assert_eq!(s.csv_path.as_deref(), Some("out.csv"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: HarnessSettings = serde_json::from_str(r#"{"reps": 50}"#).unwrap();
        assert_eq!(s.reps, 50);
        assert_eq!(s.smoke_reps, 1_000);
        assert_eq!(s.csv_path, None);
    }
}
