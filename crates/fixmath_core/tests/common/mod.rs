//! Shared setup for the integration suites.

#![allow(dead_code)]

use fixmath_core::HarnessSettings;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Defaults with `FIXMATH_*` overrides from the environment.
pub fn settings() -> HarnessSettings {
    let mut settings = HarnessSettings::default();
    settings.apply_overrides(|key| std::env::var(key).ok());
    settings
}

/// Deterministic generator for one named check.
pub fn rng_for(settings: &HarnessSettings, name: &str) -> ChaCha8Rng {
    if settings.print_func_names {
        println!("{}..", name);
    }
    let salt = name.bytes().fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(b as u64));
    ChaCha8Rng::seed_from_u64(settings.seed ^ salt)
}

pub fn expand(mant: i64, exp: i32) -> f64 {
    mant as f64 * 2f64.powi(exp)
}
