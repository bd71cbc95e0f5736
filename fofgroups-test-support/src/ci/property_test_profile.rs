//! Property-test run profile parsing for CI and local overrides.
//!
//! Every property suite in the workspace reads its case count and fork mode
//! through [`ProptestRunProfile`] so one pair of environment variables tunes
//! them all.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const FOFGROUPS_PBT_FORK_ENV_KEY: &str = "FOFGROUPS_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Load a profile from environment variables with provided defaults.
    ///
    /// Unparsable overrides are reported with a `warn!` event and replaced by
    /// the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use fofgroups_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: env_override(PROGTEST_CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: env_override(FOFGROUPS_PBT_FORK_ENV_KEY, parse_switch).unwrap_or(default_fork),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn env_override<T>(key: &'static str, parse: fn(&str) -> Result<T, String>) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse(&raw)
        .inspect_err(|reason| {
            tracing::warn!(
                env = key,
                raw = %raw,
                reason = %reason,
                "ignoring invalid property-test override",
            );
        })
        .ok()
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("unrecognised switch value {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Applies environment overrides for the duration of a test and restores
    /// the previous values on drop.
    struct ScopedEnv {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl ScopedEnv {
        fn new(overrides: &[(&'static str, Option<&str>)]) -> Self {
            let saved = overrides
                .iter()
                .map(|&(key, value)| {
                    let previous = env::var(key).ok();
                    // SAFETY: tests serialize access with ENV_LOCK.
                    unsafe {
                        match value {
                            Some(value) => env::set_var(key, value),
                            None => env::remove_var(key),
                        }
                    }
                    (key, previous)
                })
                .collect();
            Self { saved }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, previous) in &self.saved {
                // SAFETY: tests serialize access with ENV_LOCK.
                unsafe {
                    match previous {
                        Some(value) => env::set_var(key, value),
                        None => env::remove_var(key),
                    }
                }
            }
        }
    }

    fn load_with(cases: Option<&str>, fork: Option<&str>, default_fork: bool) -> ProptestRunProfile {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _env = ScopedEnv::new(&[
            (PROGTEST_CASES_ENV_KEY, cases),
            (FOFGROUPS_PBT_FORK_ENV_KEY, fork),
        ]);
        ProptestRunProfile::load(64, default_fork)
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let profile = load_with(None, None, false);
        assert_eq!(profile.cases(), 64);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case(Some("1"), 1)]
    #[case(Some(" 250 "), 250)]
    #[case(Some("0"), 64)]
    #[case(Some("-1"), 64)]
    #[case(Some("many"), 64)]
    fn case_overrides_fall_back_when_invalid(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(load_with(raw, None, false).cases(), expected);
    }

    #[rstest]
    #[case("true", false, true)]
    #[case("ON", false, true)]
    #[case("0", true, false)]
    #[case("no", true, false)]
    #[case("maybe", true, true)]
    #[case("", false, false)]
    fn fork_overrides_fall_back_when_invalid(
        #[case] raw: &str,
        #[case] default_fork: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(load_with(None, Some(raw), default_fork).fork(), expected);
    }
}
