//! Environment resolution.
//!
//! Everything a run depends on is read here, once, before anything else
//! happens. Toggles follow the CI convention that only the literal string
//! `"1"` means "on": `NORUN=true` or `NORUN=yes` leave the toggle off, and
//! no value is ever rejected.

use std::ffi::OsString;

use crate::core::error::ConfigError;
use crate::core::flags::FlagSet;
use crate::core::target::Target;
use crate::core::toggles::ToggleSet;

pub const TARGET_VAR: &str = "TARGET";
pub const RUSTFLAGS_VAR: &str = "RUSTFLAGS";
pub const NORUN_VAR: &str = "NORUN";
pub const NOSTD_VAR: &str = "NOSTD";
pub const FEATURES_VAR: &str = "FEATURES";
pub const OBJDUMP_VAR: &str = "OBJDUMP";
pub const DISABLE_ASSERT_INSTR_VAR: &str = "STDARCH_DISABLE_ASSERT_INSTR";
pub const TEST_EVERYTHING_VAR: &str = "STDARCH_TEST_EVERYTHING";

/// The immutable inputs of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEnvironment {
    /// Target triple under test
    pub target: Target,
    /// Caller-supplied flags (`RUSTFLAGS`)
    pub base_flags: FlagSet,
    /// Toggles and pass-through values
    pub toggles: ToggleSet,
}

impl RunEnvironment {
    /// Resolve from the process environment.
    pub fn from_process() -> Result<Self, ConfigError> {
        Self::resolve_os(|key| std::env::var_os(key))
    }

    /// Resolve using a lookup that returns raw OS strings.
    ///
    /// A `TARGET` that is not valid unicode is rejected; any other such
    /// variable is treated as unset.
    pub fn resolve_os<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(target) = lookup(TARGET_VAR) {
            if target.to_str().is_none() {
                return Err(ConfigError::InvalidVar {
                    var: TARGET_VAR,
                    value: target.to_string_lossy().into_owned(),
                });
            }
        }

        Self::resolve(|key| lookup(key).and_then(|v| v.into_string().ok()))
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target = lookup(TARGET_VAR)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar { var: TARGET_VAR })?;

        let flag = |key: &str| lookup(key).as_deref() == Some("1");
        let text = |key: &str| lookup(key).unwrap_or_default();

        let toggles = ToggleSet {
            no_run: flag(NORUN_VAR),
            no_std: flag(NOSTD_VAR),
            test_everything: text(TEST_EVERYTHING_VAR),
            disable_assert_instr: text(DISABLE_ASSERT_INSTR_VAR),
            features: text(FEATURES_VAR),
            objdump: text(OBJDUMP_VAR),
        };

        Ok(RunEnvironment {
            target: Target::new(target),
            base_flags: FlagSet::parse(&text(RUSTFLAGS_VAR)),
            toggles,
        })
    }

    /// The values reported before a run, in order.
    ///
    /// Pass-through values appear exactly as the harnesses will read them.
    pub fn summary(&self, flags: &FlagSet) -> Vec<(&'static str, String)> {
        vec![
            (TARGET_VAR, self.target.to_string()),
            (RUSTFLAGS_VAR, flags.to_env_string()),
            (FEATURES_VAR, self.toggles.features.clone()),
            (OBJDUMP_VAR, self.toggles.objdump.clone()),
            (DISABLE_ASSERT_INSTR_VAR, self.toggles.disable_assert_instr.clone()),
            (TEST_EVERYTHING_VAR, self.toggles.test_everything.clone()),
        ]
    }

    /// Log the resolved inputs, including the values the harnesses consume.
    pub fn log_summary(&self, flags: &FlagSet) {
        for (key, value) in self.summary(flags) {
            tracing::info!("{}={}", key, value);
        }

        let on = |b: bool| if b { "1" } else { "" };
        tracing::debug!(
            "{}={} {}={}",
            NORUN_VAR,
            on(self.toggles.no_run),
            NOSTD_VAR,
            on(self.toggles.no_std)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env_lookup;

    #[test]
    fn test_missing_target_is_config_error() {
        let err = RunEnvironment::resolve(env_lookup(&[("NORUN", "1")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { var: "TARGET" }));
    }

    #[test]
    fn test_empty_target_is_missing() {
        let err = RunEnvironment::resolve(env_lookup(&[("TARGET", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { .. }));
    }

    #[test]
    fn test_defaults_when_only_target_set() {
        let env = RunEnvironment::resolve(env_lookup(&[("TARGET", "x86_64-unknown-linux-gnu")]))
            .unwrap();

        assert_eq!(env.target.as_str(), "x86_64-unknown-linux-gnu");
        assert!(env.base_flags.is_empty());
        assert_eq!(env.toggles, ToggleSet::default());
    }

    #[test]
    fn test_only_literal_one_enables_toggles() {
        for (value, expected) in [("1", true), ("true", false), ("yes", false), ("0", false), (" 1", false)] {
            let env = RunEnvironment::resolve(env_lookup(&[
                ("TARGET", "aarch64-unknown-linux-gnu"),
                ("NORUN", value),
                ("NOSTD", value),
            ]))
            .unwrap();
            assert_eq!(env.toggles.no_run, expected, "NORUN={:?}", value);
            assert_eq!(env.toggles.no_std, expected, "NOSTD={:?}", value);
        }
    }

    #[test]
    fn test_pass_through_values() {
        let env = RunEnvironment::resolve(env_lookup(&[
            ("TARGET", "i686-unknown-linux-gnu"),
            ("RUSTFLAGS", "-C opt-level=2"),
            ("FEATURES", "std_detect_file_io"),
            ("OBJDUMP", "/usr/bin/llvm-objdump"),
            ("STDARCH_DISABLE_ASSERT_INSTR", "1"),
            ("STDARCH_TEST_EVERYTHING", "1"),
        ]))
        .unwrap();

        assert_eq!(env.base_flags.tokens(), ["-C", "opt-level=2"]);
        assert_eq!(env.toggles.features, "std_detect_file_io");
        assert_eq!(env.toggles.objdump, "/usr/bin/llvm-objdump");
        assert_eq!(env.toggles.disable_assert_instr, "1");
        assert_eq!(env.toggles.test_everything, "1");
    }

    #[test]
    fn test_harness_values_reported_verbatim() {
        let env = RunEnvironment::resolve(env_lookup(&[
            ("TARGET", "x86_64-unknown-linux-gnu"),
            ("STDARCH_TEST_EVERYTHING", "yes"),
            ("STDARCH_DISABLE_ASSERT_INSTR", "true"),
        ]))
        .unwrap();

        assert_eq!(env.toggles.test_everything, "yes");
        assert_eq!(env.toggles.disable_assert_instr, "true");

        let summary = env.summary(&FlagSet::parse("-D warnings"));
        let keys: Vec<&str> = summary.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            [
                "TARGET",
                "RUSTFLAGS",
                "FEATURES",
                "OBJDUMP",
                "STDARCH_DISABLE_ASSERT_INSTR",
                "STDARCH_TEST_EVERYTHING",
            ]
        );
        assert_eq!(summary[1].1, "-D warnings");
        assert_eq!(summary[4].1, "true");
        assert_eq!(summary[5].1, "yes");
    }

    #[test]
    fn test_resolve_os_reads_unicode_values() {
        let env = RunEnvironment::resolve_os(|key| match key {
            "TARGET" => Some(OsString::from("s390x-unknown-linux-gnu")),
            "NOSTD" => Some(OsString::from("1")),
            _ => None,
        })
        .unwrap();

        assert_eq!(env.target.as_str(), "s390x-unknown-linux-gnu");
        assert!(env.toggles.no_std);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_target_is_invalid_not_missing() {
        use std::os::unix::ffi::OsStringExt;

        let err = RunEnvironment::resolve_os(|key| {
            (key == "TARGET").then(|| OsString::from_vec(b"x86_64-\xff-linux".to_vec()))
        })
        .unwrap_err();

        match err {
            ConfigError::InvalidVar { var, .. } => assert_eq!(var, "TARGET"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_toggle_is_unset() {
        use std::os::unix::ffi::OsStringExt;

        let env = RunEnvironment::resolve_os(|key| match key {
            "TARGET" => Some(OsString::from("aarch64-unknown-linux-gnu")),
            "FEATURES" => Some(OsString::from_vec(vec![0xff, 0xfe])),
            _ => None,
        })
        .unwrap();

        assert_eq!(env.toggles.features, "");
    }
}
