//! Environment-supplied run toggles.

use serde::Serialize;

/// Boolean switches and pass-through values read once at startup.
///
/// Only `no_run` and `no_std` change the plan. The remaining fields are
/// consumed by the test harnesses of the packages under test and are kept
/// exactly as given, so the values reported before the run are the ones the
/// harnesses see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToggleSet {
    /// Build test binaries without running them (`NORUN=1`).
    pub no_run: bool,
    /// Skip every package that needs `std` (`NOSTD=1`).
    pub no_std: bool,
    /// `STDARCH_TEST_EVERYTHING`, passed through untouched.
    pub test_everything: String,
    /// `STDARCH_DISABLE_ASSERT_INSTR`, passed through untouched.
    pub disable_assert_instr: String,
    /// Feature list (`FEATURES`), passed through untouched.
    pub features: String,
    /// Object-dump tool path (`OBJDUMP`), passed through untouched.
    pub objdump: String,
}

impl ToggleSet {
    /// Builder-style setter for `no_run`.
    pub fn with_no_run(mut self, no_run: bool) -> Self {
        self.no_run = no_run;
        self
    }

    /// Builder-style setter for `no_std`.
    pub fn with_no_std(mut self, no_std: bool) -> Self {
        self.no_std = no_std;
        self
    }
}
