//! Test plan generation.
//!
//! A [`TestPlan`] is the complete, ordered list of cargo invocations for one
//! target and toggle combination. It is fully built before anything runs so
//! it can be inspected (`archtest plan`) and tested without spawning.
//!
//! Order matters: the primary package is tested before anything that depends
//! on it, debug passes come before release passes of the same package, and
//! later stages assume earlier ones compiled cleanly.

use serde::Serialize;

use crate::core::invocation::{Invocation, Mode};
use crate::core::package::Package;
use crate::core::target::Target;
use crate::core::toggles::ToggleSet;
use crate::util::config::Config;
use crate::util::env::DISABLE_ASSERT_INSTR_VAR;

/// Target families whose extra CPU features get their own release passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFamily {
    /// 64-bit x86: AVX, with instruction assertions off.
    X86,
    /// 32-bit x86: strict SSE2 floating point, with instruction assertions off.
    X86_32,
    /// WebAssembly: SIMD128, plus a compile check with the unstable proposals.
    Wasm32,
    /// 64-bit MIPS: MSA.
    Mips64,
    /// s390x: the vector enhancements facility.
    S390x,
    /// 64-bit RISC-V: the vector extension, built against its compat cfg.
    Riscv64,
    /// 64-bit PowerPC: AltiVec and VSX, tested separately.
    PowerPc64,
}

/// Ordered family table; the first matching row wins.
const EXTRA_FAMILIES: &[(&[&str], ExtraFamily)] = &[
    (&["x86*"], ExtraFamily::X86),
    (&["i686-*", "i586-*"], ExtraFamily::X86_32),
    (&["wasm32*"], ExtraFamily::Wasm32),
    (&["mips64*"], ExtraFamily::Mips64),
    (&["s390x*"], ExtraFamily::S390x),
    (&["riscv64*"], ExtraFamily::Riscv64),
    (&["powerpc64*"], ExtraFamily::PowerPc64),
];

impl ExtraFamily {
    /// Find the family of a target, if it has one.
    pub fn classify(target: &Target) -> Option<Self> {
        target.classify(EXTRA_FAMILIES)
    }

    /// The release passes this family adds, in order.
    ///
    /// Each entry is `(mode, scoped flags, assertions disabled)`.
    fn passes(self) -> &'static [(Mode, &'static str, bool)] {
        match self {
            ExtraFamily::X86 => &[(Mode::Test, "-C target-feature=+avx", true)],
            ExtraFamily::X86_32 => &[(Mode::Test, "-C target-feature=+sse,+sse2", true)],
            ExtraFamily::Wasm32 => &[
                (Mode::Test, "-C target-feature=+simd128", false),
                (
                    Mode::CompileTests,
                    "-C target-feature=+simd128,+unimplemented-simd128",
                    false,
                ),
            ],
            ExtraFamily::Mips64 => &[(Mode::Test, "-C target-feature=+msa", false)],
            ExtraFamily::S390x => &[(Mode::Test, "-C target-feature=+vector-enhancements-1", false)],
            ExtraFamily::Riscv64 => &[(
                Mode::Test,
                "-C target-feature=+v --cfg stdarch_riscv_vector_compat",
                false,
            )],
            ExtraFamily::PowerPc64 => &[
                (Mode::Test, "-C target-feature=+altivec", false),
                (Mode::Test, "-C target-feature=+vsx", false),
            ],
        }
    }
}

/// A complete, ordered test plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestPlan {
    /// Target the plan was built for
    pub target: Target,

    /// Invocations in execution order
    pub steps: Vec<Invocation>,

    /// Extra-feature family the target matched, if any
    pub extra_family: Option<ExtraFamily>,

    /// Stages left out, with the reason
    pub skipped: Vec<String>,
}

impl TestPlan {
    /// Plan every invocation for a target and toggle combination.
    pub fn new(target: &Target, toggles: &ToggleSet, config: &Config) -> Self {
        let mut planner = Planner {
            target,
            toggles,
            config,
            steps: Vec::new(),
            skipped: Vec::new(),
        };

        planner.plan_primary();
        planner.plan_std_packages();
        let extra_family = planner.plan_extra_features();
        planner.plan_examples_smoke_test();

        TestPlan {
            target: target.clone(),
            steps: planner.steps,
            extra_family,
            skipped: planner.skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Invocation> {
        self.steps.iter()
    }

    /// Invocations that target a given package.
    pub fn for_package(&self, package: Package) -> impl Iterator<Item = &Invocation> {
        self.steps.iter().filter(move |inv| inv.package == package)
    }
}

struct Planner<'a> {
    target: &'a Target,
    toggles: &'a ToggleSet,
    config: &'a Config,
    steps: Vec<Invocation>,
    skipped: Vec<String>,
}

impl Planner<'_> {
    /// Queue a harness invocation.
    ///
    /// `Test` is demoted to `Build` when running is disabled. wasm32 test
    /// runners can't catch panics, so output capture is turned off for them.
    fn cargo_test(&mut self, mut inv: Invocation) {
        if inv.mode == Mode::Test && self.toggles.no_run {
            inv.mode = Mode::Build;
        }
        if inv.mode == Mode::Test && self.target.is_wasm32() {
            inv = inv.harness_arg("--nocapture");
        }
        self.steps.push(inv);
    }

    fn plan_primary(&mut self) {
        self.cargo_test(Invocation::new(Package::Primary, Mode::Test));
        self.cargo_test(Invocation::new(Package::Primary, Mode::Test).arg("--release"));
    }

    fn plan_std_packages(&mut self) {
        if self.toggles.no_std {
            self.skipped
                .push("secondary and examples packages: NOSTD is set".to_string());
            return;
        }

        self.cargo_test(Invocation::new(Package::Secondary, Mode::Test));
        self.cargo_test(Invocation::new(Package::Secondary, Mode::Test).arg("--release"));

        let features = &self.config.features;
        let variants = [
            None,
            Some(features.file_io.clone()),
            Some(features.dlsym.clone()),
            Some(format!("{},{}", features.dlsym, features.file_io)),
        ];
        for variant in variants {
            let mut inv =
                Invocation::new(Package::Secondary, Mode::Test).arg("--no-default-features");
            if let Some(list) = variant {
                inv = inv.arg(format!("--features={}", list));
            }
            self.cargo_test(inv);
        }

        self.cargo_test(Invocation::new(Package::Examples, Mode::Test));
        self.cargo_test(Invocation::new(Package::Examples, Mode::Test).arg("--release"));
    }

    fn plan_extra_features(&mut self) -> Option<ExtraFamily> {
        let family = ExtraFamily::classify(self.target)?;

        for &(mode, flags, disable_assert_instr) in family.passes() {
            let mut inv = Invocation::new(Package::Workspace, mode)
                .arg("--release")
                .flags(flags);
            if disable_assert_instr {
                inv = inv.env(DISABLE_ASSERT_INSTR_VAR, "1");
            }
            self.cargo_test(inv);
        }

        Some(family)
    }

    fn plan_examples_smoke_test(&mut self) {
        let reason = if self.toggles.no_run {
            Some("NORUN is set")
        } else if self.toggles.no_std {
            Some("NOSTD is set")
        } else if self.target.is_browser_runtime() {
            Some("the browser runtime cannot spawn the examples binary")
        } else {
            None
        };

        if let Some(reason) = reason {
            self.skipped.push(format!("examples smoke test: {}", reason));
            return;
        }

        self.steps
            .push(Invocation::new(Package::Examples, Mode::Test).in_package_dir());
        self.steps.push(
            Invocation::new(Package::Examples, Mode::Run)
                .in_package_dir()
                .args(["--release", "hex"])
                .stdin(format!("{}\n", self.config.smoke.hex_input)),
        );
    }
}
