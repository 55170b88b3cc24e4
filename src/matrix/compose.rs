//! Flag composition.
//!
//! The run's base flag set is built once: the caller's `RUSTFLAGS`, then the
//! flags every run gets, then the flags of the first toolchain family the
//! target belongs to. Nothing is ever removed or reordered.

use crate::core::flags::FlagSet;
use crate::core::target::Target;

/// Flags applied to every run.
pub const COMMON_FLAGS: &str = "-D warnings";

/// Target families that need toolchain adjustments for every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    /// MSVC's linker folds identical functions in release mode, which breaks
    /// instruction assertions.
    WindowsMsvc,
    /// 32-bit x86; a static relocation model keeps assertion checks under
    /// their instruction limit.
    X86_32,
    /// 32-bit MIPS; fast instruction selection miscompiles MSA.
    Mips32,
    /// ARMv7 hard-float, built with NEON.
    ArmV7HardFloat,
    /// 64-bit RISC-V, built with the scalar crypto and bit-manipulation extensions.
    Riscv64,
}

/// Ordered family table; the first matching row wins.
const TOOLCHAIN_FAMILIES: &[(&[&str], ToolchainFamily)] = &[
    (&["*-pc-windows-msvc"], ToolchainFamily::WindowsMsvc),
    (&["i686-*", "i586-*"], ToolchainFamily::X86_32),
    (&["mips-*", "mipsel-*"], ToolchainFamily::Mips32),
    (&["armv7-*eabihf", "thumbv7-*eabihf"], ToolchainFamily::ArmV7HardFloat),
    (&["riscv64*"], ToolchainFamily::Riscv64),
];

impl ToolchainFamily {
    /// Find the family of a target, if it has one.
    pub fn classify(target: &Target) -> Option<Self> {
        target.classify(TOOLCHAIN_FAMILIES)
    }

    /// Flags this family appends, whitespace separated.
    pub fn flags(self) -> &'static str {
        match self {
            ToolchainFamily::WindowsMsvc => "-C link-args=/OPT:NOICF",
            ToolchainFamily::X86_32 => "-C relocation-model=static -Z plt=yes",
            ToolchainFamily::Mips32 => "-C llvm-args=-fast-isel=false",
            ToolchainFamily::ArmV7HardFloat => "-C target-feature=+neon",
            ToolchainFamily::Riscv64 => "-C target-feature=+zk,+zks,+zbb,+zbc",
        }
    }
}

/// Compose the base flag set for a run.
///
/// Targets outside every family get only the caller's and the common flags.
pub fn compose(target: &Target, base: &FlagSet) -> FlagSet {
    let mut flags = base.clone();
    flags.append_str(COMMON_FLAGS);

    if let Some(family) = ToolchainFamily::classify(target) {
        tracing::debug!("{} uses {:?} toolchain flags", target, family);
        flags.append_str(family.flags());
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composed(target: &str, base: &str) -> FlagSet {
        compose(&Target::new(target), &FlagSet::parse(base))
    }

    #[test]
    fn test_unmatched_target_gets_only_common_flags() {
        let flags = composed("aarch64-unknown-linux-gnu", "");
        assert_eq!(flags.to_env_string(), "-D warnings");
    }

    #[test]
    fn test_family_flags_follow_base_flags() {
        let flags = composed("i686-unknown-linux-gnu", "-C opt-level=1");
        assert_eq!(
            flags.to_env_string(),
            "-C opt-level=1 -D warnings -C relocation-model=static -Z plt=yes"
        );
    }

    #[test]
    fn test_windows_suffix_match() {
        let flags = composed("x86_64-pc-windows-msvc", "");
        assert!(flags.contains("link-args=/OPT:NOICF"));
        assert!(!composed("x86_64-pc-windows-gnu", "").contains("link-args=/OPT:NOICF"));
    }

    #[test]
    fn test_first_match_wins() {
        // Matches both the MSVC suffix and the 32-bit x86 prefix.
        let flags = composed("i686-pc-windows-msvc", "");
        assert!(flags.contains("link-args=/OPT:NOICF"));
        assert!(!flags.contains("relocation-model=static"));
    }

    #[test]
    fn test_classify() {
        let cases = [
            ("mipsel-unknown-linux-musl", Some(ToolchainFamily::Mips32)),
            ("mips64-unknown-linux-gnuabi64", None),
            ("thumbv7neon-unknown-linux-gnueabihf", None),
            ("armv7-unknown-linux-gnueabihf", Some(ToolchainFamily::ArmV7HardFloat)),
            ("riscv64gc-unknown-linux-gnu", Some(ToolchainFamily::Riscv64)),
            ("i586-unknown-linux-gnu", Some(ToolchainFamily::X86_32)),
        ];
        for (target, expected) in cases {
            assert_eq!(ToolchainFamily::classify(&Target::new(target)), expected, "{}", target);
        }
    }

    #[test]
    fn test_compose_is_deterministic_and_additive() {
        let targets = [
            "x86_64-unknown-linux-gnu",
            "i686-pc-windows-msvc",
            "wasm32-unknown-unknown",
            "powerpc64le-unknown-linux-gnu",
            "armv7-unknown-linux-gnueabihf",
        ];
        let base = FlagSet::parse("-C debuginfo=0 --cfg ci");

        for target in targets {
            let target = Target::new(target);
            let first = compose(&target, &base);
            let second = compose(&target, &base);
            assert_eq!(first, second);
            assert!(first.starts_with(&base));
            assert!(first.len() > base.len());
        }
    }
}
