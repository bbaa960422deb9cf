//! Property tests for ABI mapping and architecture choice.

use proptest::prelude::*;

use droidprep::domain::services::arch_resolver::choose;
use droidprep::domain::services::ResolvedArchitecture;
use droidprep::Architecture;

fn filler() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_,-]{0,12}").unwrap()
}

fn token_64() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("arm64"), Just("aarch64"), Just("x86_64"), Just("amd64")]
}

fn concrete() -> impl Strategy<Value = Architecture> {
    proptest::sample::select(Architecture::ALL_CONCRETE.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: an ABI naming a 64-bit family never maps to a 32-bit tag.
    #[test]
    fn property_64bit_abi_never_resolves_to_32bit(
        prefix in filler(),
        token in token_64(),
        suffix in filler(),
    ) {
        let abi = format!("{}{}{}", prefix, token, suffix);
        let arch = Architecture::from_abi(&abi);
        prop_assert!(arch.is_64bit(), "{} -> {}", abi, arch);
    }

    /// PROPERTY: ABI mapping ignores case and surrounding whitespace.
    #[test]
    fn property_abi_mapping_is_case_insensitive(abi in "[A-Za-z0-9_-]{0,16}") {
        let padded = format!("  {}\n", abi.to_ascii_uppercase());
        prop_assert_eq!(Architecture::from_abi(&padded), Architecture::from_abi(&abi));
    }

    /// PROPERTY: a successful choice is always a concrete architecture.
    #[test]
    fn property_choice_is_never_unknown(
        abi in "(?s).{0,24}",
        override_arch in proptest::option::of(concrete()),
        fallback in proptest::option::of(concrete()),
    ) {
        let resolved = ResolvedArchitecture {
            detected: Architecture::from_abi(&abi),
            abi,
        };
        match choose("emulator-5554", &resolved, override_arch, fallback) {
            Ok(choice) => {
                prop_assert!(choice.arch.is_known());
                if let Some(arch) = override_arch {
                    prop_assert_eq!(choice.arch, arch);
                }
            }
            Err(err) => {
                prop_assert!(override_arch.is_none() && fallback.is_none());
                prop_assert!(!resolved.detected.is_known());
                prop_assert_eq!(err.exit_code(), 15);
            }
        }
    }
}
