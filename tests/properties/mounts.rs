//! Property tests for `/proc/mounts` parsing.

use proptest::prelude::*;

use droidprep::domain::entities::PartitionMountState;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(input in "(?s).{0,512}") {
        let _ = PartitionMountState::parse_writable(&input);
    }

    /// PROPERTY: a lone root mount line decides writability from its options.
    #[test]
    fn property_root_mount_options_decide(
        device in "/dev/block/[a-z0-9]{1,8}",
        writable in any::<bool>(),
        extra in "(,[a-qs-z_][a-z_]{0,7}){0,3}",
    ) {
        let mode = if writable { "rw" } else { "ro" };
        let line = format!("{} / ext4 {}{} 0 0\n", device, mode, extra);
        prop_assert_eq!(PartitionMountState::parse_writable(&line), Some(writable));
    }
}
