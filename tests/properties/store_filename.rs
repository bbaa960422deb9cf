//! Property tests for trust store filenames.

use proptest::prelude::*;

use droidprep::domain::value_objects::StoreFilename;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: any 8 hex digit hash yields a lowercase `<hash>.0` name.
    #[test]
    fn property_hex_hash_gives_store_name(hash in "[0-9a-fA-F]{8}") {
        let name = StoreFilename::from_hash(&hash).unwrap();
        let file_name = name.file_name();
        prop_assert_eq!(file_name.len(), 10);
        prop_assert!(file_name.ends_with(".0"));
        prop_assert_eq!(name.subject_hash(), hash.to_ascii_lowercase());
    }

    /// PROPERTY: anything but exactly 8 hex digits is rejected.
    #[test]
    fn property_other_lengths_rejected(hash in "[0-9a-f]{0,7}|[0-9a-f]{9,16}") {
        prop_assert!(StoreFilename::from_hash(&hash).is_none());
    }

    /// PROPERTY: non-hex characters are rejected.
    #[test]
    fn property_non_hex_rejected(prefix in "[0-9a-f]{0,7}", bad in "[g-zG-Z./ ]") {
        let mut hash = format!("{}{}", prefix, bad);
        while hash.len() < 8 {
            hash.push('0');
        }
        prop_assert!(StoreFilename::from_hash(&hash).is_none());
    }
}
