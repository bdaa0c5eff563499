use confvault_fs::validate_device_address;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_valid_addresses_stay_single_component(s in "\\PC*") {
        if validate_device_address(&s).is_ok() {
            let path = std::path::Path::new(&s);
            prop_assert_eq!(path.components().count(), 1);
            prop_assert!(!s.starts_with('.'));
        }
    }

    #[test]
    fn test_dotted_quads_are_accepted(
        a in any::<u8>(),
        b in any::<u8>(),
        c in any::<u8>(),
        d in any::<u8>()
    ) {
        let address = format!("{a}.{b}.{c}.{d}");
        prop_assert!(validate_device_address(&address).is_ok());
    }
}
