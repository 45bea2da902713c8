//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, and display
//! formatting for the billing pipeline entity identifiers.

use core_kernel::{
    ClaimId, EraId, PaymentId, DenialId, PatientId, ProviderId, PayerId,
};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ClaimId::new();
        let id2 = ClaimId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ClaimId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = ClaimId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ClaimId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_display_uses_prefix() {
        let id = ClaimId::new();
        assert!(id.to_string().starts_with("CLM-"));
        assert_eq!(ClaimId::prefix(), "CLM");
    }

    #[test]
    fn test_parse_round_trip() {
        let id = ClaimId::new();
        let parsed: ClaimId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: ClaimId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }
}

mod prefix_tests {
    use super::*;

    #[test]
    fn test_each_identifier_has_distinct_prefix() {
        assert_eq!(EraId::prefix(), "ERA");
        assert_eq!(PaymentId::prefix(), "PAY");
        assert_eq!(DenialId::prefix(), "DEN");
        assert_eq!(PatientId::prefix(), "PAT");
        assert_eq!(ProviderId::prefix(), "PRV");
        assert_eq!(PayerId::prefix(), "PYR");
    }

    #[test]
    fn test_prefixes_render_in_display() {
        assert!(EraId::new().to_string().starts_with("ERA-"));
        assert!(PaymentId::new().to_string().starts_with("PAY-"));
        assert!(DenialId::new().to_string().starts_with("DEN-"));
    }
}

mod parse_error_tests {
    use super::*;

    #[test]
    fn test_parse_rejects_invalid_uuid() {
        let result: Result<EraId, _> = "ERA-not-a-uuid".parse();
        assert!(result.is_err());
    }
}
