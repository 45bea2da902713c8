//! Denial records and appeal management

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use core_kernel::{ClaimId, DenialId};

use crate::error::BillingError;
use crate::ports::ClaimsStore;

/// Claim adjustment group category, derived from the code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCategory {
    /// CO - contractual obligation
    ContractualObligation,
    /// PR - patient responsibility
    PatientResponsibility,
    /// OA - other adjustment
    OtherAdjustment,
    /// PI - payer initiated
    PayerInitiated,
}

impl DenialCategory {
    /// Derives the category from a `GROUP-REASON` denial code
    ///
    /// Returns `None` for an unrecognized group prefix; the caller decides
    /// whether to supply an explicit category or reject the code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.split('-').next().unwrap_or("") {
            "CO" => Some(DenialCategory::ContractualObligation),
            "PR" => Some(DenialCategory::PatientResponsibility),
            "OA" => Some(DenialCategory::OtherAdjustment),
            "PI" => Some(DenialCategory::PayerInitiated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DenialCategory::ContractualObligation => "contractual_obligation",
            DenialCategory::PatientResponsibility => "patient_responsibility",
            DenialCategory::OtherAdjustment => "other_adjustment",
            DenialCategory::PayerInitiated => "payer_initiated",
        }
    }
}

impl fmt::Display for DenialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DenialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contractual_obligation" => Ok(DenialCategory::ContractualObligation),
            "patient_responsibility" => Ok(DenialCategory::PatientResponsibility),
            "other_adjustment" => Ok(DenialCategory::OtherAdjustment),
            "payer_initiated" => Ok(DenialCategory::PayerInitiated),
            other => Err(format!("unknown denial category: {other}")),
        }
    }
}

/// Denial codes a provider may contest with the payer
///
/// Codes outside this table (timely filing, fee schedule reductions,
/// patient cost share) are not appealable through the standard process.
const APPEALABLE_CODES: &[&str] = &[
    "CO-11",  // diagnosis inconsistent with procedure
    "CO-16",  // claim lacks information
    "CO-50",  // not deemed medically necessary
    "CO-167", // diagnosis not covered
    "CO-197", // precertification absent
    "PI-204", // service not covered under this plan
];

/// True when the code is in the static appealable table
pub fn is_appealable(code: &str) -> bool {
    APPEALABLE_CODES.contains(&code)
}

/// Appeal window configuration
///
/// The deadline for contesting a denial is the denial date plus a fixed
/// window, configurable per category to reflect payer contract terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealPolicy {
    pub default_window_days: u64,
    pub category_windows: HashMap<DenialCategory, u64>,
}

impl Default for AppealPolicy {
    fn default() -> Self {
        Self {
            default_window_days: 90,
            category_windows: HashMap::new(),
        }
    }
}

impl AppealPolicy {
    /// Window length for a category, never shorter than one day so a
    /// computed deadline always lands strictly after the denial date
    pub fn window_days(&self, category: DenialCategory) -> u64 {
        self.category_windows
            .get(&category)
            .copied()
            .unwrap_or(self.default_window_days)
            .max(1)
    }
}

/// A structured reason a claim was not paid
///
/// A claim accumulates one denial record per denial event across its
/// resubmission history; records are never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Denial {
    pub id: DenialId,
    pub claim_id: ClaimId,
    /// Combined `GROUP-REASON` code, e.g. `CO-50`
    pub code: String,
    pub reason: String,
    pub category: DenialCategory,
    pub appeal_eligible: bool,
    /// Deadline for contesting; only set when the code is appealable
    pub appeal_deadline: Option<NaiveDate>,
    pub corrective_action: Option<String>,
    pub denied_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Denial {
    /// Builds a denial record, deriving eligibility and deadline
    pub fn new(
        claim_id: ClaimId,
        code: impl Into<String>,
        reason: impl Into<String>,
        category: DenialCategory,
        denied_on: NaiveDate,
        policy: &AppealPolicy,
    ) -> Self {
        let code = code.into();
        let appeal_eligible = is_appealable(&code);
        let appeal_deadline = appeal_eligible
            .then(|| denied_on + Days::new(policy.window_days(category)));
        debug_assert!(appeal_deadline.map_or(true, |d| d > denied_on));

        Self {
            id: DenialId::new_v7(),
            claim_id,
            code,
            reason: reason.into(),
            category,
            appeal_eligible,
            appeal_deadline,
            corrective_action: None,
            denied_on,
            created_at: Utc::now(),
        }
    }
}

/// Records denials and computes appeal eligibility
#[derive(Clone)]
pub struct DenialManager {
    store: Arc<dyn ClaimsStore>,
    policy: AppealPolicy,
}

impl DenialManager {
    pub fn new(store: Arc<dyn ClaimsStore>) -> Self {
        Self {
            store,
            policy: AppealPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AppealPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Records a denial dated today
    ///
    /// When `category` is `None` it is derived from the code's group
    /// prefix; a code with an unrecognized prefix and no explicit category
    /// is rejected rather than filed under a guessed category.
    pub async fn record_denial(
        &self,
        claim_id: ClaimId,
        code: &str,
        reason: &str,
        category: Option<DenialCategory>,
    ) -> Result<Denial, BillingError> {
        self.record_denial_on(claim_id, code, reason, category, Utc::now().date_naive())
            .await
    }

    /// Records a denial with an explicit denial date
    pub async fn record_denial_on(
        &self,
        claim_id: ClaimId,
        code: &str,
        reason: &str,
        category: Option<DenialCategory>,
        denied_on: NaiveDate,
    ) -> Result<Denial, BillingError> {
        let category = match category.or_else(|| DenialCategory::from_code(code)) {
            Some(category) => category,
            None => {
                return Err(BillingError::UnknownDenialCode {
                    code: code.to_string(),
                })
            }
        };

        let denial = Denial::new(claim_id, code, reason, category, denied_on, &self.policy);
        self.store.insert_denial(&denial).await?;

        tracing::info!(
            claim_id = %claim_id,
            code = %denial.code,
            appeal_eligible = denial.appeal_eligible,
            "denial recorded"
        );
        Ok(denial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn denial(code: &str, denied_on: NaiveDate, policy: &AppealPolicy) -> Denial {
        let category = DenialCategory::from_code(code).unwrap();
        Denial::new(ClaimId::new(), code, "test denial", category, denied_on, policy)
    }

    #[test]
    fn test_appealable_denial_gets_deadline() {
        let d = denial("CO-50", date(2024, 1, 1), &AppealPolicy::default());

        assert!(d.appeal_eligible);
        assert_eq!(d.appeal_deadline, Some(date(2024, 3, 31)));
        assert_eq!(d.category, DenialCategory::ContractualObligation);
    }

    #[test]
    fn test_non_appealable_denial_has_no_deadline() {
        let d = denial("CO-29", date(2024, 1, 1), &AppealPolicy::default());

        assert!(!d.appeal_eligible);
        assert!(d.appeal_deadline.is_none());
    }

    #[test]
    fn test_deadline_is_after_denial_date() {
        let denied_on = date(2024, 6, 15);
        let d = denial("CO-197", denied_on, &AppealPolicy::default());

        assert!(d.appeal_deadline.unwrap() > denied_on);
    }

    #[test]
    fn test_zero_window_still_yields_future_deadline() {
        let policy = AppealPolicy {
            default_window_days: 0,
            category_windows: HashMap::new(),
        };
        let denied_on = date(2024, 1, 1);
        let d = denial("CO-50", denied_on, &policy);

        assert_eq!(d.appeal_deadline, Some(date(2024, 1, 2)));
        assert!(d.appeal_deadline.unwrap() > denied_on);
    }

    #[test]
    fn test_category_window_override() {
        let mut policy = AppealPolicy::default();
        policy
            .category_windows
            .insert(DenialCategory::PayerInitiated, 30);

        let d = denial("PI-204", date(2024, 1, 1), &policy);

        assert_eq!(d.appeal_deadline, Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_category_from_code_prefix() {
        assert_eq!(
            DenialCategory::from_code("PR-1"),
            Some(DenialCategory::PatientResponsibility)
        );
        assert_eq!(
            DenialCategory::from_code("OA-23"),
            Some(DenialCategory::OtherAdjustment)
        );
        assert_eq!(
            DenialCategory::from_code("CO-45"),
            Some(DenialCategory::ContractualObligation)
        );
        assert_eq!(DenialCategory::from_code("XX-99"), None);
        assert_eq!(DenialCategory::from_code(""), None);
    }
}
