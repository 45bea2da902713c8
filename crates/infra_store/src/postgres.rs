//! PostgreSQL store adapter
//!
//! Runtime-checked SQLx queries against the schema in `migrations/`.
//! Enum-ish columns (claim/ERA/payment status, currency, denial category)
//! are stored as TEXT and parsed through the domain `FromStr` impls;
//! diagnosis and procedure codes as TEXT[].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{
    ClaimId, Currency, DenialId, EraId, Money, PatientId, PayerId, PaymentId, ProviderId,
};
use domain_claims::denial::DenialCategory;
use domain_claims::{
    Claim, ClaimStatus, ClaimsStore, Denial, EraStatus, Payment, PaymentStatus,
    RemittanceAdvice, StoreError,
};

/// `ClaimsStore` backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgClaimsStore {
    pool: PgPool,
}

impl PgClaimsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StoreError::Connection(e.to_string()),
        other => StoreError::Data(other.to_string()),
    }
}

fn parse<T: std::str::FromStr>(raw: &str, what: &'static str) -> Result<T, StoreError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| StoreError::Data(format!("invalid {what} '{raw}': {e}")))
}

#[derive(FromRow)]
struct ClaimRow {
    id: Uuid,
    claim_number: String,
    patient_id: Uuid,
    provider_id: Uuid,
    diagnosis_codes: Vec<String>,
    procedure_codes: Vec<String>,
    billed_amount: Decimal,
    currency: String,
    service_date: NaiveDate,
    status: String,
    reject_reason: Option<String>,
    edi_837: Option<String>,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    accepted_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    paid_at: Option<DateTime<Utc>>,
    denied_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl ClaimRow {
    fn into_claim(self) -> Result<Claim, StoreError> {
        let currency: Currency = parse(&self.currency, "currency")?;
        let status: ClaimStatus = parse(&self.status, "claim status")?;
        Ok(Claim {
            id: ClaimId::from_uuid(self.id),
            claim_number: self.claim_number,
            patient_id: PatientId::from_uuid(self.patient_id),
            provider_id: ProviderId::from_uuid(self.provider_id),
            diagnosis_codes: self.diagnosis_codes,
            procedure_codes: self.procedure_codes,
            billed_amount: Money::new(self.billed_amount, currency),
            service_date: self.service_date,
            status,
            reject_reason: self.reject_reason,
            edi_837: self.edi_837,
            created_at: self.created_at,
            submitted_at: self.submitted_at,
            accepted_at: self.accepted_at,
            rejected_at: self.rejected_at,
            paid_at: self.paid_at,
            denied_at: self.denied_at,
            updated_at: self.updated_at,
        })
    }
}

const CLAIM_COLUMNS: &str = "id, claim_number, patient_id, provider_id, diagnosis_codes, \
     procedure_codes, billed_amount, currency, service_date, status, reject_reason, \
     edi_837, created_at, submitted_at, accepted_at, rejected_at, paid_at, denied_at, \
     updated_at";

#[derive(FromRow)]
struct EraRow {
    id: Uuid,
    payer_id: Option<Uuid>,
    claim_number: Option<String>,
    check_number: Option<String>,
    check_amount: Option<Decimal>,
    currency: String,
    payment_date: Option<NaiveDate>,
    raw_edi: String,
    status: String,
    error_reason: Option<String>,
    received_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl EraRow {
    fn into_era(self) -> Result<RemittanceAdvice, StoreError> {
        let currency: Currency = parse(&self.currency, "currency")?;
        let status: EraStatus = parse(&self.status, "ERA status")?;
        Ok(RemittanceAdvice {
            id: EraId::from_uuid(self.id),
            payer_id: self.payer_id.map(PayerId::from_uuid),
            claim_number: self.claim_number,
            check_number: self.check_number,
            check_amount: self.check_amount.map(|a| Money::new(a, currency)),
            payment_date: self.payment_date,
            raw_edi: self.raw_edi,
            status,
            error_reason: self.error_reason,
            received_at: self.received_at,
            processed_at: self.processed_at,
        })
    }
}

const ERA_COLUMNS: &str = "id, payer_id, claim_number, check_number, check_amount, currency, \
     payment_date, raw_edi, status, error_reason, received_at, processed_at";

#[derive(FromRow)]
struct PaymentRow {
    id: Uuid,
    claim_id: Uuid,
    era_id: Option<Uuid>,
    check_number: String,
    amount: Decimal,
    currency: String,
    payment_date: NaiveDate,
    status: String,
    posted_at: DateTime<Utc>,
    voided_at: Option<DateTime<Utc>>,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment, StoreError> {
        let currency: Currency = parse(&self.currency, "currency")?;
        let status: PaymentStatus = parse(&self.status, "payment status")?;
        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            claim_id: ClaimId::from_uuid(self.claim_id),
            era_id: self.era_id.map(EraId::from_uuid),
            check_number: self.check_number,
            amount: Money::new(self.amount, currency),
            payment_date: self.payment_date,
            status,
            posted_at: self.posted_at,
            voided_at: self.voided_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, claim_id, era_id, check_number, amount, currency, \
     payment_date, status, posted_at, voided_at";

#[derive(FromRow)]
struct DenialRow {
    id: Uuid,
    claim_id: Uuid,
    code: String,
    reason: String,
    category: String,
    appeal_eligible: bool,
    appeal_deadline: Option<NaiveDate>,
    corrective_action: Option<String>,
    denied_on: NaiveDate,
    created_at: DateTime<Utc>,
}

impl DenialRow {
    fn into_denial(self) -> Result<Denial, StoreError> {
        let category: DenialCategory = parse(&self.category, "denial category")?;
        Ok(Denial {
            id: DenialId::from_uuid(self.id),
            claim_id: ClaimId::from_uuid(self.claim_id),
            code: self.code,
            reason: self.reason,
            category,
            appeal_eligible: self.appeal_eligible,
            appeal_deadline: self.appeal_deadline,
            corrective_action: self.corrective_action,
            denied_on: self.denied_on,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl ClaimsStore for PgClaimsStore {
    async fn insert_claim(&self, claim: &Claim) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO claims (id, claim_number, patient_id, provider_id, diagnosis_codes, \
             procedure_codes, billed_amount, currency, service_date, status, reject_reason, \
             edi_837, created_at, submitted_at, accepted_at, rejected_at, paid_at, denied_at, \
             updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(claim.id.as_uuid())
        .bind(&claim.claim_number)
        .bind(claim.patient_id.as_uuid())
        .bind(claim.provider_id.as_uuid())
        .bind(&claim.diagnosis_codes)
        .bind(&claim.procedure_codes)
        .bind(claim.billed_amount.amount())
        .bind(claim.billed_amount.currency().code())
        .bind(claim.service_date)
        .bind(claim.status.as_str())
        .bind(&claim.reject_reason)
        .bind(&claim.edi_837)
        .bind(claim.created_at)
        .bind(claim.submitted_at)
        .bind(claim.accepted_at)
        .bind(claim.rejected_at)
        .bind(claim.paid_at)
        .bind(claim.denied_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, StoreError> {
        let row: Option<ClaimRow> =
            sqlx::query_as(&format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
        row.ok_or_else(|| StoreError::not_found("Claim", id))?.into_claim()
    }

    async fn find_claim_by_number(
        &self,
        claim_number: &str,
    ) -> Result<Option<Claim>, StoreError> {
        let row: Option<ClaimRow> = sqlx::query_as(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_number = $1"
        ))
        .bind(claim_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(ClaimRow::into_claim).transpose()
    }

    async fn update_claim(&self, claim: &Claim) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE claims SET status = $2, reject_reason = $3, edi_837 = $4, \
             submitted_at = $5, accepted_at = $6, rejected_at = $7, paid_at = $8, \
             denied_at = $9, updated_at = $10 WHERE id = $1",
        )
        .bind(claim.id.as_uuid())
        .bind(claim.status.as_str())
        .bind(&claim.reject_reason)
        .bind(&claim.edi_837)
        .bind(claim.submitted_at)
        .bind(claim.accepted_at)
        .bind(claim.rejected_at)
        .bind(claim.paid_at)
        .bind(claim.denied_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Claim", claim.id));
        }
        Ok(())
    }

    async fn list_claims(&self) -> Result<Vec<Claim>, StoreError> {
        let rows: Vec<ClaimRow> = sqlx::query_as(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(ClaimRow::into_claim).collect()
    }

    async fn insert_era(&self, era: &RemittanceAdvice) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO eras (id, payer_id, claim_number, check_number, check_amount, \
             currency, payment_date, raw_edi, status, error_reason, received_at, processed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(era.id.as_uuid())
        .bind(era.payer_id.map(|p| *p.as_uuid()))
        .bind(&era.claim_number)
        .bind(&era.check_number)
        .bind(era.check_amount.map(|a| a.amount()))
        .bind(
            era.check_amount
                .map(|a| a.currency().code())
                .unwrap_or(Currency::USD.code()),
        )
        .bind(era.payment_date)
        .bind(&era.raw_edi)
        .bind(era.status.as_str())
        .bind(&era.error_reason)
        .bind(era.received_at)
        .bind(era.processed_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_era(&self, id: EraId) -> Result<RemittanceAdvice, StoreError> {
        let row: Option<EraRow> =
            sqlx::query_as(&format!("SELECT {ERA_COLUMNS} FROM eras WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
        row.ok_or_else(|| StoreError::not_found("ERA", id))?.into_era()
    }

    async fn update_era(&self, era: &RemittanceAdvice) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE eras SET claim_number = $2, check_number = $3, check_amount = $4, \
             payment_date = $5, status = $6, error_reason = $7, processed_at = $8 \
             WHERE id = $1",
        )
        .bind(era.id.as_uuid())
        .bind(&era.claim_number)
        .bind(&era.check_number)
        .bind(era.check_amount.map(|a| a.amount()))
        .bind(era.payment_date)
        .bind(era.status.as_str())
        .bind(&era.error_reason)
        .bind(era.processed_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("ERA", era.id));
        }
        Ok(())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO payments (id, claim_id, era_id, check_number, amount, currency, \
             payment_date, status, posted_at, voided_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(payment.id.as_uuid())
        .bind(payment.claim_id.as_uuid())
        .bind(payment.era_id.map(|e| *e.as_uuid()))
        .bind(&payment.check_number)
        .bind(payment.amount.amount())
        .bind(payment.amount.currency().code())
        .bind(payment.payment_date)
        .bind(payment.status.as_str())
        .bind(payment.posted_at)
        .bind(payment.voided_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Payment, StoreError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.ok_or_else(|| StoreError::not_found("Payment", id))?
            .into_payment()
    }

    async fn update_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE payments SET status = $2, voided_at = $3 WHERE id = $1",
        )
        .bind(payment.id.as_uuid())
        .bind(payment.status.as_str())
        .bind(payment.voided_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Payment", payment.id));
        }
        Ok(())
    }

    async fn find_payment(
        &self,
        claim_id: ClaimId,
        era_id: Option<EraId>,
    ) -> Result<Option<Payment>, StoreError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE claim_id = $1 AND era_id IS NOT DISTINCT FROM $2 AND status <> 'voided'"
        ))
        .bind(claim_id.as_uuid())
        .bind(era_id.map(|e| *e.as_uuid()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(PaymentRow::into_payment).transpose()
    }

    async fn payments_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Payment>, StoreError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE claim_id = $1 ORDER BY posted_at"
        ))
        .bind(claim_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    async fn insert_denial(&self, denial: &Denial) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO denials (id, claim_id, code, reason, category, appeal_eligible, \
             appeal_deadline, corrective_action, denied_on, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(denial.id.as_uuid())
        .bind(denial.claim_id.as_uuid())
        .bind(&denial.code)
        .bind(&denial.reason)
        .bind(denial.category.as_str())
        .bind(denial.appeal_eligible)
        .bind(denial.appeal_deadline)
        .bind(&denial.corrective_action)
        .bind(denial.denied_on)
        .bind(denial.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn denials_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Denial>, StoreError> {
        let rows: Vec<DenialRow> = sqlx::query_as(
            "SELECT id, claim_id, code, reason, category, appeal_eligible, appeal_deadline, \
             corrective_action, denied_on, created_at \
             FROM denials WHERE claim_id = $1 ORDER BY created_at",
        )
        .bind(claim_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(DenialRow::into_denial).collect()
    }
}
