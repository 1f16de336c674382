//! Beneficiary applications: intake, review and aid distribution.

use common::{
    AidType, Beneficiary, BeneficiaryId, BeneficiaryStatus, Money, Role, timestamp_now,
};
use serde::Deserialize;
use store::{BeneficiaryQuery, BeneficiaryStore};

use crate::caller::Caller;
use crate::error::{DomainError, Result};

const REVIEWERS: &[Role] = &[Role::Admin, Role::Staff];

/// A public aid application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryApplication {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub nid: Option<String>,
    #[serde(default)]
    pub aid_type: AidType,
    #[serde(default)]
    pub aid_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    pub status: BeneficiaryStatus,
    #[serde(default)]
    pub review_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AidDistribution {
    pub aid_type: AidType,
    pub aid_amount: Money,
    #[serde(default)]
    pub aid_description: Option<String>,
    #[serde(default)]
    pub distribution_proof: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Intake and review workflow for aid applications.
#[derive(Clone)]
pub struct BeneficiaryService<S> {
    store: S,
}

impl<S: BeneficiaryStore> BeneficiaryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Submits an application. Open to anyone.
    #[tracing::instrument(skip(self, input))]
    pub async fn apply(&self, input: BeneficiaryApplication) -> Result<Beneficiary> {
        for (value, field) in [
            (&input.name, "name"),
            (&input.phone, "phone"),
            (&input.address, "address"),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("Please provide a {field}")));
            }
        }

        let now = timestamp_now();
        let beneficiary = Beneficiary {
            id: BeneficiaryId::new(),
            name: input.name.trim().to_string(),
            email: non_blank(input.email),
            phone: input.phone.trim().to_string(),
            address: input.address,
            nid: non_blank(input.nid),
            application_date: now,
            status: BeneficiaryStatus::Pending,
            reviewed_by: None,
            review_date: None,
            review_notes: None,
            aid_type: input.aid_type,
            aid_amount: None,
            aid_description: non_blank(input.aid_description),
            distribution_date: None,
            distribution_proof: None,
            distributed_by: None,
            created_at: now,
            updated_at: now,
        };

        let beneficiary = self.store.insert_beneficiary(beneficiary).await?;
        tracing::info!(beneficiary = %beneficiary.id, "application submitted");
        Ok(beneficiary)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        caller: &Caller,
        status: Option<BeneficiaryStatus>,
    ) -> Result<Vec<Beneficiary>> {
        caller.require_any(REVIEWERS)?;
        let query = match status {
            Some(status) => BeneficiaryQuery::new().status(status),
            None => BeneficiaryQuery::new(),
        };
        Ok(self.store.query_beneficiaries(query).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, caller: &Caller, id: BeneficiaryId) -> Result<Beneficiary> {
        caller.require_any(REVIEWERS)?;
        self.store
            .get_beneficiary(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Beneficiary", id))
    }

    /// Approves or rejects a pending application.
    #[tracing::instrument(skip(self, decision), fields(decision = %decision.status))]
    pub async fn review(
        &self,
        caller: &Caller,
        id: BeneficiaryId,
        decision: ReviewDecision,
    ) -> Result<Beneficiary> {
        let mut beneficiary = self.get(caller, id).await?;

        if !matches!(
            decision.status,
            BeneficiaryStatus::Approved | BeneficiaryStatus::Rejected
        ) {
            return Err(DomainError::validation(
                "Review status must be approved or rejected",
            ));
        }
        if beneficiary.status != BeneficiaryStatus::Pending {
            return Err(DomainError::InvalidStateTransition {
                current_state: beneficiary.status.as_str(),
                action: "review",
            });
        }

        let now = timestamp_now();
        beneficiary.status = decision.status;
        beneficiary.reviewed_by = Some(caller.user_id);
        beneficiary.review_date = Some(now);
        beneficiary.review_notes = non_blank(decision.review_notes);
        beneficiary.updated_at = now;

        let beneficiary = self.store.update_beneficiary(beneficiary).await?;
        tracing::info!(beneficiary = %beneficiary.id, status = %beneficiary.status, "application reviewed");
        Ok(beneficiary)
    }

    /// Records aid handed to an approved beneficiary.
    #[tracing::instrument(skip(self, distribution))]
    pub async fn distribute(
        &self,
        caller: &Caller,
        id: BeneficiaryId,
        distribution: AidDistribution,
    ) -> Result<Beneficiary> {
        let mut beneficiary = self.get(caller, id).await?;

        if beneficiary.status != BeneficiaryStatus::Approved {
            return Err(DomainError::validation(
                "Beneficiary must be approved before aid distribution",
            ));
        }
        if distribution.aid_amount.is_negative() {
            return Err(DomainError::validation("Aid amount cannot be negative"));
        }
        if distribution.aid_amount.exceeds_max() {
            return Err(DomainError::validation(format!(
                "Aid amount must not exceed {}",
                Money::MAX_AMOUNT
            )));
        }

        let now = timestamp_now();
        beneficiary.status = BeneficiaryStatus::AidDistributed;
        beneficiary.aid_type = distribution.aid_type;
        beneficiary.aid_amount = Some(distribution.aid_amount);
        beneficiary.aid_description = non_blank(distribution.aid_description);
        beneficiary.distribution_proof = non_blank(distribution.distribution_proof);
        beneficiary.distribution_date = Some(now);
        beneficiary.distributed_by = Some(caller.user_id);
        beneficiary.updated_at = now;

        let beneficiary = self.store.update_beneficiary(beneficiary).await?;
        tracing::info!(
            beneficiary = %beneficiary.id,
            amount = distribution.aid_amount.poisha(),
            "aid distributed"
        );
        Ok(beneficiary)
    }
}
