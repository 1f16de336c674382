//! Donation receipts and volunteer certificates.

use common::{Campaign, Donation, DonationId, TaskId, User, VolunteerTask};
use domain::{Caller, DomainError, DonationRecorder, VolunteerService};
use store::Store;

use crate::error::Result;
use crate::pdf::{Align, PdfPage};

const ORGANIZATION: &str = "As-Shawkani Foundation";

/// A rendered PDF ready to be served as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn render_receipt(donation: &Donation, donor: &User, campaign: &Campaign) -> Vec<u8> {
    let mut page = PdfPage::new();
    page.text(ORGANIZATION, 20.0, Align::Center)
        .text("Donation Receipt", 16.0, Align::Center)
        .gap(1)
        .text(
            format!("Receipt Number: {}", donation.transaction_id),
            12.0,
            Align::Left,
        )
        .text(
            format!("Date: {}", donation.created_at.format("%Y-%m-%d")),
            12.0,
            Align::Left,
        )
        .gap(1)
        .text(format!("Donor Name: {}", donor.name), 12.0, Align::Left)
        .text(format!("Donor Email: {}", donor.email), 12.0, Align::Left)
        .gap(1)
        .text(format!("Campaign: {}", campaign.title), 12.0, Align::Left)
        .gap(1)
        .text(format!("Amount: {}", donation.amount), 18.0, Align::Center)
        .gap(1)
        .text(
            format!("Payment Method: {}", donation.payment_method),
            12.0,
            Align::Left,
        )
        .gap(1)
        .text("Thank you for your generous donation!", 10.0, Align::Center)
        .text("This receipt is generated automatically.", 10.0, Align::Center);
    page.render()
}

pub fn render_certificate(task: &VolunteerTask, volunteer: &User) -> Vec<u8> {
    let mut page = PdfPage::new();
    page.text("Certificate of Participation", 24.0, Align::Center)
        .gap(2)
        .text("This is to certify that", 16.0, Align::Center)
        .gap(1)
        .text(&volunteer.name, 20.0, Align::Center)
        .gap(1)
        .text(
            "has successfully completed the volunteer task:",
            14.0,
            Align::Center,
        )
        .gap(1)
        .text(format!("\"{}\"", task.title), 16.0, Align::Center)
        .gap(2)
        .text(
            format!("Task Description: {}", task.description),
            12.0,
            Align::Left,
        );
    if let Some(completed) = task.completed_date {
        page.gap(1).text(
            format!("Completed on: {}", completed.format("%Y-%m-%d")),
            12.0,
            Align::Left,
        );
    }
    page.gap(3)
        .text(ORGANIZATION, 12.0, Align::Center)
        .text(chrono::Utc::now().format("%Y-%m-%d").to_string(), 12.0, Align::Center);
    page.render()
}

/// Issues PDFs after the same ownership checks the record lookups apply.
#[derive(Clone)]
pub struct DocumentService<S> {
    store: S,
    donations: DonationRecorder<S>,
    tasks: VolunteerService<S>,
}

impl<S: Store> DocumentService<S> {
    pub fn new(store: S) -> Self {
        Self {
            donations: DonationRecorder::new(store.clone()),
            tasks: VolunteerService::new(store.clone()),
            store,
        }
    }

    /// Renders the receipt for a completed donation and flags it as issued.
    #[tracing::instrument(skip(self), fields(caller = %caller.user_id))]
    pub async fn receipt(&self, caller: &Caller, id: DonationId) -> Result<Document> {
        let donation = self.donations.issue_receipt(caller, id).await?;
        let donor = self
            .store
            .get_user(donation.donor)
            .await?
            .ok_or_else(|| DomainError::not_found("User", donation.donor))?;
        let campaign = self
            .store
            .get_campaign(donation.campaign)
            .await?
            .ok_or_else(|| DomainError::not_found("Campaign", donation.campaign))?;

        metrics::counter!("documents_rendered_total", "kind" => "receipt").increment(1);
        Ok(Document {
            filename: format!("receipt-{}.pdf", donation.transaction_id),
            bytes: render_receipt(&donation, &donor, &campaign),
        })
    }

    /// Renders the completion certificate for a task and flags it as issued.
    #[tracing::instrument(skip(self), fields(caller = %caller.user_id))]
    pub async fn certificate(&self, caller: &Caller, id: TaskId) -> Result<Document> {
        let task = self.tasks.issue_certificate(caller, id).await?;
        let volunteer = self
            .store
            .get_user(task.volunteer)
            .await?
            .ok_or_else(|| DomainError::not_found("User", task.volunteer))?;

        metrics::counter!("documents_rendered_total", "kind" => "certificate").increment(1);
        Ok(Document {
            filename: format!("certificate-{}.pdf", task.id),
            bytes: render_certificate(&task, &volunteer),
        })
    }
}
