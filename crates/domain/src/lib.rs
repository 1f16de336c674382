//! Domain layer for the charity platform.
//!
//! This crate holds the rules that sit between the HTTP surface and the
//! store:
//! - [`CampaignLedger`] keeps campaign totals with an atomic increment
//! - [`DonationRecorder`] persists donation attempts and enforces donor ownership
//! - campaign, user, notification, volunteer and beneficiary services
//! - [`Caller`] role and ownership checks shared by all of them

pub mod beneficiary;
pub mod caller;
pub mod campaign;
pub mod donation;
pub mod error;
pub mod ledger;
pub mod notification;
pub mod user;
pub mod volunteer;

pub use beneficiary::{AidDistribution, BeneficiaryApplication, BeneficiaryService, ReviewDecision};
pub use caller::Caller;
pub use campaign::{CampaignService, CampaignUpdate, NewCampaign};
pub use donation::{DonationRecorder, RecordDonation};
pub use error::{DomainError, Result};
pub use ledger::CampaignLedger;
pub use notification::{NOTIFICATION_PAGE, NewNotification, NotificationService};
pub use user::{NewUser, UserService, UserUpdate};
pub use volunteer::{NewTask, TaskStatusChange, VolunteerService};
