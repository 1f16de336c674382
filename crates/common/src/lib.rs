//! Shared types for the charity platform.
//!
//! Every crate in the workspace speaks in terms of these records: typed
//! identifiers, [`Money`], caller [`Role`]s and the persisted entities
//! (campaigns, donations, notifications, users, volunteer tasks and
//! beneficiary applications).

#[macro_use]
mod macros;

pub mod beneficiary;
pub mod campaign;
pub mod donation;
pub mod notification;
pub mod types;
pub mod user;
pub mod volunteer;

pub use beneficiary::{AidType, Beneficiary, BeneficiaryStatus};
pub use campaign::{Campaign, CampaignCategory, CampaignStatus};
pub use donation::{Donation, DonationStatus, PaymentDetails, PaymentMethod};
pub use notification::{EntityType, Notification, NotificationChannel, RelatedEntity};
pub use types::{
    BeneficiaryId, CampaignId, DonationId, Money, NotificationId, ParseEnumError, Role, TaskId,
    UserId, timestamp_now,
};
pub use user::User;
pub use volunteer::{TaskStatus, TaskUpdate, VolunteerTask};
