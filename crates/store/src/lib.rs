//! Persistence layer for the charity platform.
//!
//! One async trait per record type ([`CampaignStore`], [`DonationStore`], ...)
//! plus the [`Store`] umbrella trait, implemented by [`InMemoryStore`] for
//! tests and local runs and by [`PostgresStore`] for production.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use query::{BeneficiaryQuery, DonationQuery, TaskQuery};
pub use store::{
    BeneficiaryStore, CampaignStore, DonationStore, NotificationStore, Store, TaskStore, UserStore,
};
