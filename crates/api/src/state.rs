//! Shared application state.

use std::sync::Arc;

use domain::{
    BeneficiaryService, CampaignService, DonationRecorder, NotificationService, UserService,
    VolunteerService,
};
use reporting::{AnalyticsService, DocumentService};
use store::Store;
use tokio::task::JoinHandle;
use workflow::{
    DonationCoordinator, EmailSender, LoggingEmailSender, LoggingSmsSender, NotificationDispatcher,
    SimulatedPaymentGateway, SmsSender,
};

/// Services every handler reaches through `State<Arc<AppState<S>>>`.
pub struct AppState<S: Store> {
    pub campaigns: CampaignService<S>,
    pub donations: DonationRecorder<S>,
    pub coordinator: DonationCoordinator<S, SimulatedPaymentGateway>,
    pub notifications: NotificationService<S>,
    pub users: UserService<S>,
    pub volunteers: VolunteerService<S>,
    pub beneficiaries: BeneficiaryService<S>,
    pub analytics: AnalyticsService<S>,
    pub documents: DocumentService<S>,
    pub email: Arc<dyn EmailSender>,
    pub sms: Arc<dyn SmsSender>,
    pub store: S,
}

impl<S: Store> AppState<S> {
    /// Wires the services over `store` and spawns the notification
    /// dispatcher worker, whose handle is returned alongside the state.
    pub fn new(
        store: S,
        gateway: SimulatedPaymentGateway,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        queue_capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (dispatcher, worker) = NotificationDispatcher::spawn(
            NotificationService::new(store.clone()),
            email.clone(),
            sms.clone(),
            queue_capacity,
        );

        let state = Self {
            campaigns: CampaignService::new(store.clone()),
            donations: DonationRecorder::new(store.clone()),
            coordinator: DonationCoordinator::new(store.clone(), gateway, dispatcher),
            notifications: NotificationService::new(store.clone()),
            users: UserService::new(store.clone()),
            volunteers: VolunteerService::new(store.clone()),
            beneficiaries: BeneficiaryService::new(store.clone()),
            analytics: AnalyticsService::new(store.clone()),
            documents: DocumentService::new(store.clone()),
            email,
            sms,
            store,
        };
        (state, worker)
    }

    /// State with logging e-mail and SMS senders.
    pub fn with_logging_senders(
        store: S,
        gateway: SimulatedPaymentGateway,
        queue_capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        Self::new(
            store,
            gateway,
            Arc::new(LoggingEmailSender::new()),
            Arc::new(LoggingSmsSender::new()),
            queue_capacity,
        )
    }
}
