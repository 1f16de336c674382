//! Background fan-out of donation side effects.
//!
//! The orchestrator hands a [`DispatchJob`] to the dispatcher and returns
//! without waiting. A single worker task drains a bounded channel and, for
//! each job, sends the email receipt, the SMS receipt and the in-app
//! notification concurrently. Each side effect may fail on its own; failures
//! are logged and counted, never retried and never reported to the donor.

use std::sync::Arc;

use common::{Donation, EntityType, NotificationChannel, RelatedEntity, User};
use domain::{NewNotification, NotificationService};
use store::NotificationStore;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::services::{EmailMessage, EmailSender, SmsMessage, SmsSender};

/// Default number of jobs the channel buffers before new jobs are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Everything needed to announce one completed donation.
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub donation: Donation,
    pub donor: User,
    pub campaign_title: String,
}

enum Command {
    Dispatch(Box<DispatchJob>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the dispatcher worker. Cheap to clone.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Command>,
}

impl NotificationDispatcher {
    /// Spawns the worker task and returns a handle to it.
    ///
    /// The worker exits once every handle has been dropped and the queue is
    /// drained.
    pub fn spawn<S>(
        notifications: NotificationService<S>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>)
    where
        S: NotificationStore + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = Worker {
            notifications,
            email,
            sms,
        };
        let handle = tokio::spawn(worker.run(rx));
        (Self { tx }, handle)
    }

    /// Queues a job without waiting. Returns false if the job was dropped
    /// because the queue is full or the worker has stopped.
    pub fn enqueue(&self, job: DispatchJob) -> bool {
        let donation = job.donation.id;
        match self.tx.try_send(Command::Dispatch(Box::new(job))) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                metrics::counter!("notification_jobs_dropped_total", "reason" => "queue_full")
                    .increment(1);
                tracing::warn!(%donation, "notification queue full, dropping job");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                metrics::counter!("notification_jobs_dropped_total", "reason" => "closed")
                    .increment(1);
                tracing::warn!(%donation, "notification worker stopped, dropping job");
                false
            }
        }
    }

    /// Waits until every job queued before this call has been processed.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }
}

struct Worker<S> {
    notifications: NotificationService<S>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl<S: NotificationStore> Worker<S> {
    async fn run(self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Dispatch(job) => self.deliver(*job).await,
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        tracing::debug!("notification dispatcher stopped");
    }

    #[tracing::instrument(skip(self, job), fields(donation = %job.donation.id))]
    async fn deliver(&self, job: DispatchJob) {
        let DispatchJob {
            donation,
            donor,
            campaign_title,
        } = job;
        let amount = donation.amount;
        let txn = donation.transaction_id.as_str();

        let email = self.email.send(EmailMessage {
            to: donor.email.clone(),
            subject: "Donation Receipt".to_string(),
            body: format!(
                "Thank you for your donation of {amount} to {campaign_title}. Transaction ID: {txn}"
            ),
        });

        let sms = async {
            match donor.phone_on_file() {
                Some(phone) => self
                    .sms
                    .send(SmsMessage {
                        to: phone.to_string(),
                        body: format!("Thank you for donating {amount}. TrxID: {txn}."),
                    })
                    .await
                    .map(|()| true),
                None => Ok(false),
            }
        };

        let notification = self.notifications.notify(NewNotification {
            user: donation.donor,
            channel: NotificationChannel::Email,
            title: "Donation Successful".to_string(),
            message: format!(
                "Thank you for your donation of {amount} to {campaign_title}. Your transaction ID is {txn}."
            ),
            related_entity: Some(RelatedEntity::new(EntityType::Donation, donation.id)),
        });

        let (email, sms, notification) = tokio::join!(email, sms, notification);

        if let Err(e) = email {
            record_failure("email", &e);
        }
        match sms {
            Ok(true) => {}
            Ok(false) => tracing::debug!("donor has no phone on file, sms skipped"),
            Err(e) => record_failure("sms", &e),
        }
        if let Err(e) = notification {
            record_failure("in_app", &e);
        }
    }
}

fn record_failure(channel: &'static str, error: &dyn std::fmt::Display) {
    metrics::counter!("notification_dispatch_failures_total", "channel" => channel).increment(1);
    tracing::warn!(channel, error = %error, "donation side effect failed");
}
