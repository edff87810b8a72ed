//! The scheduled job contract and the per-candidate driver every job shares.
//!
//! A run scans the open inforequests and treats each one as its own unit:
//! reload, re-check the guard, apply the effect, persist with a version check,
//! and only then hand mail to the transport. A failing candidate is logged and
//! counted; its siblings are still processed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, ErrorCode, InforequestId, Timestamp};
use crate::domain::inforequest::{Applicant, Inforequest, Jurisdiction, Mailbox};
use crate::ports::{IdentityProvider, InforequestRepository, MessageTransport, OutboundEmail};

/// The instant a run is evaluated at. Jobs never read the clock themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobContext {
    pub today: NaiveDate,
    pub now: Timestamp,
}

impl JobContext {
    pub fn new(today: NaiveDate, now: Timestamp) -> Self {
        Self { today, now }
    }

    /// Context for the current wall-clock instant.
    pub fn current() -> Self {
        let now = Timestamp::now();
        Self {
            today: now.local_date(),
            now,
        }
    }

    /// Context at `hour:minute` local time on `today`.
    pub fn at_local(today: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        Timestamp::from_local(today, hour, minute).map(|now| Self { today, now })
    }
}

/// Counters for one run of one job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Open inforequests looked at.
    pub examined: usize,
    /// Candidates whose effect was committed.
    pub fired: usize,
    /// Candidates with nothing due, or lost to a concurrent writer.
    pub skipped: usize,
    /// Candidates that raised an error before committing.
    pub failed: usize,
    /// Committed reminders the transport refused.
    pub undelivered: usize,
}

/// Ports and settings shared by the jobs.
#[derive(Clone)]
pub struct JobServices {
    pub repository: Arc<dyn InforequestRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub transport: Arc<dyn MessageTransport>,
    pub jurisdiction: Arc<Jurisdiction>,
    /// System sender of reminder mail.
    pub sender: Mailbox,
}

/// What a job needs to know about the applicant when it fires.
pub struct Recipient {
    pub mailbox: Mailbox,
}

impl Recipient {
    fn of(inforequest: &Inforequest, applicant: &Applicant) -> Self {
        Self {
            mailbox: Mailbox::named(inforequest.applicant().name.clone(), applicant.email.clone()),
        }
    }
}

/// A periodic, idempotent batch job.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &'static str;

    fn services(&self) -> &JobServices;

    /// Whether the job has something to do on a freshly loaded aggregate.
    fn is_due(&self, inforequest: &Inforequest, ctx: &JobContext) -> bool;

    /// Whether firing needs the applicant's current address.
    fn notifies_applicant(&self) -> bool {
        true
    }

    /// Applies the effect and its guard. Returns the mail to hand off once
    /// the change is committed.
    fn apply(
        &self,
        inforequest: &mut Inforequest,
        ctx: &JobContext,
        recipient: Option<&Recipient>,
    ) -> Result<Vec<OutboundEmail>, DomainError>;

    /// Runs the job at an explicit instant.
    async fn run_at(&self, ctx: &JobContext) -> Result<JobReport, DomainError> {
        drive(self, ctx).await
    }

    /// Runs the job now.
    async fn run(&self) -> Result<JobReport, DomainError> {
        self.run_at(&JobContext::current()).await
    }
}

enum Outcome {
    Fired { undelivered: usize },
    Skipped,
}

async fn drive<J: ScheduledJob + ?Sized>(job: &J, ctx: &JobContext) -> Result<JobReport, DomainError> {
    let services = job.services();
    let ids = services.repository.find_open_ids().await?;
    let mut report = JobReport::default();

    for id in ids {
        report.examined += 1;
        match process(job, ctx, id).await {
            Ok(Outcome::Fired { undelivered }) => {
                report.fired += 1;
                report.undelivered += undelivered;
            }
            Ok(Outcome::Skipped) => report.skipped += 1,
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    job = job.name(),
                    inforequest_id = %id,
                    "Concurrent change, retrying next run"
                );
                report.skipped += 1;
            }
            Err(e) => {
                tracing::error!(
                    job = job.name(),
                    inforequest_id = %id,
                    error = %e,
                    "Candidate failed"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        job = job.name(),
        examined = report.examined,
        fired = report.fired,
        skipped = report.skipped,
        failed = report.failed,
        undelivered = report.undelivered,
        "Job finished"
    );
    Ok(report)
}

async fn process<J: ScheduledJob + ?Sized>(
    job: &J,
    ctx: &JobContext,
    id: InforequestId,
) -> Result<Outcome, DomainError> {
    let services = job.services();
    let Some(mut inforequest) = services.repository.find_by_id(&id).await? else {
        return Ok(Outcome::Skipped);
    };
    if inforequest.is_closed() || !job.is_due(&inforequest, ctx) {
        tracing::debug!(job = job.name(), inforequest_id = %id, "Nothing due");
        return Ok(Outcome::Skipped);
    }

    let recipient = if job.notifies_applicant() {
        let applicant = services
            .identity
            .applicant(&inforequest.applicant_id())
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ApplicantNotFound, "Applicant not found")
                    .with_detail("applicant_id", inforequest.applicant_id().to_string())
            })?;
        Some(Recipient::of(&inforequest, &applicant))
    } else {
        None
    };

    let emails = job.apply(&mut inforequest, ctx, recipient.as_ref())?;
    services.repository.update(&inforequest).await?;
    tracing::info!(job = job.name(), inforequest_id = %id, emails = emails.len(), "Fired");

    let mut undelivered = 0;
    for email in &emails {
        if let Err(e) = services.transport.send(email).await {
            tracing::warn!(
                job = job.name(),
                inforequest_id = %id,
                error = %e,
                "Reminder not delivered, guard kept"
            );
            undelivered += 1;
        }
    }
    Ok(Outcome::Fired { undelivered })
}
