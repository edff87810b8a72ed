//! Shared setup for handler tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapters::{InMemoryDirectory, InMemoryInforequestRepository, RecordingTransport};
use crate::domain::foundation::{ApplicantId, InforequestId, ObligeeId};
use crate::domain::inforequest::{Applicant, Inforequest, Jurisdiction, Obligee, ReplyAddressTemplate};
use crate::ports::InforequestRepository;

use super::inforequest::{SubmitInforequestCommand, SubmitInforequestHandler};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn obligee(name: &str, email: &str) -> Obligee {
    Obligee {
        id: ObligeeId::new(),
        name: name.to_string(),
        street: "Hlavná 1".to_string(),
        city: "Košice".to_string(),
        zip: "040 01".to_string(),
        emails: vec![email.to_string()],
    }
}

pub(crate) struct Fixture {
    pub repo: Arc<InMemoryInforequestRepository>,
    pub directory: Arc<InMemoryDirectory>,
    pub transport: Arc<RecordingTransport>,
    pub jurisdiction: Arc<Jurisdiction>,
    pub applicant: Applicant,
    pub obligees: Vec<Obligee>,
}

impl Fixture {
    pub async fn new() -> Self {
        let applicant = Applicant {
            id: ApplicantId::new(),
            name: "Peter Malý".to_string(),
            street: "Krátka 3".to_string(),
            city: "Trnava".to_string(),
            zip: "917 01".to_string(),
            email: "peter@example.org".to_string(),
        };
        let obligees = vec![
            obligee("Mesto Košice", "podatelna@kosice.sk"),
            obligee("Okresný úrad Košice", "ou@kosice.sk"),
            obligee("Košický kraj", "kraj@vucke.sk"),
            obligee("Ministerstvo vnútra", "podatelna@minv.sk"),
        ];
        let directory = InMemoryDirectory::new();
        directory.insert_applicant(applicant.clone()).await;
        for o in &obligees {
            directory.insert_obligee(o.clone()).await;
        }
        Self {
            repo: Arc::new(InMemoryInforequestRepository::new()),
            directory: Arc::new(directory),
            transport: Arc::new(RecordingTransport::new()),
            jurisdiction: Arc::new(Jurisdiction::slovak()),
            applicant,
            obligees,
        }
    }

    pub fn template() -> ReplyAddressTemplate {
        ReplyAddressTemplate::new("{token}@mail.example.org").unwrap()
    }

    /// Submits an inforequest to the first obligee on `on`.
    pub async fn submitted(&self, on: NaiveDate) -> Inforequest {
        let handler = SubmitInforequestHandler::new(
            self.repo.clone(),
            self.directory.clone(),
            self.transport.clone(),
            Self::template(),
        );
        let result = handler
            .handle(SubmitInforequestCommand {
                applicant_id: self.applicant.id,
                obligee_id: self.obligees[0].id,
                subject: "Žiadosť o informácie".to_string(),
                content: "Prosím o zmluvy za rok 2010.".to_string(),
                attachments: None,
                submitted_on: on,
            })
            .await
            .unwrap();
        result.inforequest
    }

    pub async fn load(&self, id: InforequestId) -> Inforequest {
        self.repo.find_by_id(&id).await.unwrap().unwrap()
    }
}
