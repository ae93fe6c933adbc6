use chrono::NaiveDate;
use tracing::info;

use crate::adder::Adder;
use crate::attribute::Attribute;
use crate::errors::FactoryError;
use crate::factories::{DataImportParams, DataImportScope, DonorParams, Factories};
use crate::model::CohortReport;
use crate::records::{Account, Contact, DataImport, DonationDonor, Record};
use crate::store::RecordSink;

/// Opportunity amount plus the optional (payment amount, paid) pair.
type DonorCohort = (i64, Option<(i64, bool)>);

const ACCOUNT_COHORTS: [DonorCohort; 5] = [
    (100, Some((100, false))),
    (200, Some((200, false))),
    (300, Some((50, false))),
    (400, Some((50, true))),
    (500, None),
];

const CONTACT_COHORTS: [DonorCohort; 5] = [
    (600, Some((600, false))),
    (700, Some((700, false))),
    (800, Some((50, false))),
    (900, Some((50, true))),
    (1000, None),
];

/// Donation amount and whether the row carries a qualified date.
type ImportCohort = (i64, bool);

const UNMATCHED_ACCOUNT_IMPORTS: [ImportCohort; 5] =
    [(100, false), (200, true), (50, false), (400, false), (500, false)];

const UNMATCHED_CONTACT_IMPORTS: [ImportCohort; 5] =
    [(600, false), (700, true), (50, false), (900, false), (1000, false)];

/// Donation amount and whether the import should skip creating a payment.
type MatchingCohort = (i64, bool);

const MATCHING_ACCOUNT_IMPORTS: [MatchingCohort; 2] = [(100, false), (200, true)];
const MATCHING_CONTACT_IMPORTS: [MatchingCohort; 2] = [(300, false), (400, true)];

fn qualified_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

/// Batch driver producing the fixed cohort layout for a run.
///
/// A run of `num_records` builds ten donor cohorts and ten unmatched staging
/// cohorts of `num_records / 10` each, then four matching staging cohorts of
/// `num_records / 4` each.
#[derive(Debug, Clone, Copy)]
pub struct DataFactory {
    num_records: u64,
}

impl DataFactory {
    pub fn new(num_records: u64) -> Self {
        Self { num_records }
    }

    pub fn small_batch(&self) -> usize {
        (self.num_records / 10) as usize
    }

    pub fn matching_batch(&self) -> usize {
        (self.num_records / 4) as usize
    }

    /// Run every phase in order and report the cohorts it built.
    pub fn generate(
        &self,
        factories: &Factories,
        sink: &mut dyn RecordSink,
    ) -> Result<Vec<CohortReport>, FactoryError> {
        let mut cohorts = Vec::new();

        let batch = self.small_batch();
        info!(event = "phase_started", phase = "preexisting", batch_size = batch);
        cohorts.extend(make_preexisting_records(batch, factories, sink)?);

        info!(event = "phase_started", phase = "unmatched_imports", batch_size = batch);
        cohorts.extend(make_unmatched_import_records(batch, factories, sink)?);

        let batch = self.matching_batch();
        info!(event = "phase_started", phase = "matching_imports", batch_size = batch);
        cohorts.extend(make_matching_import_records(batch, factories, sink)?);

        Ok(cohorts)
    }
}

fn donor_params((amount, payment): DonorCohort) -> DonorParams {
    let params = DonorParams::new(amount);
    match payment {
        Some((payment_amount, paid)) => params.with_payment(payment_amount, paid),
        None => params,
    }
}

/// Accounts and contacts that already exist before any import runs, each
/// with one opportunity and, for most cohorts, one payment. Every cohort
/// gets its own close date adder, so close dates restart at the start date.
pub fn make_preexisting_records(
    batch: usize,
    factories: &Factories,
    sink: &mut dyn RecordSink,
) -> Result<Vec<CohortReport>, FactoryError> {
    let mut cohorts = Vec::new();

    for cohort in ACCOUNT_COHORTS {
        let built = factories
            .accounts
            .create_batch(batch, &donor_params(cohort), sink)?;
        cohorts.push(CohortReport::new(
            format!("preexisting.account.{}", cohort.0),
            Account::TABLE,
            built.len(),
        ));
    }

    for cohort in CONTACT_COHORTS {
        let built = factories
            .contacts
            .create_batch(batch, &donor_params(cohort), sink)?;
        cohorts.push(CohortReport::new(
            format!("preexisting.contact.{}", cohort.0),
            Contact::TABLE,
            built.len(),
        ));
    }

    Ok(cohorts)
}

fn shared_account_name(scope: &DataImportScope) -> String {
    format!("Account {}", scope.account_adder.next(1))
}

fn shared_contact_name(scope: &DataImportScope) -> String {
    format!("Contact {}", scope.contact_adder.next(1))
}

/// Staging rows named from the factory's own counters; they line up with
/// the pre-existing donors by name but not by amount.
pub fn make_unmatched_import_records(
    batch: usize,
    factories: &Factories,
    sink: &mut dyn RecordSink,
) -> Result<Vec<CohortReport>, FactoryError> {
    let mut cohorts = Vec::new();

    let layout = UNMATCHED_ACCOUNT_IMPORTS
        .iter()
        .map(|cohort| (DonationDonor::Account1, *cohort))
        .chain(
            UNMATCHED_CONTACT_IMPORTS
                .iter()
                .map(|cohort| (DonationDonor::Contact1, *cohort)),
        );

    for (donor, (amount, qualified)) in layout {
        let mut params = DataImportParams::new(amount, donor);
        params = match donor {
            DonationDonor::Account1 => {
                params.with_account_name(Attribute::derived(shared_account_name))
            }
            DonationDonor::Contact1 => {
                params.with_contact_lastname(Attribute::derived(shared_contact_name))
            }
        };
        if qualified {
            params = params.qualified_on(qualified_date());
        }

        let built = factories.data_imports.create_batch(batch, &params, sink)?;
        cohorts.push(CohortReport::new(
            format!("unmatched.{}.{amount}", donor.as_str().to_lowercase()),
            DataImport::TABLE,
            built.len(),
        ));
    }

    Ok(cohorts)
}

/// Staging rows drawn from fresh counters shared by a pair of cohorts, so
/// the pair together numbers `1..=2 * batch`.
pub fn make_matching_import_records(
    batch: usize,
    factories: &Factories,
    sink: &mut dyn RecordSink,
) -> Result<Vec<CohortReport>, FactoryError> {
    let mut cohorts = Vec::new();

    let account_adder = Adder::default();
    for (amount, skip_payment) in MATCHING_ACCOUNT_IMPORTS {
        let mut params = DataImportParams::new(amount, DonationDonor::Account1)
            .with_account_adder(account_adder.clone())
            .with_account_name(Attribute::derived(|scope: &DataImportScope| {
                format!("Account{}", scope.account_adder.next(1))
            }));
        if skip_payment {
            params = params.without_automatic_payment();
        }
        let built = factories.data_imports.create_batch(batch, &params, sink)?;
        cohorts.push(CohortReport::new(
            format!("matching.account1.{amount}"),
            DataImport::TABLE,
            built.len(),
        ));
    }

    let contact_adder = Adder::default();
    for (amount, skip_payment) in MATCHING_CONTACT_IMPORTS {
        let mut params = DataImportParams::new(amount, DonationDonor::Contact1)
            .with_contact_adder(contact_adder.clone())
            .with_contact_lastname(Attribute::derived(|scope: &DataImportScope| {
                format!("Contact{}", scope.contact_adder.next(1))
            }));
        if skip_payment {
            params = params.without_automatic_payment();
        }
        let built = factories.data_imports.create_batch(batch, &params, sink)?;
        cohorts.push(CohortReport::new(
            format!("matching.contact1.{amount}"),
            DataImport::TABLE,
            built.len(),
        ));
    }

    Ok(cohorts)
}
