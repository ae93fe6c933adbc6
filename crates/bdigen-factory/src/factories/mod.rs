//! Record builders bound to a mapping.
//!
//! Each builder owns an id [`Sequence`](crate::Sequence) and persists what it
//! builds into a [`RecordSink`](crate::RecordSink). Builders that create
//! related records (an account's opportunity, an opportunity's payment) do so
//! after the parent has been persisted.

mod data_import;
mod donor;
mod opportunity;

pub use data_import::{DataImportFactory, DataImportParams, DataImportScope};
pub use donor::{AccountFactory, ContactFactory, Donation, DonorParams};
pub use opportunity::{
    OpportunityFactory, OpportunityParams, OpportunityParent, PaymentFactory, PaymentParams,
};

use bdigen_core::BoundSchema;
use chrono::{Days, NaiveDate};

use crate::adder::Adder;
use crate::errors::FactoryError;
use crate::records::{Account, Contact, DataImport, Opportunity, Payment, Record};

/// First date handed out by date adders.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default()
}

/// `start_date() + (adder.next(1) - 1)` days.
pub fn next_date(adder: &Adder) -> Result<NaiveDate, FactoryError> {
    let offset = adder.next(1) - 1;
    let start = start_date();
    let date = if offset >= 0 {
        start.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        start.checked_sub_days(Days::new(offset.unsigned_abs()))
    };
    date.ok_or_else(|| {
        FactoryError::InvalidParams(format!("date offset {offset} is out of range"))
    })
}

/// Named bundle of record builders for one schema binding.
///
/// Sequences and default adders are scoped to the bundle: two bundles built
/// from the same binding number their records independently.
#[derive(Debug, Clone)]
pub struct Factories {
    pub accounts: AccountFactory,
    pub contacts: ContactFactory,
    pub opportunities: OpportunityFactory,
    pub payments: PaymentFactory,
    pub data_imports: DataImportFactory,
}

impl Factories {
    /// Check that the binding carries every table and column the builders
    /// populate, then wire the builders together.
    pub fn new(schema: &BoundSchema) -> Result<Self, FactoryError> {
        schema.require(Account::TABLE, Account::COLUMNS)?;
        schema.require(Contact::TABLE, Contact::COLUMNS)?;
        schema.require(Opportunity::TABLE, Opportunity::COLUMNS)?;
        schema.require(Payment::TABLE, Payment::COLUMNS)?;
        schema.require(DataImport::TABLE, DataImport::COLUMNS)?;

        let payments = PaymentFactory::new();
        let opportunities = OpportunityFactory::new(payments.clone());

        Ok(Self {
            accounts: AccountFactory::new(opportunities.clone()),
            contacts: ContactFactory::new(opportunities.clone()),
            opportunities,
            payments,
            data_imports: DataImportFactory::new(),
        })
    }
}
