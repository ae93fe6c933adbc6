use chrono::NaiveDate;

use crate::adder::{Adder, Sequence};
use crate::attribute::Attribute;
use crate::errors::FactoryError;
use crate::factories::next_date;
use crate::records::{DataImport, DonationDonor};
use crate::store::{RecordSink, persist};

/// Values a derived staging-row attribute may read while the row is built.
#[derive(Debug, Clone)]
pub struct DataImportScope {
    pub id: i64,
    pub account_adder: Adder,
    pub contact_adder: Adder,
}

/// Parameters for a cohort of staging rows.
#[derive(Debug, Clone)]
pub struct DataImportParams {
    pub donation_amount: i64,
    pub donation_donor: DonationDonor,
    pub do_not_create_payment: bool,
    pub qualified_date: Option<NaiveDate>,
    pub account1_name: Option<Attribute<String, DataImportScope>>,
    pub contact1_lastname: Option<Attribute<String, DataImportScope>>,
    /// Donation dates advance one day per row drawn from this adder.
    pub date_adder: Adder,
    /// Overrides the factory's shared account name counter.
    pub account_adder: Option<Adder>,
    /// Overrides the factory's shared contact name counter.
    pub contact_adder: Option<Adder>,
}

impl DataImportParams {
    pub fn new(donation_amount: i64, donation_donor: DonationDonor) -> Self {
        Self {
            donation_amount,
            donation_donor,
            do_not_create_payment: false,
            qualified_date: None,
            account1_name: None,
            contact1_lastname: None,
            date_adder: Adder::default(),
            account_adder: None,
            contact_adder: None,
        }
    }

    pub fn with_account_name(mut self, name: Attribute<String, DataImportScope>) -> Self {
        self.account1_name = Some(name);
        self
    }

    pub fn with_contact_lastname(mut self, name: Attribute<String, DataImportScope>) -> Self {
        self.contact1_lastname = Some(name);
        self
    }

    pub fn qualified_on(mut self, date: NaiveDate) -> Self {
        self.qualified_date = Some(date);
        self
    }

    pub fn without_automatic_payment(mut self) -> Self {
        self.do_not_create_payment = true;
        self
    }

    pub fn with_account_adder(mut self, adder: Adder) -> Self {
        self.account_adder = Some(adder);
        self
    }

    pub fn with_contact_adder(mut self, adder: Adder) -> Self {
        self.contact_adder = Some(adder);
        self
    }
}

/// Builder for `npsp__DataImport__c` staging rows.
///
/// The default name counters live as long as the factory, so cohorts that do
/// not bring their own adders continue numbering where the previous one
/// stopped.
#[derive(Debug, Clone, Default)]
pub struct DataImportFactory {
    sequence: Sequence,
    account_adder: Adder,
    contact_adder: Adder,
}

impl DataImportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_adder(&self) -> &Adder {
        &self.account_adder
    }

    pub fn contact_adder(&self) -> &Adder {
        &self.contact_adder
    }

    pub fn create(
        &self,
        params: &DataImportParams,
        sink: &mut dyn RecordSink,
    ) -> Result<DataImport, FactoryError> {
        let scope = DataImportScope {
            id: self.sequence.next_id(),
            account_adder: params
                .account_adder
                .clone()
                .unwrap_or_else(|| self.account_adder.clone()),
            contact_adder: params
                .contact_adder
                .clone()
                .unwrap_or_else(|| self.contact_adder.clone()),
        };

        let record = DataImport {
            id: scope.id,
            donation_date: next_date(&params.date_adder)?,
            donation_amount: params.donation_amount,
            donation_donor: params.donation_donor,
            do_not_create_payment: params.do_not_create_payment,
            qualified_date: params.qualified_date,
            account1_name: params
                .account1_name
                .as_ref()
                .map(|name| name.resolve(&scope)),
            contact1_lastname: params
                .contact1_lastname
                .as_ref()
                .map(|name| name.resolve(&scope)),
        };
        persist(sink, &record)?;
        Ok(record)
    }

    pub fn create_batch(
        &self,
        count: usize,
        params: &DataImportParams,
        sink: &mut dyn RecordSink,
    ) -> Result<Vec<DataImport>, FactoryError> {
        let mut built = Vec::with_capacity(count);
        for _ in 0..count {
            built.push(self.create(params, sink)?);
        }
        Ok(built)
    }
}
