use chrono::NaiveDate;
use serde::Serialize;

use crate::value::{FieldValue, Row};

/// A built record that knows which table and columns it lands in.
pub trait Record {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn to_row(&self) -> Row;
}

fn row<const N: usize>(values: [(&str, FieldValue); N]) -> Row {
    values
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub record_type: String,
}

impl Record for Account {
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &["id", "name", "record_type"];

    fn to_row(&self) -> Row {
        row([
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
            ("record_type", self.record_type.as_str().into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
}

impl Record for Contact {
    const TABLE: &'static str = "contacts";
    const COLUMNS: &'static [&'static str] = &["id", "name"];

    fn to_row(&self) -> Row {
        row([("id", self.id.into()), ("name", self.name.as_str().into())])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub stage_name: String,
    pub close_date: NaiveDate,
    pub account_id: Option<i64>,
    pub primary_contact_id: Option<i64>,
}

impl Record for Opportunity {
    const TABLE: &'static str = "opportunities";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "amount",
        "stage_name",
        "close_date",
        "account_id",
        "primary_contact__c",
    ];

    fn to_row(&self) -> Row {
        row([
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
            ("amount", self.amount.into()),
            ("stage_name", self.stage_name.as_str().into()),
            ("close_date", self.close_date.into()),
            ("account_id", self.account_id.into()),
            ("primary_contact__c", self.primary_contact_id.into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: i64,
    pub amount: i64,
    pub opportunity_id: i64,
    pub payment_date: NaiveDate,
    pub scheduled_date: NaiveDate,
    pub paid: bool,
}

impl Record for Payment {
    const TABLE: &'static str = "payments";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "amount",
        "npe01__opportunity__c",
        "payment_date",
        "scheduled_date",
        "paid",
    ];

    fn to_row(&self) -> Row {
        row([
            ("id", self.id.into()),
            ("amount", self.amount.into()),
            ("npe01__opportunity__c", self.opportunity_id.into()),
            ("payment_date", self.payment_date.into()),
            ("scheduled_date", self.scheduled_date.into()),
            ("paid", self.paid.into()),
        ])
    }
}

/// Which donor slot of a staging row carries the donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DonationDonor {
    Account1,
    Contact1,
}

impl DonationDonor {
    pub fn as_str(self) -> &'static str {
        match self {
            DonationDonor::Account1 => "Account1",
            DonationDonor::Contact1 => "Contact1",
        }
    }
}

/// Staging row awaiting the batch data import matching process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataImport {
    pub id: i64,
    pub donation_date: NaiveDate,
    pub donation_amount: i64,
    pub donation_donor: DonationDonor,
    pub do_not_create_payment: bool,
    pub qualified_date: Option<NaiveDate>,
    pub account1_name: Option<String>,
    pub contact1_lastname: Option<String>,
}

impl Record for DataImport {
    const TABLE: &'static str = "npsp__DataImport__c";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "npsp__Donation_Date__c",
        "npsp__Donation_Amount__c",
        "npsp__Donation_Donor__c",
        "npsp__Do_Not_Automatically_Create_Payment__c",
        "npsp__Qualified_Date__c",
        "npsp__Account1_Name__c",
        "npsp__Contact1_Lastname__c",
    ];

    fn to_row(&self) -> Row {
        // The import process reads this checkbox as an upper-case literal.
        let do_not_create = if self.do_not_create_payment {
            "TRUE"
        } else {
            "FALSE"
        };
        row([
            ("id", self.id.into()),
            ("npsp__Donation_Date__c", self.donation_date.into()),
            ("npsp__Donation_Amount__c", self.donation_amount.into()),
            ("npsp__Donation_Donor__c", self.donation_donor.as_str().into()),
            (
                "npsp__Do_Not_Automatically_Create_Payment__c",
                do_not_create.into(),
            ),
            ("npsp__Qualified_Date__c", self.qualified_date.into()),
            ("npsp__Account1_Name__c", self.account1_name.clone().into()),
            (
                "npsp__Contact1_Lastname__c",
                self.contact1_lastname.clone().into(),
            ),
        ])
    }
}
