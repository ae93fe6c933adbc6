use crate::adder::{Adder, Sequence};
use crate::errors::FactoryError;
use crate::factories::next_date;
use crate::factories::opportunity::{
    OpportunityFactory, OpportunityParams, OpportunityParent, PaymentParams,
};
use crate::records::{Account, Contact, Opportunity, Payment};
use crate::store::{RecordSink, persist};

const ACCOUNT_RECORD_TYPE: &str = "Organization";

/// Parameters shared by every donor in an account or contact cohort.
#[derive(Debug, Clone)]
pub struct DonorParams {
    pub opportunity_amount: i64,
    /// Payment attached to the donor's opportunity; `None` builds none.
    pub payment: Option<PaymentParams>,
    /// Close dates advance one day per donor drawn from this adder.
    pub opportunity_date_adder: Adder,
}

impl DonorParams {
    /// Parameters with a fresh close date adder of their own.
    pub fn new(opportunity_amount: i64) -> Self {
        Self {
            opportunity_amount,
            payment: None,
            opportunity_date_adder: Adder::default(),
        }
    }

    pub fn with_payment(mut self, amount: i64, paid: bool) -> Self {
        self.payment = Some(PaymentParams::new(amount, paid));
        self
    }
}

/// A donor together with the records built for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation<D> {
    pub donor: D,
    pub opportunity: Opportunity,
    pub payment: Option<Payment>,
}

fn donate(
    opportunities: &OpportunityFactory,
    parent: OpportunityParent,
    params: &DonorParams,
    sink: &mut dyn RecordSink,
) -> Result<(Opportunity, Option<Payment>), FactoryError> {
    let close_date = next_date(&params.opportunity_date_adder)?;
    opportunities.create(
        &OpportunityParams {
            parent,
            amount: params.opportunity_amount,
            close_date,
            payment: params.payment,
        },
        sink,
    )
}

#[derive(Debug, Clone)]
pub struct AccountFactory {
    sequence: Sequence,
    opportunities: OpportunityFactory,
}

impl AccountFactory {
    pub fn new(opportunities: OpportunityFactory) -> Self {
        Self {
            sequence: Sequence::new(),
            opportunities,
        }
    }

    pub fn create(
        &self,
        params: &DonorParams,
        sink: &mut dyn RecordSink,
    ) -> Result<Donation<Account>, FactoryError> {
        let id = self.sequence.next_id();
        let account = Account {
            id,
            name: format!("Account {id}"),
            record_type: ACCOUNT_RECORD_TYPE.to_string(),
        };
        persist(sink, &account)?;

        let parent = OpportunityParent::Account {
            id,
            name: account.name.clone(),
        };
        let (opportunity, payment) = donate(&self.opportunities, parent, params, sink)?;

        Ok(Donation {
            donor: account,
            opportunity,
            payment,
        })
    }

    pub fn create_batch(
        &self,
        count: usize,
        params: &DonorParams,
        sink: &mut dyn RecordSink,
    ) -> Result<Vec<Donation<Account>>, FactoryError> {
        let mut built = Vec::with_capacity(count);
        for _ in 0..count {
            built.push(self.create(params, sink)?);
        }
        Ok(built)
    }
}

#[derive(Debug, Clone)]
pub struct ContactFactory {
    sequence: Sequence,
    opportunities: OpportunityFactory,
}

impl ContactFactory {
    pub fn new(opportunities: OpportunityFactory) -> Self {
        Self {
            sequence: Sequence::new(),
            opportunities,
        }
    }

    pub fn create(
        &self,
        params: &DonorParams,
        sink: &mut dyn RecordSink,
    ) -> Result<Donation<Contact>, FactoryError> {
        let id = self.sequence.next_id();
        let contact = Contact {
            id,
            name: format!("Contact {id}"),
        };
        persist(sink, &contact)?;

        let parent = OpportunityParent::Contact {
            id,
            name: contact.name.clone(),
        };
        let (opportunity, payment) = donate(&self.opportunities, parent, params, sink)?;

        Ok(Donation {
            donor: contact,
            opportunity,
            payment,
        })
    }

    pub fn create_batch(
        &self,
        count: usize,
        params: &DonorParams,
        sink: &mut dyn RecordSink,
    ) -> Result<Vec<Donation<Contact>>, FactoryError> {
        let mut built = Vec::with_capacity(count);
        for _ in 0..count {
            built.push(self.create(params, sink)?);
        }
        Ok(built)
    }
}
