use chrono::NaiveDate;

use crate::adder::Sequence;
use crate::errors::FactoryError;
use crate::records::{Opportunity, Payment};
use crate::store::{RecordSink, persist};

/// Payment amount used when a cohort asks for a payment without an amount.
pub const UNSET_PAYMENT_AMOUNT: i64 = -1;

const DEFAULT_STAGE: &str = "Prospecting";

/// Donor an opportunity hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityParent {
    Account { id: i64, name: String },
    Contact { id: i64, name: String },
}

impl OpportunityParent {
    pub fn name(&self) -> &str {
        match self {
            OpportunityParent::Account { name, .. } | OpportunityParent::Contact { name, .. } => {
                name
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentParams {
    pub amount: Option<i64>,
    pub paid: bool,
}

impl PaymentParams {
    pub fn new(amount: i64, paid: bool) -> Self {
        Self {
            amount: Some(amount),
            paid,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpportunityParams {
    pub parent: OpportunityParent,
    pub amount: i64,
    pub close_date: NaiveDate,
    /// Build a payment after the opportunity when set.
    pub payment: Option<PaymentParams>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentFactory {
    sequence: Sequence,
}

impl PaymentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a payment dated on the opportunity's close date.
    pub fn create(
        &self,
        opportunity: &Opportunity,
        params: &PaymentParams,
        sink: &mut dyn RecordSink,
    ) -> Result<Payment, FactoryError> {
        let payment_date = opportunity.close_date;
        let payment = Payment {
            id: self.sequence.next_id(),
            amount: params.amount.unwrap_or(UNSET_PAYMENT_AMOUNT),
            opportunity_id: opportunity.id,
            payment_date,
            scheduled_date: payment_date,
            paid: params.paid,
        };
        persist(sink, &payment)?;
        Ok(payment)
    }
}

#[derive(Debug, Clone)]
pub struct OpportunityFactory {
    sequence: Sequence,
    payments: PaymentFactory,
}

impl OpportunityFactory {
    pub fn new(payments: PaymentFactory) -> Self {
        Self {
            sequence: Sequence::new(),
            payments,
        }
    }

    pub fn create(
        &self,
        params: &OpportunityParams,
        sink: &mut dyn RecordSink,
    ) -> Result<(Opportunity, Option<Payment>), FactoryError> {
        let (account_id, primary_contact_id) = match &params.parent {
            OpportunityParent::Account { id, .. } => (Some(*id), None),
            OpportunityParent::Contact { id, .. } => (None, Some(*id)),
        };

        let opportunity = Opportunity {
            id: self.sequence.next_id(),
            name: format!("{} Donation", params.parent.name()),
            amount: params.amount,
            stage_name: DEFAULT_STAGE.to_string(),
            close_date: params.close_date,
            account_id,
            primary_contact_id,
        };
        persist(sink, &opportunity)?;

        let payment = match &params.payment {
            Some(payment) => Some(self.payments.create(&opportunity, payment, sink)?),
            None => None,
        };

        Ok((opportunity, payment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::start_date;
    use crate::store::MemoryStore;

    fn params(parent: OpportunityParent, payment: Option<PaymentParams>) -> OpportunityParams {
        OpportunityParams {
            parent,
            amount: 250,
            close_date: start_date(),
            payment,
        }
    }

    #[test]
    fn payment_inherits_close_date_and_opportunity_id() {
        let factory = OpportunityFactory::new(PaymentFactory::new());
        let mut store = MemoryStore::new();

        let (opportunity, payment) = factory
            .create(
                &params(
                    OpportunityParent::Account {
                        id: 7,
                        name: "Account 7".to_string(),
                    },
                    Some(PaymentParams::new(50, true)),
                ),
                &mut store,
            )
            .expect("create opportunity");

        assert_eq!(opportunity.name, "Account 7 Donation");
        assert_eq!(opportunity.account_id, Some(7));
        assert_eq!(opportunity.primary_contact_id, None);
        assert_eq!(opportunity.stage_name, "Prospecting");

        let payment = payment.expect("payment requested");
        assert_eq!(payment.opportunity_id, opportunity.id);
        assert_eq!(payment.payment_date, opportunity.close_date);
        assert_eq!(payment.scheduled_date, payment.payment_date);
        assert_eq!(payment.amount, 50);
        assert!(payment.paid);

        assert_eq!(store.len("opportunities"), 1);
        assert_eq!(store.len("payments"), 1);
    }

    #[test]
    fn payment_without_amount_uses_placeholder() {
        let factory = OpportunityFactory::new(PaymentFactory::new());
        let mut store = MemoryStore::new();

        let (_, payment) = factory
            .create(
                &params(
                    OpportunityParent::Contact {
                        id: 3,
                        name: "Contact 3".to_string(),
                    },
                    Some(PaymentParams {
                        amount: None,
                        paid: false,
                    }),
                ),
                &mut store,
            )
            .expect("create opportunity");

        assert_eq!(payment.map(|p| p.amount), Some(UNSET_PAYMENT_AMOUNT));
    }

    #[test]
    fn no_payment_unless_requested() {
        let factory = OpportunityFactory::new(PaymentFactory::new());
        let mut store = MemoryStore::new();

        let (opportunity, payment) = factory
            .create(
                &params(
                    OpportunityParent::Contact {
                        id: 3,
                        name: "Contact 3".to_string(),
                    },
                    None,
                ),
                &mut store,
            )
            .expect("create opportunity");

        assert_eq!(opportunity.primary_contact_id, Some(3));
        assert!(payment.is_none());
        assert_eq!(store.len("payments"), 0);
    }
}
