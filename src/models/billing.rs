use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Starter,
    Professional,
    Enterprise,
}

impl std::str::FromStr for PlanId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "starter" => Ok(PlanId::Starter),
            "professional" => Ok(PlanId::Professional),
            "enterprise" => Ok(PlanId::Enterprise),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Annual,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: String,
    pub monthly: Decimal,
    pub annual: Decimal,
    pub popular: bool,
    pub features: Vec<String>,
    pub limitations: Vec<String>,
}

impl Plan {
    pub fn price(&self, cycle: BillingCycle) -> Decimal {
        match cycle {
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Annual => self.annual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum PriceDisplay {
    Free,
    Monthly {
        #[serde(rename = "perMonth")]
        per_month: Decimal,
    },
    Annual {
        #[serde(rename = "perMonth")]
        per_month: Decimal,
        #[serde(rename = "billedYearly")]
        billed_yearly: Decimal,
    },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlanOffer {
    #[serde(flatten)]
    pub plan: Plan,
    pub display: PriceDisplay,
    /// Absent for free plans.
    pub savings: Option<PlanSavings>,
}

/// What paying annually saves against twelve monthly payments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PlanSavings {
    pub amount: Decimal,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingHistory {
    pub invoices: Vec<Invoice>,
    pub total_invoices: usize,
    pub total_spent: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Plan id as sent by the client; unknown ids are rejected at checkout.
    pub plan: String,
    #[serde(default)]
    pub cycle: BillingCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    pub order_number: Option<String>,
    pub plan: Option<PlanId>,
    pub cycle: Option<BillingCycle>,
    pub amount: Option<Decimal>,
    pub redirect: String,
}
