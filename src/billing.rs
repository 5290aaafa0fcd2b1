//! Plan pricing, invoice history and the simulated checkout.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::AppError;
use crate::models::{
    BillingCycle, BillingHistory, CheckoutRequest, Invoice, InvoiceStatus, PaymentOutcome,
    PaymentStatus, Plan, PlanId, PlanOffer, PlanSavings, PriceDisplay,
};

pub const SUCCESS_REDIRECT: &str = "/payment-success";
pub const CANCEL_REDIRECT: &str = "/payment-cancelled";

const ORDER_PREFIX: &str = "SS";
const ORDER_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ORDER_SUFFIX_LEN: usize = 9;

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn price_display(plan: &Plan, cycle: BillingCycle) -> PriceDisplay {
    let price = plan.price(cycle);
    if price.is_zero() {
        return PriceDisplay::Free;
    }
    match cycle {
        BillingCycle::Monthly => PriceDisplay::Monthly { per_month: price },
        BillingCycle::Annual => PriceDisplay::Annual {
            per_month: round_half_up(price / Decimal::from(12)),
            billed_yearly: price,
        },
    }
}

pub fn annual_savings(plan: &Plan) -> Option<PlanSavings> {
    if plan.annual.is_zero() {
        return None;
    }
    let yearly_at_monthly = plan.monthly * Decimal::from(12);
    if yearly_at_monthly.is_zero() {
        return None;
    }
    let amount = yearly_at_monthly - plan.annual;
    let percentage = round_half_up(amount / yearly_at_monthly * Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0);
    Some(PlanSavings { amount, percentage })
}

pub fn offers(plans: Vec<Plan>, cycle: BillingCycle) -> Vec<PlanOffer> {
    plans
        .into_iter()
        .map(|plan| PlanOffer {
            display: price_display(&plan, cycle),
            savings: annual_savings(&plan),
            plan,
        })
        .collect()
}

/// `"all"` or a four digit year.
pub fn parse_period(period: &str) -> Result<Option<i32>, AppError> {
    if period.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    if period.len() != 4 {
        return Err(AppError::InvalidQuery(format!("unknown period `{period}`")));
    }
    period
        .parse()
        .map(Some)
        .map_err(|_| AppError::InvalidQuery(format!("unknown period `{period}`")))
}

/// `"all"` or one of the invoice statuses.
pub fn parse_status(status: &str) -> Result<Option<InvoiceStatus>, AppError> {
    match status.to_ascii_lowercase().as_str() {
        "all" => Ok(None),
        "paid" => Ok(Some(InvoiceStatus::Paid)),
        "pending" => Ok(Some(InvoiceStatus::Pending)),
        "failed" => Ok(Some(InvoiceStatus::Failed)),
        "refunded" => Ok(Some(InvoiceStatus::Refunded)),
        _ => Err(AppError::InvalidQuery(format!("unknown status `{status}`"))),
    }
}

/// Sum of paid invoice totals.
pub fn total_spent(invoices: &[Invoice]) -> Decimal {
    invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Paid)
        .map(|i| i.total)
        .sum()
}

/// Filters the history; `total_spent` always covers the full history.
pub fn history(
    invoices: Vec<Invoice>,
    year: Option<i32>,
    status: Option<InvoiceStatus>,
) -> BillingHistory {
    use chrono::Datelike;

    let total_invoices = invoices.len();
    let total_spent = total_spent(&invoices);
    let invoices = invoices
        .into_iter()
        .filter(|i| year.map_or(true, |y| i.date.year() == y))
        .filter(|i| status.map_or(true, |s| i.status == s))
        .collect();

    BillingHistory {
        invoices,
        total_invoices,
        total_spent,
    }
}

pub fn order_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| ORDER_ALPHABET[rng.gen_range(0..ORDER_ALPHABET.len())] as char)
        .collect();
    format!("{ORDER_PREFIX}{suffix}")
}

/// Receipt for a paid plan. The starter plan is free and cannot be bought.
pub fn checkout<R: Rng + ?Sized>(
    plans: &[Plan],
    request: &CheckoutRequest,
    rng: &mut R,
) -> Result<PaymentOutcome, AppError> {
    let id: PlanId = request.plan.parse().map_err(|_| AppError::UnknownPlan)?;
    if id == PlanId::Starter {
        return Err(AppError::UnknownPlan);
    }
    let plan = plans
        .iter()
        .find(|p| p.id == id)
        .ok_or(AppError::UnknownPlan)?;

    Ok(PaymentOutcome {
        status: PaymentStatus::Success,
        order_number: Some(order_number(rng)),
        plan: Some(plan.id),
        cycle: Some(request.cycle),
        amount: Some(plan.price(request.cycle)),
        redirect: SUCCESS_REDIRECT.to_string(),
    })
}

pub fn cancelled() -> PaymentOutcome {
    PaymentOutcome {
        status: PaymentStatus::Cancelled,
        order_number: None,
        plan: None,
        cycle: None,
        amount: None,
        redirect: CANCEL_REDIRECT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mock_data;

    fn plan(id: PlanId) -> Plan {
        mock_data::plans().into_iter().find(|p| p.id == id).unwrap()
    }

    #[test]
    fn display_per_cycle() {
        let starter = plan(PlanId::Starter);
        assert_eq!(price_display(&starter, BillingCycle::Annual), PriceDisplay::Free);

        let pro = plan(PlanId::Professional);
        assert_eq!(
            price_display(&pro, BillingCycle::Monthly),
            PriceDisplay::Monthly {
                per_month: Decimal::new(29, 0)
            }
        );
        assert_eq!(
            price_display(&pro, BillingCycle::Annual),
            PriceDisplay::Annual {
                per_month: Decimal::new(24, 0),
                billed_yearly: Decimal::new(290, 0)
            }
        );
    }

    #[test]
    fn annual_enterprise_rounds_half_up() {
        let enterprise = plan(PlanId::Enterprise);
        match price_display(&enterprise, BillingCycle::Annual) {
            PriceDisplay::Annual { per_month, .. } => assert_eq!(per_month, Decimal::new(83, 0)),
            other => panic!("unexpected display {other:?}"),
        }
    }

    #[test]
    fn savings_for_paid_plans_only() {
        assert_eq!(annual_savings(&plan(PlanId::Starter)), None);
        let pro = annual_savings(&plan(PlanId::Professional)).unwrap();
        assert_eq!(pro.amount, Decimal::new(58, 0));
        assert_eq!(pro.percentage, 17);
        let enterprise = annual_savings(&plan(PlanId::Enterprise)).unwrap();
        assert_eq!(enterprise.amount, Decimal::new(198, 0));
        assert_eq!(enterprise.percentage, 17);
    }

    #[test]
    fn total_spent_counts_paid_only() {
        assert_eq!(total_spent(&mock_data::billing_history()), Decimal::new(9396, 2));
    }

    #[test]
    fn history_filters_by_year_and_status() {
        let all = history(mock_data::billing_history(), None, None);
        assert_eq!(all.invoices.len(), 5);

        let y2024 = history(mock_data::billing_history(), Some(2024), None);
        assert_eq!(y2024.invoices.len(), 2);
        assert_eq!(y2024.total_invoices, 5);
        assert_eq!(y2024.total_spent, Decimal::new(9396, 2));

        let refunded = history(
            mock_data::billing_history(),
            None,
            Some(InvoiceStatus::Refunded),
        );
        assert_eq!(refunded.invoices.len(), 1);
        assert_eq!(refunded.invoices[0].id, "INV-2024-011");

        let none = history(mock_data::billing_history(), Some(2025), Some(InvoiceStatus::Failed));
        assert!(none.invoices.is_empty());
    }

    #[test]
    fn query_values_parse() {
        assert_eq!(parse_period("all").unwrap(), None);
        assert_eq!(parse_period("2025").unwrap(), Some(2025));
        assert!(parse_period("last-month").is_err());
        assert_eq!(parse_status("Paid").unwrap(), Some(InvoiceStatus::Paid));
        assert!(parse_status("void").is_err());
    }

    #[test]
    fn checkout_issues_receipt() {
        let mut rng = StdRng::seed_from_u64(7);
        let request = CheckoutRequest {
            plan: "enterprise".to_string(),
            cycle: BillingCycle::Annual,
        };
        let outcome = checkout(&mock_data::plans(), &request, &mut rng).unwrap();

        assert_eq!(outcome.status, PaymentStatus::Success);
        assert_eq!(outcome.amount, Some(Decimal::new(990, 0)));
        assert_eq!(outcome.redirect, SUCCESS_REDIRECT);
        let order = outcome.order_number.unwrap();
        assert_eq!(order.len(), 11);
        assert!(order.starts_with("SS"));
        assert!(order[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn only_paid_plans_can_be_bought() {
        let mut rng = StdRng::seed_from_u64(7);
        for plan in ["starter", "platinum", ""] {
            let request = CheckoutRequest {
                plan: plan.to_string(),
                cycle: BillingCycle::Monthly,
            };
            assert!(matches!(
                checkout(&mock_data::plans(), &request, &mut rng),
                Err(AppError::UnknownPlan)
            ));
        }
    }

    #[test]
    fn cancel_redirects_without_receipt() {
        let outcome = cancelled();
        assert_eq!(outcome.status, PaymentStatus::Cancelled);
        assert!(outcome.order_number.is_none());
        assert_eq!(outcome.redirect, CANCEL_REDIRECT);
    }
}
