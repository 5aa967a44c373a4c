//! Premium entitlement derived from subscription status and order history.

use serde::Serialize;

use crate::types::{Order, PaymentStatus, Subscription, SubscriptionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    pub fn label(self) -> &'static str {
        match self {
            Self::Free => "Free User",
            Self::Premium => "Premium User",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitlementSnapshot {
    pub is_premium: bool,
    pub plan: Plan,
}

impl EntitlementSnapshot {
    pub fn compute(subscription: Option<&Subscription>, orders: &[Order]) -> Self {
        Self::from_premium(is_premium(
            subscription.map(|s| s.subscription_status),
            orders.iter().map(|o| o.payment_status),
        ))
    }

    fn from_premium(is_premium: bool) -> Self {
        Self {
            is_premium,
            plan: if is_premium { Plan::Premium } else { Plan::Free },
        }
    }
}

impl Default for EntitlementSnapshot {
    fn default() -> Self {
        Self::from_premium(false)
    }
}

/// Active or trialing subscription, or any paid order.
pub fn is_premium(
    status: Option<SubscriptionStatus>,
    payments: impl IntoIterator<Item = PaymentStatus>,
) -> bool {
    matches!(
        status,
        Some(SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    ) || payments.into_iter().any(|p| p == PaymentStatus::Paid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(status: PaymentStatus) -> Order {
        Order {
            order_id: 1,
            checkout_session_id: "cs_test".to_string(),
            payment_status: status,
            amount_total: 299,
            currency: "gbp".to_string(),
            order_date: Utc::now(),
        }
    }

    fn subscription(status: SubscriptionStatus) -> Subscription {
        Subscription {
            subscription_status: status,
            price_id: None,
            current_period_end: None,
            cancel_at_period_end: false,
        }
    }

    #[test]
    fn nothing_means_free() {
        assert!(!is_premium(None, []));
        assert_eq!(EntitlementSnapshot::compute(None, &[]).plan, Plan::Free);
    }

    #[test]
    fn trialing_or_active_is_premium() {
        assert!(is_premium(Some(SubscriptionStatus::Trialing), []));
        assert!(is_premium(Some(SubscriptionStatus::Active), []));
        assert!(!is_premium(Some(SubscriptionStatus::Canceled), []));
        assert!(!is_premium(Some(SubscriptionStatus::PastDue), []));
    }

    #[test]
    fn any_paid_order_is_premium() {
        assert!(is_premium(None, [PaymentStatus::Paid]));
        let orders = vec![order(PaymentStatus::Unpaid), order(PaymentStatus::Paid)];
        let snapshot = EntitlementSnapshot::compute(
            Some(&subscription(SubscriptionStatus::NotStarted)),
            &orders,
        );
        assert!(snapshot.is_premium);
        assert_eq!(snapshot.plan.label(), "Premium User");
    }

    #[test]
    fn unpaid_orders_do_not_count() {
        let orders = vec![order(PaymentStatus::Unpaid), order(PaymentStatus::NoPaymentRequired)];
        assert!(!EntitlementSnapshot::compute(None, &orders).is_premium);
    }
}
