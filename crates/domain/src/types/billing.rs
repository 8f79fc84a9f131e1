//! Billing group models: plans, subscriptions, invoices and payment methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_wire_enum_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl_wire_enum_conversions!(PlanTier {
    Free => "free",
    Starter => "starter",
    Pro => "pro",
    Enterprise => "enterprise",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Incomplete,
    Inactive,
}

impl_wire_enum_conversions!(SubscriptionState {
    Active => "active",
    Trialing => "trialing",
    PastDue => "past_due",
    Canceled => "canceled",
    Incomplete => "incomplete",
    Inactive => "inactive",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub tier: PlanTier,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub price_monthly: f64,
    #[serde(default)]
    pub price_id: Option<String>,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub features: Vec<String>,
    #[serde(default)]
    pub api_call_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub plan_tier: PlanTier,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Where to send the browser to finish payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct CheckoutSession {
    pub checkout_url: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct SubscriptionStatus {
    pub status: SubscriptionState,
    pub plan_tier: PlanTier,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub cancel_at_period_end: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub current_period_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactivateRequest {
    pub plan_tier: PlanTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRequest {
    pub new_tier: PlanTier,
    pub price_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Invoice {
    pub id: String,
    /// Amount in the smallest currency unit
    pub amount_due: i64,
    pub currency: String,
    pub status: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hosted_invoice_url: Option<String>,
}

/// Xano paging envelope; accepts both snake_case and Xano's camelCase keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct InvoicePage {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub items: Vec<Invoice>,
    #[serde(default, alias = "curPage")]
    pub page: u32,
    #[serde(default, alias = "nextPage")]
    pub next_page: Option<u32>,
    #[serde(default, alias = "itemsTotal")]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PaymentMethod {
    pub id: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRequest {
    pub payment_method_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ToolUsage {
    pub tool_name: String,
    pub calls: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct UsageReport {
    pub api_calls: u64,
    #[serde(default)]
    pub api_call_limit: Option<u64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub period_start: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub period_end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub by_tool: Vec<ToolUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct QuotaStatus {
    pub used: u64,
    /// `None` for unlimited plans
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub exceeded: bool,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub percent_used: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn invoice_page_accepts_xano_paging_keys() {
        let page: InvoicePage = serde_json::from_value(json!({
            "items": [{"id": "in_1", "amount_due": 1900, "currency": "usd", "status": "paid"}],
            "curPage": 2,
            "nextPage": 3,
            "itemsTotal": 41
        }))
        .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.next_page, Some(3));
        assert_eq!(page.total, 41);
        assert_eq!(page.items[0].amount_due, 1900);
    }

    #[test]
    fn subscription_state_uses_snake_case() {
        let status: SubscriptionStatus =
            serde_json::from_value(json!({"status": "past_due", "plan_tier": "pro"})).unwrap();
        assert_eq!(status.status, SubscriptionState::PastDue);
        assert_eq!(status.plan_tier, PlanTier::Pro);
        assert_eq!(status.status.to_string(), "past_due");
    }

    #[test]
    fn unknown_tier_fails_fast() {
        let result = serde_json::from_value::<Plan>(json!({"id": 1, "name": "X", "tier": "gold"}));
        assert!(result.is_err());
    }

    #[test]
    fn cancel_without_reason_sends_empty_object() {
        assert_eq!(serde_json::to_value(CancelRequest::default()).unwrap(), json!({}));
    }
}
