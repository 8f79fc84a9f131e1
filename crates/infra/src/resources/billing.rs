//! Billing group: plans, subscriptions, invoices, payment methods and quota

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};
use xanodash_domain::constants::{DEFAULT_INVOICE_PAGE, DEFAULT_INVOICE_PAGE_SIZE};
use xanodash_domain::{
    ApiGroup, CancelRequest, CheckoutSession, DeleteResponse, InvoicePage, PaymentMethod,
    PaymentMethodRequest, Plan, PlanTier, QuotaStatus, ReactivateRequest, SubscribeRequest,
    SubscriptionStatus, UpgradeRequest, UsageReport, WebhookAck,
};

use super::query_path;
use crate::api::{ApiClient, ApiError, RequestOptions};

/// Façade over the billing API group
#[derive(Clone)]
pub struct BillingApi {
    client: Arc<ApiClient>,
}

impl BillingApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // === Plans and subscription ===

    /// Public plan catalogue
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn plans(&self) -> Result<Vec<Plan>, ApiError> {
        let plans: Vec<Plan> = self
            .client
            .request(ApiGroup::Billing, "/billing/plans", RequestOptions::get().public())
            .await?;

        debug!(count = plans.len(), "Plans loaded");
        Ok(plans)
    }

    /// Start a checkout session for `request.plan_tier`
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, request), fields(plan_tier = %request.plan_tier))]
    pub async fn subscribe(&self, request: &SubscribeRequest) -> Result<CheckoutSession, ApiError> {
        let options = RequestOptions::json(Method::POST, request)?;
        self.client.request(ApiGroup::Billing, "/billing/subscribe", options).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn subscription(&self) -> Result<SubscriptionStatus, ApiError> {
        self.client.request(ApiGroup::Billing, "/billing/subscription", RequestOptions::get()).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, reason))]
    pub async fn cancel(&self, reason: Option<&str>) -> Result<SubscriptionStatus, ApiError> {
        let request = CancelRequest { reason: reason.map(str::to_string) };
        let options = RequestOptions::json(Method::POST, &request)?;
        let status: SubscriptionStatus =
            self.client.request(ApiGroup::Billing, "/billing/cancel", options).await?;

        info!(status = %status.status, "Subscription cancellation requested");
        Ok(status)
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn reactivate(&self, plan_tier: PlanTier) -> Result<SubscriptionStatus, ApiError> {
        let options = RequestOptions::json(Method::POST, &ReactivateRequest { plan_tier })?;
        self.client.request(ApiGroup::Billing, "/billing/reactivate", options).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn upgrade(
        &self,
        new_tier: PlanTier,
        price_id: &str,
    ) -> Result<SubscriptionStatus, ApiError> {
        let request = UpgradeRequest { new_tier, price_id: price_id.to_string() };
        let options = RequestOptions::json(Method::POST, &request)?;
        self.client.request(ApiGroup::Billing, "/billing/upgrade", options).await
    }

    // === Invoices and payment methods ===

    /// One page of invoices, newest first
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn invoices(&self, page: u32, per_page: u32) -> Result<InvoicePage, ApiError> {
        let path = query_path(
            "/billing/invoices",
            &[("page", Some(page.to_string())), ("per_page", Some(per_page.to_string()))],
        );
        self.client.request(ApiGroup::Billing, &path, RequestOptions::get()).await
    }

    /// First page of invoices with the default page size
    ///
    /// # Errors
    /// See [`BillingApi::invoices`].
    pub async fn first_invoices(&self) -> Result<InvoicePage, ApiError> {
        self.invoices(DEFAULT_INVOICE_PAGE, DEFAULT_INVOICE_PAGE_SIZE).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        self.client
            .request(ApiGroup::Billing, "/billing/payment-methods", RequestOptions::get())
            .await
    }

    /// Attach a payment method created by the payment provider's frontend SDK
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn add_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, ApiError> {
        let request = PaymentMethodRequest { payment_method_id: payment_method_id.to_string() };
        let options = RequestOptions::json(Method::POST, &request)?;
        self.client.request(ApiGroup::Billing, "/billing/payment-methods/add", options).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn delete_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<DeleteResponse, ApiError> {
        let request = PaymentMethodRequest { payment_method_id: payment_method_id.to_string() };
        let options = RequestOptions::json(Method::DELETE, &request)?;
        self.client.request(ApiGroup::Billing, "/billing/payment-methods/delete", options).await
    }

    // === Usage ===

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn usage(&self) -> Result<UsageReport, ApiError> {
        self.client.request(ApiGroup::Billing, "/billing/usage", RequestOptions::get()).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn quota_status(&self) -> Result<QuotaStatus, ApiError> {
        self.client.request(ApiGroup::Billing, "/billing/quota-status", RequestOptions::get()).await
    }

    /// Forward a payment-provider event to the backend. Public endpoint; the
    /// backend verifies the event signature itself.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, event))]
    pub async fn relay_webhook(&self, event: &Value) -> Result<WebhookAck, ApiError> {
        let options = RequestOptions::json(Method::POST, event)?.public();
        self.client.request(ApiGroup::Billing, "/billing/webhook", options).await
    }
}
