use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StripeProduct {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct StripePrice {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn currency(&self) -> &str {
        self.config.currency.as_deref().unwrap_or("usd")
    }

    pub fn success_url(&self) -> &str {
        self.config
            .success_url
            .as_deref()
            .unwrap_or("http://localhost:8080/payment/success")
    }

    pub fn cancel_url(&self) -> &str {
        self.config
            .cancel_url
            .as_deref()
            .unwrap_or("http://localhost:8080/payment/cancel")
    }

    pub async fn create_product(&self, name: &str, description: &str) -> AppResult<StripeProduct> {
        let url = "https://api.stripe.com/v1/products";

        let params = [
            ("name", name.to_string()),
            ("description", description.to_string()),
        ];

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            let product: StripeProduct = response.json().await?;
            Ok(product)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create Stripe product: {error_text}"
            )))
        }
    }

    /// amount 单位为分
    pub async fn create_price(&self, product_id: &str, amount: i64) -> AppResult<StripePrice> {
        let url = "https://api.stripe.com/v1/prices";

        let params = [
            ("product", product_id.to_string()),
            ("unit_amount", amount.to_string()),
            ("currency", self.currency().to_string()),
        ];

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            let price: StripePrice = response.json().await?;
            Ok(price)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create Stripe price: {error_text}"
            )))
        }
    }

    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        metadata: &[(&str, String)],
    ) -> AppResult<StripeCheckoutSession> {
        let url = "https://api.stripe.com/v1/checkout/sessions";

        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "payment_method_types[]".to_string(),
                "card".to_string(),
            ),
            ("line_items[0][price]".to_string(), price_id.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), self.success_url().to_string()),
            ("cancel_url".to_string(), self.cancel_url().to_string()),
        ];
        for (key, value) in metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            let session: StripeCheckoutSession = response.json().await?;
            Ok(session)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create Stripe checkout session: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_service_creation() {
        let config = StripeConfig {
            secret_key: "sk_test_123".to_string(),
            currency: None,
            success_url: None,
            cancel_url: None,
        };
        let service = StripeService::new(config);
        assert_eq!(service.currency(), "usd");
        assert!(service.success_url().contains("/payment/success"));
    }
}
