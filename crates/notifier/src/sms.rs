//! Twilio SMS notifier.

use std::error::Error as StdError;

use arb_core::{Notifier, Opportunity};
use async_trait::async_trait;
use common::{Error, Result};
use tracing::info;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so network failures (DNS/TLS/socket) are visible.
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

/// Twilio credentials and alert settings, read from the environment.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
    pub min_profit_threshold: f64,
}

impl SmsConfig {
    /// Load credentials from `TWILIO_*` / `NOTIFICATION_TO_NUMBER`
    /// environment variables. All four are required. The threshold is the
    /// merged bot config value, so live mode alerts on the same ratio the
    /// run logs.
    pub fn from_env(min_profit_threshold: f64) -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| Error::Config(format!("missing environment variable {}", name)))
        };
        Ok(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from_number: var("TWILIO_FROM_NUMBER")?,
            to_number: var("NOTIFICATION_TO_NUMBER")?,
            min_profit_threshold,
        })
    }
}

/// Sends one SMS per qualifying opportunity through the Twilio REST API.
#[derive(Debug, Clone)]
pub struct SmsNotifier {
    client: reqwest::Client,
    config: SmsConfig,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");
        Self { client, config }
    }

    fn message_body(opportunity: &Opportunity) -> String {
        format!(
            "Arbitrage opportunity!\n\
             Event: {}\n\
             Market: {}\n\
             Profit ratio: {:.2}\n\
             Toto odds: {:.2}\n\
             Kambi odds: {:.2}",
            opportunity.event_a,
            opportunity.market,
            opportunity.profit_ratio,
            opportunity.odds_a,
            opportunity.odds_b,
        )
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn min_profit_threshold(&self) -> f64 {
        self.config.min_profit_threshold
    }

    async fn notify(&self, opportunity: &Opportunity) -> Result<()> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        );
        let body = Self::message_body(opportunity);
        let params = [
            ("To", self.config.to_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Notify(format!(
                "Twilio returned {}: {}",
                status, body
            )));
        }

        info!(event = %opportunity.event_a, "SMS notification sent");
        Ok(())
    }
}
