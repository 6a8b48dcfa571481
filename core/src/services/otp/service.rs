//! OTP engine: send, resend and verify one-time pins.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::otp_config::{NotificationTemplate, OtpConfig};
use crate::domain::entities::otp_record::{OtpRecord, SendChannel, SendStatus};
use crate::errors::{GatewayError, OtpError, OtpResult};
use crate::repositories::config::OtpConfigProvider;
use crate::repositories::otp::OtpStorage;
use crate::repositories::person::PersonDirectory;

use super::config::OtpServiceConfig;
use super::generator::PinGenerator;
use super::settings::{OtpSettings, SettingsProvider, DEFAULT_SUBJECT_TEMPLATE};
use super::template::{self, PASSWORD, TOKEN, USERID};
use super::traits::{EmailGateway, SmsGateway};
use super::types::{
    ResendPinInput, SendPinInput, SendPinResponse, VerifyPinInput, VerifyPinResponse,
};

/// One-time-pin engine
///
/// Orchestrates secret generation, template rendering, gateway dispatch
/// and persisted issuance state. Dispatch is best-effort: a gateway
/// failure is recorded on the record, never raised to the caller. The
/// engine holds no mutable state of its own; settings are snapshotted at
/// the start of every call and the storage is the only shared resource.
pub struct OtpService<St, Sms, Em, Cf, Pd, Sp>
where
    St: OtpStorage,
    Sms: SmsGateway,
    Em: EmailGateway,
    Cf: OtpConfigProvider,
    Pd: PersonDirectory,
    Sp: SettingsProvider,
{
    storage: Arc<St>,
    sms_gateway: Arc<Sms>,
    email_gateway: Arc<Em>,
    config_provider: Arc<Cf>,
    person_directory: Arc<Pd>,
    settings_provider: Arc<Sp>,
    generator: PinGenerator,
    config: OtpServiceConfig,
}

impl<St, Sms, Em, Cf, Pd, Sp> OtpService<St, Sms, Em, Cf, Pd, Sp>
where
    St: OtpStorage,
    Sms: SmsGateway,
    Em: EmailGateway,
    Cf: OtpConfigProvider,
    Pd: PersonDirectory,
    Sp: SettingsProvider,
{
    /// Create a new engine with the default service configuration
    pub fn new(
        storage: Arc<St>,
        sms_gateway: Arc<Sms>,
        email_gateway: Arc<Em>,
        config_provider: Arc<Cf>,
        person_directory: Arc<Pd>,
        settings_provider: Arc<Sp>,
    ) -> Self {
        Self::with_config(
            storage,
            sms_gateway,
            email_gateway,
            config_provider,
            person_directory,
            settings_provider,
            OtpServiceConfig::default(),
        )
    }

    /// Create a new engine with an explicit service configuration
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        storage: Arc<St>,
        sms_gateway: Arc<Sms>,
        email_gateway: Arc<Em>,
        config_provider: Arc<Cf>,
        person_directory: Arc<Pd>,
        settings_provider: Arc<Sp>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            storage,
            sms_gateway,
            email_gateway,
            config_provider,
            person_directory,
            settings_provider,
            generator: PinGenerator::new(),
            config,
        }
    }

    /// Send a one-time pin
    ///
    /// Generates a secret for the channel, attempts dispatch with the
    /// default templates and persists the record. Dispatch failure is
    /// recorded on the record (`status = Failed`), the call still
    /// succeeds. With the global bypass set, dispatch is skipped and the
    /// record is saved with `status = Ignored`.
    pub async fn send_pin(&self, input: SendPinInput) -> OtpResult<SendPinResponse> {
        let settings = self.settings_provider.get().await?;

        if input.send_to.trim().is_empty() {
            return Err(OtpError::invalid_argument("sendTo must be specified"));
        }

        let secret = self.generator.secret_for(input.channel, &settings)?;
        let mut record = OtpRecord {
            operation_id: Uuid::new_v4(),
            secret,
            send_to: input.send_to,
            channel: input.channel,
            module_name: None,
            action_type: input.action_type,
            source_entity_id: None,
            recipient_id: input.recipient_id,
            recipient_type: input.recipient_type,
            sent_on: None,
            expires_on: Utc::now(),
            status: SendStatus::Ignored,
            error_message: None,
        };

        tracing::info!(
            operation_id = %record.operation_id,
            channel = ?record.channel,
            event = "otp_generated",
            "Generated new one-time pin"
        );

        if settings.ignore_otp_validation {
            record.status = SendStatus::Ignored;
            tracing::debug!(
                operation_id = %record.operation_id,
                event = "otp_dispatch_skipped",
                "Validation bypass active, skipping dispatch"
            );
        } else {
            record.sent_on = Some(Utc::now());
            match self.dispatch_with_defaults(&record, &settings).await {
                Ok(()) => record.status = SendStatus::Sent,
                Err(e) => {
                    record.status = SendStatus::Failed;
                    record.error_message = Some(e.to_string());
                    tracing::warn!(
                        operation_id = %record.operation_id,
                        error = %e,
                        event = "otp_dispatch_failed",
                        "Dispatch failed, outcome recorded on the record"
                    );
                }
            }
        }

        let lifetime = effective_lifetime(input.lifetime_secs, None, &settings);
        record.expires_on = Utc::now() + Duration::seconds(lifetime);

        let response = SendPinResponse {
            operation_id: record.operation_id,
            sent_to: record.send_to.clone(),
            module_name: None,
            action_type: record.action_type.clone(),
            source_entity_id: None,
        };
        self.storage.save(record).await?;
        Ok(response)
    }

    /// Send a one-time pin under a named configuration
    ///
    /// Fails with `InvalidConfiguration` before anything is generated or
    /// persisted when the config is unknown or its template is missing or
    /// disabled.
    pub async fn send_pin_with_config(
        &self,
        module: &str,
        config_name: &str,
        source_entity_id: Option<String>,
        send_to: &str,
    ) -> OtpResult<SendPinResponse> {
        let config = self.resolve_config(module, config_name).await?;
        if send_to.trim().is_empty() {
            return Err(OtpError::invalid_argument("sendTo must be specified"));
        }
        self.send_with_config(config, source_entity_id, send_to.to_string(), None)
            .await
    }

    /// Send a one-time pin to a person, resolving the destination from
    /// the person's contact record based on the config's channel
    pub async fn send_pin_to_person_with_config(
        &self,
        module: &str,
        config_name: &str,
        source_entity_id: Option<String>,
        person_id: Uuid,
    ) -> OtpResult<SendPinResponse> {
        let config = self.resolve_config(module, config_name).await?;
        let person = self
            .person_directory
            .find(person_id)
            .await?
            .ok_or_else(|| OtpError::not_found("Person"))?;
        let send_to = person.send_to_address(config.channel)?;
        self.send_with_config(config, source_entity_id, send_to, Some(person_id.to_string()))
            .await
    }

    async fn send_with_config(
        &self,
        config: OtpConfig,
        source_entity_id: Option<String>,
        send_to: String,
        recipient_id: Option<String>,
    ) -> OtpResult<SendPinResponse> {
        let settings = self.settings_provider.get().await?;

        // Template problems abort before any secret exists or state is written
        let template = config
            .enabled_template()
            .ok_or_else(|| {
                OtpError::invalid_configuration("Notification template is missing or disabled")
            })?
            .clone();

        let secret = self.generator.secret_for(config.channel, &settings)?;
        let mut record = OtpRecord {
            operation_id: Uuid::new_v4(),
            secret,
            send_to,
            channel: config.channel,
            module_name: Some(config.module.clone()),
            action_type: config.action_type.clone(),
            source_entity_id,
            recipient_id,
            recipient_type: config.recipient_type.clone(),
            sent_on: Some(Utc::now()),
            expires_on: Utc::now(),
            status: SendStatus::Ignored,
            error_message: None,
        };

        match self.dispatch_with_template(&record, &template).await {
            Ok(()) => record.status = SendStatus::Sent,
            Err(e) => {
                record.status = SendStatus::Failed;
                record.error_message = Some(e.to_string());
                tracing::warn!(
                    operation_id = %record.operation_id,
                    module = %config.module,
                    config = %config.name,
                    error = %e,
                    event = "otp_dispatch_failed",
                    "Config-driven dispatch failed, outcome recorded"
                );
            }
        }

        let lifetime = effective_lifetime(None, config.lifetime_secs, &settings);
        record.expires_on = Utc::now() + Duration::seconds(lifetime);

        let response = SendPinResponse {
            operation_id: record.operation_id,
            sent_to: record.send_to.clone(),
            module_name: record.module_name.clone(),
            action_type: record.action_type.clone(),
            source_entity_id: record.source_entity_id.clone(),
        };
        self.storage.save(record).await?;
        Ok(response)
    }

    /// Resend an existing one-time pin
    ///
    /// The record is located by operation id, falling back to the
    /// composite key. An expired record is not revived: the caller gets
    /// `Expired` and must request a fresh send. The global bypass does
    /// not apply here, a user-initiated resend always attempts dispatch.
    /// On success or failure the lifetime is always extended.
    pub async fn resend_pin(&self, input: ResendPinInput) -> OtpResult<SendPinResponse> {
        let settings = self.settings_provider.get().await?;
        let record = self.find_required(&input).await?;

        if record.is_expired() {
            return Err(OtpError::Expired);
        }

        let outcome = self.dispatch_with_defaults(&record, &settings).await;
        let lifetime = effective_lifetime(input.lifetime_secs, None, &settings);
        self.record_resend(&record, outcome, lifetime).await?;

        Ok(SendPinResponse {
            operation_id: record.operation_id,
            sent_to: record.send_to.clone(),
            module_name: record.module_name.clone(),
            action_type: record.action_type.clone(),
            source_entity_id: record.source_entity_id.clone(),
        })
    }

    /// Resend an existing one-time pin using a named configuration's
    /// template and lifetime
    pub async fn resend_pin_with_config(
        &self,
        input: ResendPinInput,
        module: &str,
        config_name: &str,
    ) -> OtpResult<SendPinResponse> {
        let settings = self.settings_provider.get().await?;
        let record = self.find_required(&input).await?;

        if record.is_expired() {
            return Err(OtpError::Expired);
        }

        let config = self.resolve_config(module, config_name).await?;
        let template = config
            .enabled_template()
            .ok_or_else(|| {
                OtpError::invalid_configuration("Notification template is missing or disabled")
            })?
            .clone();

        let outcome = self.dispatch_with_template(&record, &template).await;
        let lifetime = effective_lifetime(input.lifetime_secs, config.lifetime_secs, &settings);
        self.record_resend(&record, outcome, lifetime).await?;

        Ok(SendPinResponse {
            operation_id: record.operation_id,
            sent_to: record.send_to.clone(),
            module_name: record.module_name.clone(),
            action_type: record.action_type.clone(),
            source_entity_id: record.source_entity_id.clone(),
        })
    }

    /// Verify a presented pin or link token
    ///
    /// Wrong pin and expiry come back as a failed payload, not an error.
    /// Mismatch is checked before expiry, and a successful verification
    /// does not consume the record: re-checks of a still-valid secret
    /// keep succeeding until natural expiry.
    pub async fn verify_pin(&self, input: VerifyPinInput) -> OtpResult<VerifyPinResponse> {
        let settings = self.settings_provider.get().await?;
        if settings.ignore_otp_validation {
            tracing::debug!(
                event = "otp_verify_bypassed",
                "Validation bypass active, verification skipped"
            );
            return Ok(VerifyPinResponse::success());
        }

        let record = match self.find_record(&input.operation_id, &input.module_name, &input.action_type, &input.source_entity_id).await? {
            Some(record) => record,
            None => {
                return Ok(VerifyPinResponse::failed(
                    "No one-time pin found for the supplied keys",
                ))
            }
        };

        Ok(Self::validate(&record, &input.pin))
    }

    /// Verify a presented pin under a named configuration
    ///
    /// In addition to [`verify_pin`](Self::verify_pin) semantics, a
    /// missing record raises `NotFound` and a missing or disabled
    /// template raises `InvalidConfiguration`.
    pub async fn verify_pin_with_config(
        &self,
        input: VerifyPinInput,
        module: &str,
        config_name: &str,
    ) -> OtpResult<VerifyPinResponse> {
        let settings = self.settings_provider.get().await?;

        let record = self
            .find_record(&input.operation_id, &input.module_name, &input.action_type, &input.source_entity_id)
            .await?
            .ok_or_else(|| OtpError::not_found("Otp"))?;

        let config = self.resolve_config(module, config_name).await?;
        if config.enabled_template().is_none() {
            return Err(OtpError::invalid_configuration(
                "Notification template is missing or disabled",
            ));
        }

        if settings.ignore_otp_validation {
            return Ok(VerifyPinResponse::success());
        }

        Ok(Self::validate(&record, &input.pin))
    }

    /// Fetch a record by operation id
    pub async fn get(&self, operation_id: Uuid) -> OtpResult<Option<OtpRecord>> {
        self.storage.get_by_operation_id(operation_id).await
    }

    /// Fetch the newest record matching the composite key
    pub async fn get_with_composite_key(
        &self,
        module_name: &str,
        action_type: &str,
        source_entity_id: &str,
    ) -> OtpResult<Option<OtpRecord>> {
        if module_name.is_empty() {
            return Err(OtpError::invalid_argument(
                "moduleName is required to get an Otp item",
            ));
        }
        if action_type.is_empty() {
            return Err(OtpError::invalid_argument(
                "actionType is required to get an Otp item",
            ));
        }
        self.storage
            .get_by_composite_key(module_name, action_type, source_entity_id)
            .await
    }

    /// Current settings snapshot
    pub async fn get_settings(&self) -> OtpResult<OtpSettings> {
        self.settings_provider.get().await
    }

    /// Replace the settings, effective for subsequent calls
    pub async fn update_settings(&self, settings: OtpSettings) -> OtpResult<()> {
        self.settings_provider.set(settings).await
    }

    // Validation sequence shared by both verify paths. Mismatch is
    // checked before expiry so an altered secret never reports Expired.
    fn validate(record: &OtpRecord, presented: &str) -> VerifyPinResponse {
        if !record.matches(presented) {
            let message = match record.channel {
                SendChannel::EmailLink => "Invalid email link",
                SendChannel::Sms | SendChannel::Email => "Wrong one time pin",
            };
            return VerifyPinResponse::failed(message);
        }

        if record.is_expired() {
            let message = match record.channel {
                SendChannel::EmailLink => "The link you have supplied has expired",
                SendChannel::Sms | SendChannel::Email => {
                    "One-time pin has expired, try to send a new one"
                }
            };
            return VerifyPinResponse::failed(message);
        }

        tracing::info!(
            operation_id = %record.operation_id,
            event = "otp_verified",
            "One-time pin successfully verified"
        );
        VerifyPinResponse::success()
    }

    // Writes the resend outcome, then extends the lifetime in a second
    // update so the record is never left half-written.
    async fn record_resend(
        &self,
        record: &OtpRecord,
        outcome: Result<(), GatewayError>,
        lifetime_secs: i64,
    ) -> OtpResult<()> {
        let sent_on = Utc::now();
        let operation_id = record.operation_id;

        match outcome {
            Ok(()) => {
                self.storage
                    .update(
                        operation_id,
                        Box::new(move |r| {
                            r.sent_on = Some(sent_on);
                            r.status = SendStatus::Sent;
                            r.error_message = None;
                        }),
                    )
                    .await?;
            }
            Err(e) => {
                tracing::warn!(
                    operation_id = %operation_id,
                    error = %e,
                    event = "otp_dispatch_failed",
                    "Resend dispatch failed, outcome recorded"
                );
                let message = e.to_string();
                self.storage
                    .update(
                        operation_id,
                        Box::new(move |r| {
                            r.sent_on = Some(sent_on);
                            r.status = SendStatus::Failed;
                            r.error_message = Some(message);
                        }),
                    )
                    .await?;
            }
        }

        let new_expires_on: DateTime<Utc> = Utc::now() + Duration::seconds(lifetime_secs);
        self.storage
            .update(
                operation_id,
                Box::new(move |r| {
                    r.expires_on = new_expires_on;
                }),
            )
            .await
    }

    async fn resolve_config(&self, module: &str, name: &str) -> OtpResult<OtpConfig> {
        self.config_provider
            .resolve(module, name)
            .await?
            .ok_or_else(|| OtpError::invalid_configuration(format!("Invalid OTP config: {}/{}", module, name)))
    }

    async fn find_record(
        &self,
        operation_id: &Option<Uuid>,
        module_name: &Option<String>,
        action_type: &Option<String>,
        source_entity_id: &Option<String>,
    ) -> OtpResult<Option<OtpRecord>> {
        if let Some(id) = operation_id {
            if let Some(record) = self.storage.get_by_operation_id(*id).await? {
                return Ok(Some(record));
            }
        }
        if let (Some(module), Some(action), Some(source)) =
            (module_name, action_type, source_entity_id)
        {
            return self.storage.get_by_composite_key(module, action, source).await;
        }
        Ok(None)
    }

    async fn find_required(&self, input: &ResendPinInput) -> OtpResult<OtpRecord> {
        self.find_record(
            &input.operation_id,
            &input.module_name,
            &input.action_type,
            &input.source_entity_id,
        )
        .await?
        .ok_or_else(|| OtpError::not_found("Otp"))
    }

    // Dispatch using the process-wide default templates.
    async fn dispatch_with_defaults(
        &self,
        record: &OtpRecord,
        settings: &OtpSettings,
    ) -> Result<(), GatewayError> {
        match record.channel {
            SendChannel::Sms => {
                let body =
                    template::render(&settings.default_body_template, &[(PASSWORD, &record.secret)]);
                self.bounded(self.sms_gateway.send_sms(&record.send_to, &body))
                    .await
            }
            SendChannel::Email => {
                let body =
                    template::render(&settings.default_body_template, &[(PASSWORD, &record.secret)]);
                let subject = template::render(
                    &settings.default_subject_template,
                    &[(PASSWORD, &record.secret)],
                );
                self.bounded(
                    self.email_gateway
                        .send_email(&record.send_to, &subject, &body, false),
                )
                .await
            }
            SendChannel::EmailLink => {
                let userid = record.recipient_id.clone().unwrap_or_default();
                let body = template::render(
                    &settings.default_email_body_template,
                    &[(TOKEN, &record.secret), (USERID, &userid)],
                );
                self.bounded(self.email_gateway.send_email(
                    &record.send_to,
                    &settings.default_email_subject_template,
                    &body,
                    true,
                ))
                .await
            }
        }
    }

    // Dispatch using a config-supplied template.
    async fn dispatch_with_template(
        &self,
        record: &OtpRecord,
        template: &NotificationTemplate,
    ) -> Result<(), GatewayError> {
        let body = template::render(&template.body, &[(PASSWORD, &record.secret)]);
        let subject = template::render(
            template.subject.as_deref().unwrap_or(DEFAULT_SUBJECT_TEMPLATE),
            &[(PASSWORD, &record.secret)],
        );

        match record.channel {
            SendChannel::Sms => {
                self.bounded(self.sms_gateway.send_sms(&record.send_to, &body))
                    .await
            }
            SendChannel::Email => {
                self.bounded(
                    self.email_gateway
                        .send_email(&record.send_to, &subject, &body, false),
                )
                .await
            }
            SendChannel::EmailLink => {
                let userid = record.recipient_id.clone().unwrap_or_default();
                let body =
                    template::render(&body, &[(TOKEN, &record.secret), (USERID, &userid)]);
                self.bounded(
                    self.email_gateway
                        .send_email(&record.send_to, &subject, &body, true),
                )
                .await
            }
        }
    }

    // Bounds one gateway call; an elapsed timeout is a dispatch failure
    // like any other.
    async fn bounded<F>(&self, call: F) -> Result<(), GatewayError>
    where
        F: std::future::Future<Output = Result<(), GatewayError>>,
    {
        match tokio::time::timeout(self.config.dispatch_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::new(format!(
                "Gateway call timed out after {:?}",
                self.config.dispatch_timeout
            ))),
        }
    }
}

// Positive caller override wins, then the config lifetime, then the
// settings default.
fn effective_lifetime(
    override_secs: Option<i64>,
    config_secs: Option<i64>,
    settings: &OtpSettings,
) -> i64 {
    override_secs
        .filter(|v| *v > 0)
        .or_else(|| config_secs.filter(|v| *v > 0))
        .unwrap_or(settings.default_lifetime_secs)
}

#[cfg(test)]
mod lifetime_tests {
    use super::*;

    #[test]
    fn test_effective_lifetime_precedence() {
        let settings = OtpSettings::default();
        assert_eq!(effective_lifetime(Some(60), Some(120), &settings), 60);
        assert_eq!(effective_lifetime(None, Some(120), &settings), 120);
        assert_eq!(effective_lifetime(None, None, &settings), 300);
        // non-positive overrides are ignored
        assert_eq!(effective_lifetime(Some(0), None, &settings), 300);
        assert_eq!(effective_lifetime(Some(-5), Some(120), &settings), 120);
    }
}
