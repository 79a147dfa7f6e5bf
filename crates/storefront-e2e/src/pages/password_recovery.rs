//! Password recovery page.

use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::pages::header::Header;
use crate::result::E2eResult;
use crate::wait::WaitState;
use std::time::Duration;

/// Budget for the recovery outcome messages
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// `/passwordrecovery`
#[derive(Debug, Clone)]
pub struct PasswordRecoveryPage {
    ui: Interactions,
    header: Header,
    pub page_title: Locator,
    pub instruction_text: Locator,
    pub email_input: Locator,
    pub recover_button: Locator,
    /// Inline field validation
    pub error_message: Locator,
    /// Error bar (unknown e-mail)
    pub error_notification: Locator,
    /// Success bar
    pub success_message: Locator,
}

impl PasswordRecoveryPage {
    /// Password recovery page over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            header: Header::new(ui),
            page_title: Locator::new(".page-title h1"),
            instruction_text: Locator::new(".page-body"),
            email_input: Locator::new("#Email"),
            recover_button: Locator::new("button[name=\"send-email\"]"),
            error_message: Locator::new(".field-validation-error"),
            error_notification: Locator::new(".bar-notification.error"),
            success_message: Locator::new(".bar-notification.success"),
        }
    }

    /// Type the account e-mail
    pub async fn enter_email(&self, email: &str) -> E2eResult<()> {
        self.ui.fill(&self.email_input, email).await
    }

    /// Submit the recovery form
    pub async fn click_recover(&self) -> E2eResult<()> {
        self.ui.click(&self.recover_button).await
    }

    /// Enter the e-mail and submit
    pub async fn recover_password(&self, email: &str) -> E2eResult<()> {
        self.enter_email(email).await?;
        self.click_recover().await
    }

    /// Field validation text, visible within 5 s
    pub async fn error_message(&self) -> E2eResult<String> {
        self.message(&self.error_message).await
    }

    /// Success bar text, visible within 5 s
    pub async fn success_message(&self) -> E2eResult<String> {
        self.message(&self.success_message).await
    }

    /// Error bar body text, bar visible within 5 s
    pub async fn error_notification(&self) -> E2eResult<String> {
        self.ui
            .wait_for(&self.error_notification, WaitState::Visible, Some(MESSAGE_TIMEOUT))
            .await?;
        self.ui
            .text_content(&self.error_notification.locator("p.content"))
            .await
    }

    /// Whether the success bar shows right now
    pub async fn is_success_message_visible(&self) -> E2eResult<bool> {
        self.ui.is_visible(&self.success_message).await
    }

    /// Whether the field error shows right now
    pub async fn is_error_message_visible(&self) -> E2eResult<bool> {
        self.ui.is_visible(&self.error_message).await
    }

    /// Whether the error bar shows right now
    pub async fn is_error_notification_visible(&self) -> E2eResult<bool> {
        self.ui.is_visible(&self.error_notification).await
    }

    async fn message(&self, locator: &Locator) -> E2eResult<String> {
        self.ui
            .wait_for(locator, WaitState::Visible, Some(MESSAGE_TIMEOUT))
            .await?;
        self.ui.text_content(locator).await
    }
}

impl PageObject for PasswordRecoveryPage {
    fn url_pattern(&self) -> &str {
        "/passwordrecovery"
    }

    fn ui(&self) -> &Interactions {
        &self.ui
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn ready_marker(&self) -> &Locator {
        &self.email_input
    }
}
