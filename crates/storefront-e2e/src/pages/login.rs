//! Sign-in page.

use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::pages::header::Header;
use crate::result::E2eResult;
use crate::wait::WaitState;

/// `/login`
#[derive(Debug, Clone)]
pub struct LoginPage {
    ui: Interactions,
    header: Header,
    pub page_title: Locator,
    pub email_input: Locator,
    pub password_input: Locator,
    pub remember_me_checkbox: Locator,
    pub forgot_password_link: Locator,
    pub login_button: Locator,
    pub register_button: Locator,
    /// Validation summary shown after a rejected sign-in
    pub error_message: Locator,
    /// Inline e-mail field error
    pub email_error_message: Locator,
}

impl LoginPage {
    /// Login page over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            header: Header::new(ui),
            page_title: Locator::new(".page-title h1"),
            email_input: Locator::new("#Email"),
            password_input: Locator::new("#Password"),
            remember_me_checkbox: Locator::new("#RememberMe"),
            forgot_password_link: Locator::new("a[href=\"/passwordrecovery\"]"),
            login_button: Locator::new("button.login-button"),
            register_button: Locator::new("button.register-button"),
            error_message: Locator::new(".message-error"),
            email_error_message: Locator::new("#Email-error"),
        }
    }

    /// Fill the credentials, tick "Remember me" when asked, submit
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> E2eResult<()> {
        tracing::debug!(email, remember_me, "sign in");
        self.ui.fill(&self.email_input, email).await?;
        self.ui.fill(&self.password_input, password).await?;
        if remember_me {
            self.ui.check(&self.remember_me_checkbox).await?;
        }
        self.ui.click(&self.login_button).await
    }

    /// Follow the "Forgot password?" link
    pub async fn click_forgot_password(&self) -> E2eResult<()> {
        self.ui.click(&self.forgot_password_link).await
    }

    /// Go to registration from the new-customer block
    pub async fn click_register_button(&self) -> E2eResult<()> {
        self.ui.click(&self.register_button).await
    }

    /// Validation summary text, once visible
    pub async fn error_message(&self) -> E2eResult<String> {
        self.visible_text(&self.error_message).await
    }

    /// Inline e-mail error text, once visible
    pub async fn email_error_message(&self) -> E2eResult<String> {
        self.visible_text(&self.email_error_message).await
    }

    /// Signed in when the header shows the logout link
    pub async fn is_login_successful(&self) -> E2eResult<bool> {
        self.header.is_user_logged_in().await
    }

    async fn visible_text(&self, locator: &Locator) -> E2eResult<String> {
        self.ui.wait_for(locator, WaitState::Visible, None).await?;
        self.ui.text_content(locator).await
    }
}

impl PageObject for LoginPage {
    fn url_pattern(&self) -> &str {
        "/login"
    }

    fn ui(&self) -> &Interactions {
        &self.ui
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn ready_marker(&self) -> &Locator {
        &self.login_button
    }
}
