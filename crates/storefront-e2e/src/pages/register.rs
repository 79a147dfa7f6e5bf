//! Registration page.

use crate::fixture::{Gender, UserData};
use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::pages::header::Header;
use crate::result::E2eResult;
use crate::wait::WaitState;

/// `/register`
#[derive(Debug, Clone)]
pub struct RegisterPage {
    ui: Interactions,
    header: Header,
    pub page_title: Locator,
    pub gender_male_radio: Locator,
    pub gender_female_radio: Locator,
    pub first_name_input: Locator,
    pub last_name_input: Locator,
    pub email_input: Locator,
    pub company_input: Locator,
    pub newsletter_checkbox: Locator,
    pub password_input: Locator,
    pub confirm_password_input: Locator,
    pub register_button: Locator,
    /// "Your registration completed"
    pub success_message: Locator,
    pub continue_button: Locator,
    /// Validation summary (duplicate e-mail and the like)
    pub error_message: Locator,
    pub email_error_message: Locator,
}

impl RegisterPage {
    /// Registration page over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            header: Header::new(ui),
            page_title: Locator::new(".page-title h1"),
            gender_male_radio: Locator::new("#gender-male"),
            gender_female_radio: Locator::new("#gender-female"),
            first_name_input: Locator::new("#FirstName"),
            last_name_input: Locator::new("#LastName"),
            email_input: Locator::new("#Email"),
            company_input: Locator::new("#Company"),
            newsletter_checkbox: Locator::new(
                "input[id*=\"NewsLetterSubscriptions\"][type=\"checkbox\"]",
            ),
            password_input: Locator::new("#Password"),
            confirm_password_input: Locator::new("#ConfirmPassword"),
            register_button: Locator::new("#register-button"),
            success_message: Locator::new(".result"),
            continue_button: Locator::new("a.register-continue-button"),
            error_message: Locator::new(".message-error"),
            email_error_message: Locator::new("#Email-error"),
        }
    }

    /// Radio for a gender
    #[must_use]
    pub const fn gender_radio(&self, gender: Gender) -> &Locator {
        match gender {
            Gender::Male => &self.gender_male_radio,
            Gender::Female => &self.gender_female_radio,
        }
    }

    /// Fill the form without submitting.
    ///
    /// Unset optional fields are left as rendered: no gender click, no company,
    /// newsletter untouched.
    pub async fn fill_registration_form(&self, user: &UserData) -> E2eResult<()> {
        tracing::debug!(email = %user.email, "fill registration form");
        if let Some(gender) = user.gender {
            self.ui.check(self.gender_radio(gender)).await?;
        }

        self.ui.fill(&self.first_name_input, &user.first_name).await?;
        self.ui.fill(&self.last_name_input, &user.last_name).await?;
        self.ui.fill(&self.email_input, &user.email).await?;

        if let Some(company) = user.company.as_deref().filter(|c| !c.is_empty()) {
            self.ui.fill(&self.company_input, company).await?;
        }

        match user.newsletter {
            Some(true) => self.ui.check(&self.newsletter_checkbox).await?,
            Some(false) => self.ui.uncheck(&self.newsletter_checkbox).await?,
            None => {}
        }

        self.ui.fill(&self.password_input, &user.password).await?;
        self.ui
            .fill(&self.confirm_password_input, &user.confirm_password)
            .await
    }

    /// Submit the registration form
    pub async fn click_register_button(&self) -> E2eResult<()> {
        self.ui.click(&self.register_button).await
    }

    /// Fill the form and submit it
    pub async fn register(&self, user: &UserData) -> E2eResult<()> {
        self.fill_registration_form(user).await?;
        self.click_register_button().await
    }

    /// Completion text, once visible
    pub async fn success_message(&self) -> E2eResult<String> {
        self.ui
            .wait_for(&self.success_message, WaitState::Visible, None)
            .await?;
        self.ui.text_content(&self.success_message).await
    }

    /// Validation summary text (no visibility wait)
    pub async fn error_message(&self) -> E2eResult<String> {
        self.ui.text_content(&self.error_message).await
    }

    /// Leave the completion page
    pub async fn continue_after_registration(&self) -> E2eResult<()> {
        self.ui.click(&self.continue_button).await
    }
}

impl PageObject for RegisterPage {
    fn url_pattern(&self) -> &str {
        "/register"
    }

    fn ui(&self) -> &Interactions {
        &self.ui
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn ready_marker(&self) -> &Locator {
        &self.register_button
    }
}
