//! Shared setup for the live suites.

#![allow(dead_code)]

use storefront_e2e::fixture::DataGenerator;
use storefront_e2e::pages::RegisterPage;
use storefront_e2e::{init_tracing, E2eResult, PageObject, Session, UserData};

/// Start a session configured from `TEST_ENV`, `BASE_URL`, `CI` and friends
pub async fn session() -> Session {
    let _ = init_tracing();
    Session::from_env()
        .await
        .expect("browser session should start")
}

/// Close the session, then surface the test body's outcome
pub async fn finish<T>(session: Session, outcome: E2eResult<T>) -> T {
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "session close failed");
    }
    outcome.unwrap_or_else(|e| panic!("scenario failed: {e}"))
}

/// Fresh random user
pub fn new_user() -> UserData {
    DataGenerator::new().user_data()
}

/// Register `user` from the home page and continue to the storefront
pub async fn register_user(session: &Session, user: &UserData) -> E2eResult<()> {
    let register = RegisterPage::new(session.ui());
    session.ui().navigate("/").await?;
    register.header().click_register().await?;
    register.register(user).await?;
    register.continue_after_registration().await
}

/// Register `user`, then log out again
pub async fn register_and_logout(session: &Session, user: &UserData) -> E2eResult<()> {
    register_user(session, user).await?;
    RegisterPage::new(session.ui()).header().click_logout().await
}
