//! Site header: logo, search box, account links and the category menu.

use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use std::fmt;

/// Top-level catalog categories reachable from the header menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Computers
    Computers,
    /// Electronics
    Electronics,
    /// Apparel
    Apparel,
    /// Digital downloads
    DigitalDownloads,
    /// Books
    Books,
    /// Jewelry
    Jewelry,
    /// Gift cards
    GiftCards,
}

impl Category {
    /// Every menu category, in menu order
    pub const ALL: [Self; 7] = [
        Self::Computers,
        Self::Electronics,
        Self::Apparel,
        Self::DigitalDownloads,
        Self::Books,
        Self::Jewelry,
        Self::GiftCards,
    ];

    /// Case-insensitive lookup by display name ("digital downloads", "Gift Cards", ...)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name))
    }

    /// Lowercase display name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Computers => "computers",
            Self::Electronics => "electronics",
            Self::Apparel => "apparel",
            Self::DigitalDownloads => "digital downloads",
            Self::Books => "books",
            Self::Jewelry => "jewelry",
            Self::GiftCards => "gift cards",
        }
    }

    /// URL slug of the category page
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Computers => "computers",
            Self::Electronics => "electronics",
            Self::Apparel => "apparel",
            Self::DigitalDownloads => "digital-downloads",
            Self::Books => "books",
            Self::Jewelry => "jewelry",
            Self::GiftCards => "gift-cards",
        }
    }

    /// Category page path
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}", self.slug())
    }

    /// First menu link pointing at the category page
    #[must_use]
    pub fn menu_locator(self) -> Locator {
        Locator::new(format!("a[href=\"/{}\"]", self.slug())).first()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Header shared by every storefront page
#[derive(Debug, Clone)]
pub struct Header {
    ui: Interactions,
    /// Store logo (links home)
    pub logo: Locator,
    /// Header search field
    pub search_box: Locator,
    /// Header search button
    pub search_button: Locator,
    /// "Register" link
    pub register_link: Locator,
    /// "Log in" link
    pub login_link: Locator,
    /// "Log out" link (only when signed in)
    pub logout_link: Locator,
    /// "My account" link (only when signed in)
    pub my_account_link: Locator,
}

impl Header {
    /// Build the header locators
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            logo: Locator::new(".header-logo a"),
            search_box: Locator::new("#small-searchterms"),
            search_button: Locator::new("button.search-box-button"),
            register_link: Locator::new("a.ico-register"),
            login_link: Locator::new("a.ico-login"),
            logout_link: Locator::new("a.ico-logout"),
            my_account_link: Locator::new("a.ico-account"),
        }
    }

    /// Menu link of a category
    #[must_use]
    pub fn category_menu(&self, category: Category) -> Locator {
        category.menu_locator()
    }

    /// Load a path relative to the base URL
    pub async fn navigate(&self, path: &str) -> E2eResult<()> {
        self.ui.navigate(path).await
    }

    /// Fill the header search and submit it
    pub async fn search_product(&self, keyword: &str) -> E2eResult<()> {
        self.ui.fill(&self.search_box, keyword).await?;
        self.ui.click(&self.search_button).await
    }

    /// Click the logo
    pub async fn click_logo(&self) -> E2eResult<()> {
        self.ui.click(&self.logo).await
    }

    /// Click "Register"
    pub async fn click_register(&self) -> E2eResult<()> {
        self.ui.click(&self.register_link).await
    }

    /// Click "Log in"
    pub async fn click_login(&self) -> E2eResult<()> {
        self.ui.click(&self.login_link).await
    }

    /// Click "Log out"
    pub async fn click_logout(&self) -> E2eResult<()> {
        self.ui.click(&self.logout_link).await
    }

    /// Click "My account"
    pub async fn click_my_account(&self) -> E2eResult<()> {
        self.ui.click(&self.my_account_link).await
    }

    /// Signed in when the logout link is visible
    pub async fn is_user_logged_in(&self) -> E2eResult<bool> {
        self.ui.is_visible(&self.logout_link).await
    }

    /// Open a category from the menu.
    ///
    /// Unknown names do nothing beyond a warning; use
    /// [`Self::try_navigate_to_category`] to fail instead.
    pub async fn navigate_to_category(&self, name: &str) -> E2eResult<()> {
        match Category::from_name(name) {
            Some(category) => self.go_to_category(category).await,
            None => {
                tracing::warn!(category = name, "Unknown category, menu click skipped");
                Ok(())
            }
        }
    }

    /// Open a category from the menu, failing on unknown names
    pub async fn try_navigate_to_category(&self, name: &str) -> E2eResult<()> {
        let category = Category::from_name(name).ok_or_else(|| E2eError::UnknownCategory {
            name: name.to_string(),
        })?;
        self.go_to_category(category).await
    }

    /// Open a category from the menu
    pub async fn go_to_category(&self, category: Category) -> E2eResult<()> {
        tracing::debug!(%category, "open category from menu");
        self.ui.click(&category.menu_locator()).await
    }
}
