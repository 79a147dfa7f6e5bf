//! Home page.

use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::pages::header::Header;
use crate::result::E2eResult;

/// Landing page with the slider and featured products
#[derive(Debug, Clone)]
pub struct HomePage {
    ui: Interactions,
    header: Header,
    pub welcome_title: Locator,
    pub slider: Locator,
    pub featured_products_section: Locator,
    pub featured_products: Locator,
    pub category_blocks: Locator,
    pub news_section: Locator,
    pub poll_section: Locator,
}

impl HomePage {
    /// Home page over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            header: Header::new(ui),
            welcome_title: Locator::new(".topic-block-title h2"),
            slider: Locator::new(".nivo-slider"),
            featured_products_section: Locator::new(".product-grid"),
            featured_products: Locator::new(".product-item"),
            category_blocks: Locator::new(".home-page-category-grid"),
            news_section: Locator::new(".news-items"),
            poll_section: Locator::new(".poll-block"),
        }
    }

    /// Load `/`
    pub async fn navigate_to_home(&self) -> E2eResult<()> {
        self.ui.navigate("/").await
    }

    /// Open the featured product at `index` (zero-based)
    pub async fn click_featured_product(&self, index: usize) -> E2eResult<()> {
        let link = self.featured_products.nth(index).locator(".product-title a");
        self.ui.click(&link).await
    }

    /// Featured product tiles currently rendered
    pub async fn featured_products_count(&self) -> E2eResult<usize> {
        self.ui.count(&self.featured_products).await
    }

    /// Loaded when the welcome title renders
    pub async fn is_home_page_loaded(&self) -> E2eResult<bool> {
        self.ui.is_visible(&self.welcome_title).await
    }
}

impl PageObject for HomePage {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn ui(&self) -> &Interactions {
        &self.ui
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn ready_marker(&self) -> &Locator {
        &self.welcome_title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::test_support::mock_ui;

    mod home_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_open_loads_root() {
            let (driver, ui) = mock_ui(MockDriver::new());
            let home = HomePage::new(&ui);
            home.open().await.unwrap();
            assert_eq!(driver.history(), vec!["goto:https://demo.nopcommerce.com/"]);
            assert!(home.is_current().await.unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_click_featured_product_scopes_to_tile() {
            let link = Locator::new(".product-item").nth(2).locator(".product-title a");
            let (driver, ui) = mock_ui(MockDriver::new().with_element(&link, MockElement::visible()));

            HomePage::new(&ui).click_featured_product(2).await.unwrap();

            assert!(driver.was_called("click:.product-item >> nth=2 >> .product-title a"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_loaded_follows_welcome_title() {
            let title = Locator::new(".topic-block-title h2");
            let (_, ui) = mock_ui(MockDriver::new().with_element(
                &title,
                MockElement::visible_after(std::time::Duration::from_secs(1)),
            ));
            let home = HomePage::new(&ui);

            assert!(!home.is_home_page_loaded().await.unwrap());
            home.wait_until_loaded().await.unwrap();
            assert!(home.is_home_page_loaded().await.unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_featured_count() {
            let (_, ui) = mock_ui(MockDriver::new().with_element(
                &Locator::new(".product-item"),
                MockElement::visible().with_count(4),
            ));
            assert_eq!(HomePage::new(&ui).featured_products_count().await.unwrap(), 4);
        }
    }
}
