//! Category listing page.

use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::pages::header::{Category, Header};
use crate::pages::listing::ProductListing;
use crate::result::E2eResult;

/// `/<category slug>`, reached from the header menu or by path
#[derive(Debug, Clone)]
pub struct CategoryPage {
    ui: Interactions,
    header: Header,
    /// Product grid and its controls
    pub listing: ProductListing,
    pub page_title: Locator,
    pub breadcrumb: Locator,
    /// Subcategory tiles
    pub subcategories: Locator,
    /// Attribute filter blocks
    pub filter_by_attributes: Locator,
    /// Manufacturer filter block
    pub manufacturer_filter: Locator,
    /// Price range filter block
    pub price_range_filter: Locator,
}

impl CategoryPage {
    /// Category page over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            header: Header::new(ui),
            listing: ProductListing::new(ui),
            page_title: Locator::new(".page-title h1"),
            breadcrumb: Locator::new(".breadcrumb"),
            subcategories: Locator::new(".sub-category-item"),
            filter_by_attributes: Locator::new(".filter-by-attributes"),
            manufacturer_filter: Locator::new(".product-manufacturer-filter"),
            price_range_filter: Locator::new(".price-range-filter"),
        }
    }

    /// Load a category page by path
    pub async fn open_category(&self, category: Category) -> E2eResult<()> {
        self.ui.navigate(&category.path()).await
    }

    /// Open the subcategory tile whose title contains `name`
    pub async fn navigate_to_subcategory(&self, name: &str) -> E2eResult<()> {
        let link = Locator::new(".sub-category-item h2 a").with_text(name);
        self.ui.click(&link).await
    }

    /// Pick a sort order and wait for the grid refresh
    pub async fn sort_by(&self, option: &str) -> E2eResult<()> {
        self.listing.sort_by(option).await
    }

    /// Pick a page size and wait for the grid refresh
    pub async fn change_display(&self, option: &str) -> E2eResult<()> {
        self.listing.change_display(option).await
    }

    /// Show products as a list
    pub async fn switch_to_list_view(&self) -> E2eResult<()> {
        self.listing.switch_to_list_view().await
    }

    /// Show products as a grid
    pub async fn switch_to_grid_view(&self) -> E2eResult<()> {
        self.listing.switch_to_grid_view().await
    }

    /// Tick a manufacturer and wait for the grid refresh
    pub async fn filter_by_manufacturer(&self, manufacturer: &str) -> E2eResult<()> {
        let label = self.manufacturer_filter.locator("label").with_text(manufacturer);
        self.ui.click(&label).await?;
        self.ui.wait_for_ajax_complete().await?;
        Ok(())
    }

    /// Click a value link inside the attribute block that mentions `name`.
    ///
    /// The link reloads the page, so no refresh wait follows.
    pub async fn filter_by_attribute(&self, name: &str, value: &str) -> E2eResult<()> {
        let link = self
            .filter_by_attributes
            .clone()
            .with_text(name)
            .locator("a")
            .with_text(value);
        self.ui.click(&link).await
    }

    /// Product tiles currently rendered
    pub async fn products_count(&self) -> E2eResult<usize> {
        self.listing.count().await
    }

    /// Subcategory tiles currently rendered
    pub async fn subcategories_count(&self) -> E2eResult<usize> {
        self.ui.count(&self.subcategories).await
    }

    /// Breadcrumb text, once attached
    pub async fn breadcrumb_text(&self) -> E2eResult<String> {
        self.ui.text_content(&self.breadcrumb).await
    }

    /// Product names in grid order
    pub async fn product_names(&self) -> E2eResult<Vec<String>> {
        self.listing.names().await
    }

    /// Product prices in grid order
    pub async fn product_prices(&self) -> E2eResult<Vec<f64>> {
        self.listing.prices().await
    }
}

impl PageObject for CategoryPage {
    fn url_pattern(&self) -> &str {
        "/:category"
    }

    fn ui(&self) -> &Interactions {
        &self.ui
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn ready_marker(&self) -> &Locator {
        &self.page_title
    }
}
