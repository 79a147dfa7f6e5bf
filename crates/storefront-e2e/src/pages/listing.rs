//! Product grid shared by category and search result pages.

use crate::helpers::extract_price;
use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::result::E2eResult;

/// Sort options offered by the "Sort by" dropdown
pub mod sort {
    /// Shop order
    pub const POSITION: &str = "Position";
    /// Name ascending
    pub const NAME_A_TO_Z: &str = "Name: A to Z";
    /// Name descending
    pub const NAME_Z_TO_A: &str = "Name: Z to A";
    /// Price ascending
    pub const PRICE_LOW_TO_HIGH: &str = "Price: Low to High";
    /// Price descending
    pub const PRICE_HIGH_TO_LOW: &str = "Price: High to Low";
    /// Newest first
    pub const CREATED_ON: &str = "Created on";
}

/// Products grid with its sort, page-size and view-mode controls
#[derive(Debug, Clone)]
pub struct ProductListing {
    ui: Interactions,
    /// Every product tile
    pub items: Locator,
    /// "Sort by" dropdown
    pub sort_by_dropdown: Locator,
    /// "Display" page-size dropdown
    pub display_dropdown: Locator,
    /// Grid view toggle
    pub view_mode_grid: Locator,
    /// List view toggle
    pub view_mode_list: Locator,
}

impl ProductListing {
    /// Listing widgets over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            items: Locator::new(".product-item"),
            sort_by_dropdown: Locator::new("#products-orderby"),
            display_dropdown: Locator::new("#products-pagesize"),
            view_mode_grid: Locator::new("a[title=\"Grid\"]"),
            view_mode_list: Locator::new("a[title=\"List\"]"),
        }
    }

    /// Title link of every tile
    #[must_use]
    pub fn title_links(&self) -> Locator {
        self.items.locator(".product-title a")
    }

    /// Price of every tile
    #[must_use]
    pub fn prices_locator(&self) -> Locator {
        self.items.locator(".actual-price")
    }

    /// Pick a sort order, then let the grid refresh
    pub async fn sort_by(&self, option: &str) -> E2eResult<()> {
        self.ui
            .safe_select_option(&self.sort_by_dropdown, option, None)
            .await?;
        self.ui.wait_for_ajax_complete().await?;
        Ok(())
    }

    /// Pick a page size, then let the grid refresh
    pub async fn change_display(&self, option: &str) -> E2eResult<()> {
        self.ui
            .safe_select_option(&self.display_dropdown, option, None)
            .await?;
        self.ui.wait_for_ajax_complete().await?;
        Ok(())
    }

    /// Switch to list view
    pub async fn switch_to_list_view(&self) -> E2eResult<()> {
        self.ui.click(&self.view_mode_list).await?;
        self.ui.wait_for_ajax_complete().await?;
        Ok(())
    }

    /// Switch to grid view
    pub async fn switch_to_grid_view(&self) -> E2eResult<()> {
        self.ui.click(&self.view_mode_grid).await?;
        self.ui.wait_for_ajax_complete().await?;
        Ok(())
    }

    /// Number of tiles currently rendered
    pub async fn count(&self) -> E2eResult<usize> {
        self.ui.count(&self.items).await
    }

    /// Trimmed product names in grid order; blank titles are skipped
    pub async fn names(&self) -> E2eResult<Vec<String>> {
        let texts = self.ui.all_text_contents(&self.title_links()).await?;
        Ok(texts
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Parsed prices in grid order; tiles without a number are skipped
    pub async fn prices(&self) -> E2eResult<Vec<f64>> {
        let texts = self.ui.all_text_contents(&self.prices_locator()).await?;
        Ok(texts.iter().filter_map(|t| extract_price(t)).collect())
    }
}
