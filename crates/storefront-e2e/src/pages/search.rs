//! Search page: basic and advanced search plus the results grid.

use crate::interaction::Interactions;
use crate::locator::{js_string, Locator};
use crate::page_object::PageObject;
use crate::pages::header::Header;
use crate::pages::listing::ProductListing;
use crate::result::E2eResult;

/// Advanced search form values; `None` leaves a control untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedSearch {
    /// Search terms
    pub keyword: String,
    /// Category dropdown label
    pub category: Option<String>,
    /// "Automatically search sub categories"
    pub subcategories: Option<bool>,
    /// Manufacturer dropdown label
    pub manufacturer: Option<String>,
    /// "Search in product descriptions" (only ticked, never unticked)
    pub search_in_descriptions: bool,
    /// "Search in product tags" (only ticked, never unticked)
    pub search_in_tags: bool,
}

impl AdvancedSearch {
    /// Keyword only
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Restrict to a category (advanced search)
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Include subcategories of the chosen category
    #[must_use]
    pub const fn with_subcategories(mut self, include: bool) -> Self {
        self.subcategories = Some(include);
        self
    }

    /// Restrict to a manufacturer (advanced search)
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Also match product descriptions
    #[must_use]
    pub const fn in_descriptions(mut self) -> Self {
        self.search_in_descriptions = true;
        self
    }

    /// Also match product tags
    #[must_use]
    pub const fn in_tags(mut self) -> Self {
        self.search_in_tags = true;
        self
    }
}

/// `/search`
#[derive(Debug, Clone)]
pub struct SearchPage {
    ui: Interactions,
    header: Header,
    /// Results grid and its controls
    pub listing: ProductListing,
    pub page_title: Locator,
    pub search_keyword_input: Locator,
    pub advanced_search_checkbox: Locator,
    pub category_dropdown: Locator,
    pub search_subcategories_checkbox: Locator,
    pub manufacturer_dropdown: Locator,
    pub search_in_descriptions_checkbox: Locator,
    pub search_in_tags_checkbox: Locator,
    pub search_button: Locator,
    pub no_results_message: Locator,
    pub price_range_filter: Locator,
    pub price_range_slider: Locator,
    pub price_range_from_label: Locator,
    pub price_range_to_label: Locator,
    pub category_filters: Locator,
    pub manufacturer_filters: Locator,
    /// Both handles of the price slider
    pub slider_handles: Locator,
}

impl SearchPage {
    /// Search page over a shared helper
    #[must_use]
    pub fn new(ui: &Interactions) -> Self {
        Self {
            ui: ui.clone(),
            header: Header::new(ui),
            listing: ProductListing::new(ui),
            page_title: Locator::new(".page-title h1"),
            search_keyword_input: Locator::new("#q"),
            advanced_search_checkbox: Locator::new("#advs"),
            category_dropdown: Locator::new("#cid"),
            search_subcategories_checkbox: Locator::new("#isc"),
            manufacturer_dropdown: Locator::new("#mid"),
            search_in_descriptions_checkbox: Locator::new("#sid"),
            search_in_tags_checkbox: Locator::new("#pti"),
            search_button: Locator::new("button.search-button"),
            no_results_message: Locator::new(".no-result"),
            price_range_filter: Locator::new(".price-range-filter"),
            price_range_slider: Locator::new("#price-range-slider"),
            price_range_from_label: Locator::new(".selected-price-range .from"),
            price_range_to_label: Locator::new(".selected-price-range .to"),
            category_filters: Locator::new(".category-filters ul li"),
            manufacturer_filters: Locator::new(".manufacturer-filter ul li"),
            slider_handles: Locator::new(".ui-slider-handle"),
        }
    }

    /// Type a keyword and submit
    pub async fn perform_basic_search(&self, keyword: &str) -> E2eResult<()> {
        self.ui.fill(&self.search_keyword_input, keyword).await?;
        self.ui.click(&self.search_button).await
    }

    /// Fill the advanced form and submit
    pub async fn perform_advanced_search(&self, options: &AdvancedSearch) -> E2eResult<()> {
        tracing::debug!(?options, "advanced search");
        self.ui
            .fill(&self.search_keyword_input, &options.keyword)
            .await?;
        self.ui.check(&self.advanced_search_checkbox).await?;

        if let Some(category) = options.category.as_deref().filter(|c| !c.is_empty()) {
            self.ui.select_option(&self.category_dropdown, category).await?;
        }

        match options.subcategories {
            Some(true) => self.ui.check(&self.search_subcategories_checkbox).await?,
            Some(false) => self.ui.uncheck(&self.search_subcategories_checkbox).await?,
            None => {}
        }

        if let Some(manufacturer) = options.manufacturer.as_deref().filter(|m| !m.is_empty()) {
            self.ui
                .select_option(&self.manufacturer_dropdown, manufacturer)
                .await?;
        }

        if options.search_in_descriptions {
            self.ui.check(&self.search_in_descriptions_checkbox).await?;
        }
        if options.search_in_tags {
            self.ui.check(&self.search_in_tags_checkbox).await?;
        }

        self.ui.click(&self.search_button).await
    }

    /// Pick a sort order and wait for the results refresh
    pub async fn sort_by(&self, option: &str) -> E2eResult<()> {
        self.listing.sort_by(option).await
    }

    /// Pick a page size and wait for the results refresh
    pub async fn change_display(&self, option: &str) -> E2eResult<()> {
        self.listing.change_display(option).await
    }

    /// Show results as a list
    pub async fn switch_to_list_view(&self) -> E2eResult<()> {
        self.listing.switch_to_list_view().await
    }

    /// Show results as a grid
    pub async fn switch_to_grid_view(&self) -> E2eResult<()> {
        self.listing.switch_to_grid_view().await
    }

    /// Result tiles currently rendered
    pub async fn search_results_count(&self) -> E2eResult<usize> {
        self.listing.count().await
    }

    /// Whether the "no products" notice shows right now
    pub async fn is_no_results_message_visible(&self) -> E2eResult<bool> {
        self.ui.is_visible(&self.no_results_message).await
    }

    /// Move the price slider to `[min, max]`.
    ///
    /// The slider is driven through its widget API, then both handles are
    /// clicked so the page picks up the change, then the grid refresh is
    /// awaited. Values that are not integers are passed through as `NaN`.
    pub async fn filter_by_price_range(&self, min: &str, max: &str) -> E2eResult<()> {
        tracing::debug!(min, max, "price range filter");
        self.ui.evaluate(&price_slider_script(min, max)).await?;
        self.ui.click(&self.slider_handles.first()).await?;
        self.ui.click(&self.slider_handles.last()).await?;
        self.ui.wait_for_ajax_complete().await?;
        Ok(())
    }

    /// Click the category filter link containing `category`
    pub async fn select_category_filter(&self, category: &str) -> E2eResult<()> {
        let link = Locator::new(".category-filters a").with_text(category);
        self.ui.click(&link).await
    }

    /// Click the manufacturer filter link containing `manufacturer`
    pub async fn select_manufacturer_filter(&self, manufacturer: &str) -> E2eResult<()> {
        let link = Locator::new(".manufacturer-filter a").with_text(manufacturer);
        self.ui.click(&link).await
    }

    /// Result names in grid order
    pub async fn product_names(&self) -> E2eResult<Vec<String>> {
        self.listing.names().await
    }

    /// Result prices in grid order
    pub async fn product_prices(&self) -> E2eResult<Vec<f64>> {
        self.listing.prices().await
    }
}

/// jQuery UI slider update for the price filter; a no-op when the slider is absent
fn price_slider_script(min: &str, max: &str) -> String {
    format!(
        "(() => {{ const slider = window.jQuery && window.jQuery('#price-range-slider'); \
         if (slider && slider.length) {{ \
         slider.slider('values', [parseInt({}, 10), parseInt({}, 10)]); \
         slider.trigger('slidechange'); }} }})()",
        js_string(min),
        js_string(max)
    )
}

impl PageObject for SearchPage {
    fn url_pattern(&self) -> &str {
        "/search"
    }

    fn ui(&self) -> &Interactions {
        &self.ui
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn ready_marker(&self) -> &Locator {
        &self.search_keyword_input
    }
}
