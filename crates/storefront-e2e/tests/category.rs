//! Live category navigation, listing, sorting and filtering scenarios.
//!
//! Run with `cargo test -p storefront-e2e --features browser -- --ignored`.

#![cfg(feature = "browser")]

mod common;

use storefront_e2e::helpers::{is_sorted_ascending, is_sorted_descending};
use storefront_e2e::pages::{sort, Category, CategoryPage, HomePage};
use storefront_e2e::{expect, Locator, PageObject};

mod main_menu {
    use super::*;

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn every_menu_category_opens_its_page() {
        let session = common::session().await;
        let outcome = session
            .run("menu categories", async {
                let home = HomePage::new(session.ui());
                let category_page = CategoryPage::new(session.ui());

                for category in Category::ALL {
                    home.navigate_to_home().await?;
                    home.header().navigate_to_category(category.display_name()).await?;

                    expect(session.ui(), category_page.page_title.clone())
                        .to_be_visible()
                        .await?;
                    let title = session.ui().text_content(&category_page.page_title).await?;
                    assert!(
                        title.trim().eq_ignore_ascii_case(category.display_name()),
                        "{title} is not the {category} page"
                    );
                }
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn shows_breadcrumb() {
        let session = common::session().await;
        let outcome = session
            .run("category breadcrumb", async {
                let home = HomePage::new(session.ui());
                home.navigate_to_home().await?;
                home.header().navigate_to_category("Computers").await?;

                let breadcrumb = CategoryPage::new(session.ui()).breadcrumb_text().await?;
                assert!(breadcrumb.contains("Home"), "{breadcrumb}");
                assert!(breadcrumb.contains("Computers"), "{breadcrumb}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }
}

mod subcategories {
    use super::*;

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn computers_has_subcategories() {
        let session = common::session().await;
        let outcome = session
            .run("computers subcategories", async {
                let page = CategoryPage::new(session.ui());
                page.open_category(Category::Computers).await?;
                page.wait_until_loaded().await?;
                assert!(page.subcategories_count().await? > 0);
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn opens_desktops() {
        let session = common::session().await;
        let outcome = session
            .run("desktops subcategory", async {
                let page = CategoryPage::new(session.ui());
                page.open_category(Category::Computers).await?;
                page.navigate_to_subcategory("Desktops").await?;

                expect(session.ui(), page.page_title.clone())
                    .to_contain_text("Desktops")
                    .await?;
                let breadcrumb = page.breadcrumb_text().await?;
                assert!(breadcrumb.contains("Computers"), "{breadcrumb}");
                assert!(breadcrumb.contains("Desktops"), "{breadcrumb}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn opens_notebooks() {
        let session = common::session().await;
        let outcome = session
            .run("notebooks subcategory", async {
                let page = CategoryPage::new(session.ui());
                page.open_category(Category::Computers).await?;
                page.navigate_to_subcategory("Notebooks").await?;

                expect(session.ui(), page.page_title.clone())
                    .to_contain_text("Notebooks")
                    .await
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn opens_camera_and_photo() {
        let session = common::session().await;
        let outcome = session
            .run("camera subcategory", async {
                let page = CategoryPage::new(session.ui());
                page.open_category(Category::Electronics).await?;
                page.navigate_to_subcategory("Camera & photo").await?;

                expect(session.ui(), page.page_title.clone())
                    .to_be_visible()
                    .await?;
                let breadcrumb = page.breadcrumb_text().await?;
                assert!(breadcrumb.contains("Electronics"), "{breadcrumb}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }
}

/// Open Computers > Notebooks, the subcategory with a populated grid
async fn open_notebooks(page: &CategoryPage) -> storefront_e2e::E2eResult<()> {
    page.open_category(Category::Computers).await?;
    page.navigate_to_subcategory("Notebooks").await?;
    page.wait_until_loaded().await
}

mod products {
    use super::*;

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn notebooks_lists_products() {
        let session = common::session().await;
        let outcome = session
            .run("notebooks products", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;
                assert!(page.products_count().await? > 0);
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn first_product_shows_title_and_price() {
        let session = common::session().await;
        let outcome = session
            .run("product details", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;

                let items = session.ui().all(&page.listing.items).await?;
                if let Some(first) = items.first() {
                    expect(session.ui(), first.locator(".product-title"))
                        .to_be_visible()
                        .await?;
                    expect(session.ui(), first.locator(".actual-price"))
                        .to_be_visible()
                        .await?;
                }
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn books_have_add_to_cart_buttons() {
        let session = common::session().await;
        let outcome = session
            .run("add to cart buttons", async {
                let page = CategoryPage::new(session.ui());
                page.open_category(Category::Books).await?;
                session
                    .ui()
                    .wait_for_element(&Locator::new(".product-grid"), None)
                    .await?;

                let buttons = Locator::new("button").with_text("Add to cart");
                assert!(session.ui().count(&buttons).await? > 0);
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn switches_between_list_and_grid() {
        let session = common::session().await;
        let outcome = session
            .run("view modes", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;

                if session.ui().is_visible(&page.listing.view_mode_list).await? {
                    page.switch_to_list_view().await?;
                    expect(session.ui(), Locator::new(".product-list"))
                        .to_be_visible()
                        .await?;
                }
                if session.ui().is_visible(&page.listing.view_mode_grid).await? {
                    page.switch_to_grid_view().await?;
                    expect(session.ui(), Locator::new(".product-grid"))
                        .to_be_visible()
                        .await?;
                }
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }
}

mod sorting {
    use super::*;

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn price_low_to_high_is_non_decreasing() {
        let session = common::session().await;
        let outcome = session
            .run("sort by price", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;
                page.sort_by(sort::PRICE_LOW_TO_HIGH).await?;

                let prices = page.product_prices().await?;
                assert!(is_sorted_ascending(&prices), "{prices:?}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn price_high_to_low_is_non_increasing() {
        let session = common::session().await;
        let outcome = session
            .run("sort by price descending", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;
                page.sort_by(sort::PRICE_HIGH_TO_LOW).await?;

                let prices = page.product_prices().await?;
                assert!(is_sorted_descending(&prices), "{prices:?}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn name_a_to_z_is_alphabetical() {
        let session = common::session().await;
        let outcome = session
            .run("sort by name", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;
                page.sort_by(sort::NAME_A_TO_Z).await?;

                let names: Vec<String> = page
                    .product_names()
                    .await?
                    .iter()
                    .map(|n| n.to_lowercase())
                    .collect();
                assert!(is_sorted_ascending(&names), "{names:?}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }
}

mod filtering {
    use super::*;

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn shows_manufacturer_filter() {
        let session = common::session().await;
        let outcome = session
            .run("manufacturer filter visible", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;

                expect(session.ui(), page.manufacturer_filter.clone())
                    .to_be_visible()
                    .await?;
                let entries = page.manufacturer_filter.locator("li");
                assert!(session.ui().count(&entries).await? > 0);
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }

    #[tokio::test]
    #[ignore = "needs Chromium and a reachable storefront"]
    async fn manufacturer_filter_narrows_listing() {
        let session = common::session().await;
        let outcome = session
            .run("filter by manufacturer", async {
                let page = CategoryPage::new(session.ui());
                open_notebooks(&page).await?;
                let initial = page.products_count().await?;

                let first_label = page.manufacturer_filter.locator("label").first();
                let manufacturer = session.ui().text_content(&first_label).await?;
                page.filter_by_manufacturer(manufacturer.trim()).await?;

                let filtered = page.products_count().await?;
                assert!(filtered > 0);
                assert!(filtered <= initial, "{filtered} > {initial}");
                Ok(())
            })
            .await;
        common::finish(session, outcome).await;
    }
}
