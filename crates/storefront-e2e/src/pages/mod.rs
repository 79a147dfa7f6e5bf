//! Storefront page objects.
//!
//! Every page holds a clone of the shared [`crate::Interactions`] helper and
//! the site [`Header`]; listing pages add a [`ProductListing`].

pub mod category;
pub mod header;
pub mod home;
pub mod listing;
pub mod login;
pub mod password_recovery;
pub mod register;
pub mod search;

pub use category::CategoryPage;
pub use header::{Category, Header};
pub use home::HomePage;
pub use listing::{sort, ProductListing};
pub use login::LoginPage;
pub use password_recovery::PasswordRecoveryPage;
pub use register::RegisterPage;
pub use search::{AdvancedSearch, SearchPage};
