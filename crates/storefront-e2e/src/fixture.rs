//! Generated test data: customers and addresses.
//!
//! Records are built fresh for every test. E-mails embed a millisecond
//! timestamp plus a short random suffix so parallel workers never collide on
//! registration.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password accepted by the storefront's complexity rules
pub const DEFAULT_PASSWORD: &str = "Test@123456";

/// Password rejected by the storefront's complexity rules
pub const WEAK_PASSWORD: &str = "123";

/// Country used for generated addresses
pub const DEFAULT_COUNTRY: &str = "United States";

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor",
];

const COMPANY_STEMS: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Vandelay", "Stark", "Wayne", "Tyrell",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "and Sons", "Ltd"];

const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton", "Fairview",
    "Salem", "Madison", "Georgetown",
];

const STREETS: &[&str] = &[
    "Main St", "Oak Ave", "Maple Dr", "Cedar Ln", "Pine St", "Elm St", "Washington Blvd",
    "Lake Rd",
];

/// Gender radio on the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
}

impl Gender {
    /// Form value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// A customer to register or sign in with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Gender radio (left untouched when `None`)
    pub gender: Option<Gender>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// E-mail, also the login
    pub email: String,
    /// Company (left empty when `None`)
    pub company: Option<String>,
    /// Newsletter checkbox (left untouched when `None`)
    pub newsletter: Option<bool>,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
}

impl UserData {
    /// Minimal record with the default password
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            gender: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            company: None,
            newsletter: None,
            password: DEFAULT_PASSWORD.to_string(),
            confirm_password: DEFAULT_PASSWORD.to_string(),
        }
    }

    /// Replace the e-mail
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Replace password and confirmation
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self.confirm_password = self.password.clone();
        self
    }

    /// Replace only the confirmation
    #[must_use]
    pub fn with_confirm_password(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_password = confirm.into();
        self
    }

    /// Set the newsletter choice
    #[must_use]
    pub const fn with_newsletter(mut self, subscribe: bool) -> Self {
        self.newsletter = Some(subscribe);
        self
    }

    /// Set the gender
    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }
}

/// A postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub country: String,
    pub city: String,
    pub address1: String,
    pub address2: String,
    pub zip_code: String,
    pub phone_number: String,
}

/// Random record generator; seed it for reproducible data
#[derive(Debug)]
pub struct DataGenerator {
    rng: StdRng,
}

impl Default for DataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataGenerator {
    /// Generator seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A registrable customer: random gender, names and company,
    /// unique e-mail and [`DEFAULT_PASSWORD`]
    pub fn user_data(&mut self) -> UserData {
        let gender = if self.rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        UserData {
            gender: Some(gender),
            company: Some(self.company()),
            ..UserData::new(self.first_name(), self.last_name(), unique_email())
        }
    }

    /// A US address with a five-digit zip and a `###-###-####` phone
    pub fn address(&mut self) -> Address {
        let zip: u32 = self.rng.gen_range(0..100_000);
        let phone = format!(
            "{:03}-{:03}-{:04}",
            self.rng.gen_range(200..1000),
            self.rng.gen_range(0..1000),
            self.rng.gen_range(0..10_000)
        );
        Address {
            first_name: self.first_name(),
            last_name: self.last_name(),
            email: unique_email(),
            company: self.company(),
            country: DEFAULT_COUNTRY.to_string(),
            city: self.pick(CITIES).to_string(),
            address1: format!("{} {}", self.rng.gen_range(1..10_000), self.pick(STREETS)),
            address2: format!("Apt. {}", self.rng.gen_range(1..1000)),
            zip_code: format!("{zip:05}"),
            phone_number: phone,
        }
    }

    /// Random first name
    pub fn first_name(&mut self) -> String {
        self.pick(FIRST_NAMES).to_string()
    }

    /// Random last name
    pub fn last_name(&mut self) -> String {
        self.pick(LAST_NAMES).to_string()
    }

    /// Random company name
    pub fn company(&mut self) -> String {
        format!("{} {}", self.pick(COMPANY_STEMS), self.pick(COMPANY_SUFFIXES))
    }

    fn pick(&mut self, choices: &'static [&'static str]) -> &'static str {
        choices.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

/// `test.user.<millis>.<8 hex>@example.com`
#[must_use]
pub fn unique_email() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "test.user.{}.{}@example.com",
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}

/// Address without an `@`, rejected by the e-mail validator
#[must_use]
pub fn invalid_email() -> String {
    format!("invalid-email-{}", Utc::now().timestamp_millis())
}

/// Password rejected by the complexity rules
#[must_use]
pub fn weak_password() -> String {
    WEAK_PASSWORD.to_string()
}
