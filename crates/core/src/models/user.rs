//! User account model

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered account, keyed by username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub age: u32,
    pub contact: String,
    pub address: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        if self.middle_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
        }
    }

    /// Merge a partial profile edit, field by field.
    ///
    /// Does not touch `age`; callers recompute it when `dob` changed.
    pub fn apply_profile(&mut self, update: &ProfileUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(middle_name) = &update.middle_name {
            self.middle_name = middle_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(dob) = update.dob {
            self.dob = dob;
        }
        if let Some(contact) = &update.contact {
            self.contact = contact.clone();
        }
        if let Some(address) = &update.address {
            self.address = address.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
    }
}

/// Partial profile edit. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub contact: String,
    pub address: Address,
}

/// Postal address parts collected at registration
#[derive(Debug, Clone, Default)]
pub struct Address {
    pub street: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
    pub zipcode: String,
}

impl Address {
    /// Render as the single stored address line.
    pub fn compose(&self) -> String {
        format!(
            "{}, Brgy. {}, {}, {}, {}",
            self.street, self.barangay, self.municipality, self.province, self.zipcode
        )
        .trim()
        .to_string()
    }
}

/// Age in whole years on the given date.
pub fn age_on(dob: NaiveDate, on: NaiveDate) -> u32 {
    let mut years = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years.max(0) as u32
}
