//! User storage operations

use tracing::instrument;

use super::Collection;
use crate::error::{Error, Result};
use crate::models::{age_on, ProfileUpdate, User};

pub struct UserStore<'a> {
    collection: &'a Collection<User>,
}

impl<'a> UserStore<'a> {
    pub fn new(collection: &'a Collection<User>) -> Self {
        Self { collection }
    }

    /// Create a new user. Usernames are unique.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn create(&self, user: &User) -> Result<()> {
        self.collection.mutate(|users| {
            if users.iter().any(|u| u.username == user.username) {
                return Err(Error::Validation(
                    "Username already exists. Choose another.".to_string(),
                ));
            }
            users.push(user.clone());
            Ok(())
        })
    }

    /// Find user by exact username
    #[instrument(skip(self))]
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.collection.load()?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    /// Find user by email, case-insensitively
    #[instrument(skip(self))]
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.collection.load()?;
        Ok(users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    /// Update the stored record for a username in place.
    pub fn update<F: FnOnce(&mut User)>(&self, username: &str, f: F) -> Result<User> {
        self.collection.mutate(|users| {
            let user = users
                .iter_mut()
                .find(|u| u.username == username)
                .ok_or_else(|| Error::NotFound(format!("no account named {username}")))?;
            f(user);
            Ok(user.clone())
        })
    }

    /// Merge a profile edit and recompute the derived age field.
    #[instrument(skip(self, update))]
    pub fn apply_profile(&self, username: &str, update: &ProfileUpdate) -> Result<User> {
        let today = chrono::Utc::now().date_naive();
        self.update(username, |user| {
            user.apply_profile(update);
            user.age = age_on(user.dob, today);
        })
    }

    /// Replace the stored password hash.
    #[instrument(skip(self, password_hash))]
    pub fn set_password_hash(&self, username: &str, password_hash: &str) -> Result<()> {
        self.update(username, |user| {
            user.password_hash = password_hash.to_string();
        })?;
        Ok(())
    }

    /// Record the stored filename of the profile picture.
    pub fn set_profile_picture(&self, username: &str, filename: &str) -> Result<()> {
        self.update(username, |user| {
            user.profile_picture = Some(filename.to_string());
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use chrono::{NaiveDate, Utc};
    use tempfile::tempdir;

    fn sample_user(username: &str, email: &str) -> User {
        User {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            middle_name: String::new(),
            last_name: "User".to_string(),
            dob: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
            age: 29,
            contact: "0917".to_string(),
            address: "somewhere".to_string(),
            profile_picture: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_find() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .users()
            .create(&sample_user("alice", "alice@x.com"))
            .unwrap();

        let found = store.users().find_by_username("alice").unwrap();
        assert_eq!(found.unwrap().email, "alice@x.com");
        assert!(store.users().find_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .users()
            .create(&sample_user("alice", "alice@x.com"))
            .unwrap();

        let result = store.users().create(&sample_user("alice", "other@x.com"));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_find_by_email_ignores_case() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .users()
            .create(&sample_user("alice", "Alice@X.com"))
            .unwrap();

        let found = store.users().find_by_email("ALICE@x.COM").unwrap();
        assert_eq!(found.unwrap().username, "alice");
    }

    #[test]
    fn test_apply_profile_recomputes_age() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .users()
            .create(&sample_user("alice", "alice@x.com"))
            .unwrap();

        let new_dob = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let updated = store
            .users()
            .apply_profile(
                "alice",
                &ProfileUpdate {
                    dob: Some(new_dob),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.dob, new_dob);
        assert_eq!(updated.age, age_on(new_dob, Utc::now().date_naive()));
    }

    #[test]
    fn test_set_password_hash_unknown_user() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let result = store.users().set_password_hash("ghost", "hash");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
