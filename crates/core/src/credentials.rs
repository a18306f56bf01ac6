//! Password hashing and account resolution

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::models::{age_on, Registration, User};
use crate::store::UserRepository;

/// Hash a password with a fresh salt. Output is a PHC string.
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC hash.
///
/// An unparseable stored hash verifies as false rather than erroring;
/// a corrupt record must not distinguish itself from a wrong password.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Resolve an identifier to an account: exact username match first, then
/// case-insensitive email match.
#[instrument(skip(store))]
pub fn resolve_user<S: UserRepository>(store: &S, identifier: &str) -> Result<User> {
    if let Some(user) = store.find_user_by_username(identifier)? {
        return Ok(user);
    }
    if let Some(user) = store.find_user_by_email(identifier)? {
        return Ok(user);
    }
    Err(Error::NotFound(format!("no account for {identifier}")))
}

/// Create a new account from a registration form.
#[instrument(skip(store, registration), fields(username = %registration.username))]
pub fn register<S: UserRepository>(store: &S, registration: Registration) -> Result<User> {
    let required = [
        &registration.first_name,
        &registration.last_name,
        &registration.username,
        &registration.email,
        &registration.password,
        &registration.confirm_password,
        &registration.contact,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(Error::Validation("Please fill required fields.".to_string()));
    }
    if registration.password != registration.confirm_password {
        return Err(Error::Validation("Passwords do not match.".to_string()));
    }
    if store
        .find_user_by_username(registration.username.trim())?
        .is_some()
    {
        return Err(Error::Validation(
            "Username already exists. Choose another.".to_string(),
        ));
    }

    let now = Utc::now();
    let user = User {
        username: registration.username.trim().to_string(),
        email: registration.email.trim().to_string(),
        password_hash: hash_password(&registration.password)?,
        first_name: registration.first_name.trim().to_string(),
        middle_name: registration.middle_name.trim().to_string(),
        last_name: registration.last_name.trim().to_string(),
        dob: registration.dob,
        age: age_on(registration.dob, now.date_naive()),
        contact: registration.contact,
        address: registration.address.compose(),
        profile_picture: None,
        created_at: now,
    };
    store.create_user(&user)?;
    tracing::info!(username = %user.username, "registered new account");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use crate::store::Store;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
            first_name: "Alice".to_string(),
            middle_name: String::new(),
            last_name: "Reyes".to_string(),
            dob: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
            contact: "0917".to_string(),
            address: Address::default(),
        }
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("Secret1!").unwrap();
        assert_ne!(hash, "Secret1!");
        assert!(verify_password(&hash, "Secret1!"));
        assert!(!verify_password(&hash, "secret1!"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "whatever"));
    }

    #[test]
    fn test_register_then_resolve_by_either_identifier() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        register(&store, registration("alice", "alice@x.com", "Secret1!")).unwrap();

        assert_eq!(resolve_user(&store, "alice").unwrap().username, "alice");
        assert_eq!(
            resolve_user(&store, "ALICE@X.COM").unwrap().username,
            "alice"
        );
        assert!(matches!(
            resolve_user(&store, "nobody"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_register_rejects_password_mismatch() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut form = registration("alice", "alice@x.com", "Secret1!");
        form.confirm_password = "Different".to_string();

        assert!(matches!(
            register(&store, form),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_register_rejects_blank_required_field() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut form = registration("alice", "alice@x.com", "Secret1!");
        form.contact = "  ".to_string();

        assert!(matches!(
            register(&store, form),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_register_rejects_taken_username() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        register(&store, registration("alice", "alice@x.com", "Secret1!")).unwrap();

        assert!(matches!(
            register(&store, registration("alice", "second@x.com", "Other2@")),
            Err(Error::Validation(_))
        ));
    }
}
