//! Common utility functions

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated database passwords
const DB_PASSWORD_LENGTH: usize = 24;

/// Generate a random alphanumeric database password
pub fn generate_db_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DB_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Derive a MySQL-safe identifier from a site domain.
///
/// This function:
/// - Prefixes with `cp_`
/// - Lowercases the domain
/// - Replaces any non-alphanumeric character with `_`
/// - Limits to 64 characters (MySQL identifier max length)
///
/// # Examples
///
/// ```
/// use presshost_core::db_identifier;
///
/// assert_eq!(db_identifier("foo.example.com"), "cp_foo_example_com");
/// assert_eq!(db_identifier("My-Site.net"), "cp_my_site_net");
/// ```
pub fn db_identifier(domain: &str) -> String {
    let sanitized: String = domain
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    format!("cp_{}", sanitized).chars().take(64).collect()
}

/// Mask sensitive data for logging
pub fn mask_sensitive(data: &str) -> String {
    if data.len() <= 8 {
        "***".to_string()
    } else {
        format!("{}***{}", &data[..4], &data[data.len() - 4..])
    }
}
