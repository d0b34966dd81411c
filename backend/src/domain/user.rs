//! User identity model.
//!
//! Registration input is validated into the newtypes here before anything
//! touches a port. Password digests travel inside [`PasswordHash`], which is
//! deliberately opaque: it never appears in `Debug` output or serialized
//! responses.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier was not a valid UUID.
    InvalidId,
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Username fell below the minimum length.
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Username exceeded the maximum length.
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Username contained characters outside the allowed set.
    UsernameInvalidCharacters,
    /// Email did not look like an address.
    InvalidEmail,
    /// Role was not one of the enumerated values.
    InvalidRole,
    /// Password was blank.
    EmptyPassword,
    /// Password fell below the minimum length.
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores",
            ),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidRole => write!(f, "role must be either \"user\" or \"admin\""),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Unique login name chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from owned input.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        if !username_regex().is_match(trimmed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not this layer's concern.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique email address, lowercased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate, trim, and lowercase an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorization tier attached to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account; may create restaurants.
    #[default]
    User,
    /// Elevated account; may update and delete restaurants.
    Admin,
}

impl Role {
    /// Stable string representation used in storage and token payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether this role grants the administrator tier.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

/// Salted one-way password digest in PHC string format.
///
/// The wrapper exists so the digest can move through the persistence layer
/// without ever reaching a response body or a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest produced by the password hasher or loaded from storage.
    #[must_use]
    pub const fn new(digest: String) -> Self {
        Self(digest)
    }

    /// Borrow the PHC-formatted digest for verification or persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` and `email` satisfy their newtype constraints.
/// - `password_hash` holds a digest, never a plaintext password.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: Username,
    email: Email,
    role: Role,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered user with server-assigned id and timestamps.
    #[must_use]
    pub fn register(
        username: Username,
        email: Email,
        role: Role,
        password_hash: PasswordHash,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::random(),
            username,
            email,
            role,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a user from already-persisted components.
    #[must_use]
    pub const fn from_parts(
        id: UserId,
        username: Username,
        email: Email,
        role: Role,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            role,
            password_hash,
            created_at,
            updated_at,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name shown in profile responses.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Lowercased email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Authorization tier.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Stored password digest.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    #[case("has spaces", UserValidationError::UsernameInvalidCharacters)]
    #[case("bad!chars", UserValidationError::UsernameInvalidCharacters)]
    fn invalid_usernames_are_rejected(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = Username::new(input).expect_err("invalid username must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn overlong_username_is_rejected() {
        let err = Username::new("x".repeat(USERNAME_MAX + 1)).expect_err("too long");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }

    #[rstest]
    #[case("  gourmand  ", "gourmand")]
    #[case("Table_42", "Table_42")]
    fn valid_usernames_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let username = Username::new(input).expect("valid username");
        assert_eq!(username.as_ref(), expected);
    }

    #[rstest]
    #[case("Diner@Example.COM", "diner@example.com")]
    #[case("  chef@bistro.fr ", "chef@bistro.fr")]
    fn emails_are_lowercased_and_trimmed(#[case] input: &str, #[case] expected: &str) {
        let email = Email::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("missing@tld")]
    #[case("two words@example.com")]
    #[case("")]
    fn malformed_emails_are_rejected(#[case] input: &str) {
        assert_eq!(Email::new(input), Err(UserValidationError::InvalidEmail));
    }

    #[rstest]
    #[case("user", Role::User)]
    #[case("admin", Role::Admin)]
    fn known_roles_parse(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(input.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UserValidationError::InvalidRole)
        );
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret".to_owned());
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[rstest]
    fn user_id_rejects_padded_input() {
        assert_eq!(
            UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"),
            Err(UserValidationError::InvalidId)
        );
    }

    #[rstest]
    fn user_id_round_trips_display() {
        let id = UserId::random();
        let parsed = UserId::new(id.to_string()).expect("display output parses");
        assert_eq!(parsed, id);
    }
}
