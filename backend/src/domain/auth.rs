//! Authentication input types: registration details and login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or hashes a
//! password. Plaintext passwords live inside [`Zeroizing`] buffers so they
//! are wiped when dropped.

use zeroize::Zeroizing;

use super::user::{Email, Role, UserValidationError, Username};

/// Minimum accepted plaintext password length.
pub const PASSWORD_MIN: usize = 8;

fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    Ok(())
}

/// Validated registration payload.
///
/// ## Invariants
/// - `username` and `email` satisfy their newtype constraints.
/// - `password` is at least [`PASSWORD_MIN`] characters and retains
///   caller-provided whitespace to avoid surprising credential comparisons.
/// - `role` defaults to [`Role::User`] when the caller omits it.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
    role: Role,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let email = Email::new(email)?;
        validate_password(password)?;
        let role = match role {
            Some(raw) => raw.parse()?,
            None => Role::default(),
        };

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    /// Chosen login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Normalized email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested authorization tier.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Validated login credentials used by the login handlers.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("chef@bistro.fr", "correct horse").unwrap();
/// assert_eq!(creds.email().as_ref(), "chef@bistro.fr");
/// ```
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// Login only checks that the password is non-empty; length rules apply
    /// at registration time, and older accounts must keep working if the
    /// minimum is ever raised.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the account lookup.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ab", "a@b.cc", "longenough", UserValidationError::UsernameTooShort { min: 3 })]
    #[case("diner", "nope", "longenough", UserValidationError::InvalidEmail)]
    #[case("diner", "a@b.cc", "", UserValidationError::EmptyPassword)]
    #[case("diner", "a@b.cc", "short", UserValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    fn invalid_registration_inputs(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = RegistrationDetails::try_from_parts(username, email, password, None)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        let err =
            RegistrationDetails::try_from_parts("diner", "a@b.cc", "longenough", Some("root"))
                .expect_err("unknown role must fail");
        assert_eq!(err, UserValidationError::InvalidRole);
    }

    #[rstest]
    #[case(None, Role::User)]
    #[case(Some("user"), Role::User)]
    #[case(Some("admin"), Role::Admin)]
    fn role_defaults_to_user(#[case] role: Option<&str>, #[case] expected: Role) {
        let details = RegistrationDetails::try_from_parts("diner", "a@b.cc", "longenough", role)
            .expect("valid registration");
        assert_eq!(details.role(), expected);
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds =
            LoginCredentials::try_from_parts("Chef@Bistro.FR", "  spaced secret  ")
                .expect("valid credentials");
        assert_eq!(creds.email().as_ref(), "chef@bistro.fr");
        assert_eq!(creds.password(), "  spaced secret  ");
    }

    #[rstest]
    fn login_rejects_empty_password() {
        let err = LoginCredentials::try_from_parts("chef@bistro.fr", "")
            .expect_err("empty password must fail");
        assert_eq!(err, UserValidationError::EmptyPassword);
    }
}
