//! Authentication primitives: signup details and login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port.

use zeroize::Zeroizing;

use super::user::{EmailAddress, PersonName, UserValidationError, Username};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Domain error returned when signup or login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    #[error(transparent)]
    Field(#[from] UserValidationError),
    #[error("password is required")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Plaintext password held in a zeroizing buffer until hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    fn required(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    fn for_signup(raw: &str) -> Result<Self, CredentialValidationError> {
        let password = Self::required(raw)?;
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(CredentialValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(password)
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Validated signup request.
///
/// # Examples
/// ```
/// use car_listings::domain::SignupDetails;
///
/// let details = SignupDetails::try_from_parts("John", "john12", "John@Example.com", "secret")
///     .expect("valid signup");
/// assert_eq!(details.email().as_ref(), "john@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    name: PersonName,
    username: Username,
    email: EmailAddress,
    password: Password,
}

impl SignupDetails {
    /// Validate raw signup inputs.
    pub fn try_from_parts(
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            name: PersonName::new(name)?,
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: Password::for_signup(password)?,
        })
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated login credentials.
///
/// The email is only checked for presence so that a malformed address reads
/// as a failed login rather than leaking which rule it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail.into());
        }
        Ok(Self {
            email: normalised,
            password: Password::required(password)?,
        })
    }

    /// Lower-cased email used for the lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "john12", "john@example.com", "secret", UserValidationError::EmptyName.into())]
    #[case("John", " ", "john@example.com", "secret", UserValidationError::EmptyUsername.into())]
    #[case("John", "john12", "john.example.com", "secret", UserValidationError::InvalidEmail.into())]
    #[case("John", "john12", "john@example.com", "", CredentialValidationError::EmptyPassword)]
    #[case(
        "John",
        "john12",
        "john@example.com",
        "12345",
        CredentialValidationError::PasswordTooShort { min: 6 }
    )]
    fn invalid_signup(
        #[case] name: &str,
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = SignupDetails::try_from_parts(name, username, email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn signup_normalises_fields() {
        let details = SignupDetails::try_from_parts(" John ", " john12 ", " JOHN@x.io ", "123456")
            .expect("six characters is enough");
        assert_eq!(details.name().as_ref(), "John");
        assert_eq!(details.username().as_ref(), "john12");
        assert_eq!(details.email().as_ref(), "john@x.io");
        assert_eq!(details.password().expose(), "123456");
    }

    #[rstest]
    #[case("", "pw", CredentialValidationError::Field(UserValidationError::EmptyEmail))]
    #[case("a@b.c", "", CredentialValidationError::EmptyPassword)]
    fn invalid_login(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("blank inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts(" A@B.io ", " pw ").expect("valid login");
        assert_eq!(creds.email(), "a@b.io");
        assert_eq!(creds.password().expose(), " pw ");
    }

    #[rstest]
    fn password_debug_hides_value() {
        let creds = LoginCredentials::try_from_parts("a@b.io", "hunter2").expect("valid login");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
