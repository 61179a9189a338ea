use crate::config::AuthSettings;

use super::session::AuthUser;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Field {
    DisplayName,
    #[default]
    Username,
    Password,
    Confirm,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::DisplayName => "Display name",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Confirm => "Confirm password",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::Confirm)
    }
}

/// Per-field invalid markers plus the one inline message shown under the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub invalid: Vec<Field>,
    pub message: Option<String>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.invalid.is_empty()
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    // The first failure provides the message.
    fn fail(&mut self, field: Field, message: impl Into<String>) {
        if !self.invalid.contains(&field) {
            self.invalid.push(field);
        }
        if self.message.is_none() {
            self.message = Some(message.into());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Invalid,
    Success(AuthUser),
}

/// Text entry shared by both forms.
pub trait AuthForm {
    fn fields(&self) -> &'static [Field];
    fn focus(&self) -> Field;
    fn set_focus(&mut self, field: Field);
    fn value(&self, field: Field) -> &str;
    fn value_mut(&mut self, field: Field) -> Option<&mut String>;
    fn validation(&self) -> &Validation;
    fn validation_mut(&mut self) -> &mut Validation;
    fn submit(&mut self, auth: &AuthSettings) -> FormOutcome;

    fn focus_next(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus()).unwrap_or(0);
        self.set_focus(fields[(pos + 1) % fields.len()]);
    }

    fn focus_prev(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus()).unwrap_or(0);
        self.set_focus(fields[(pos + fields.len() - 1) % fields.len()]);
    }

    /// Typing into a field clears its invalid marker.
    fn push_char(&mut self, c: char) {
        let focus = self.focus();
        if let Some(value) = self.value_mut(focus) {
            value.push(c);
        }
        self.validation_mut().invalid.retain(|f| *f != focus);
    }

    fn pop_char(&mut self) {
        let focus = self.focus();
        if let Some(value) = self.value_mut(focus) {
            value.pop();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    focus: Field,
    validation: Validation,
}

impl LoginForm {
    const FIELDS: [Field; 2] = [Field::Username, Field::Password];
}

impl AuthForm for LoginForm {
    fn fields(&self) -> &'static [Field] {
        &Self::FIELDS
    }

    fn focus(&self) -> Field {
        self.focus
    }

    fn set_focus(&mut self, field: Field) {
        if Self::FIELDS.contains(&field) {
            self.focus = field;
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
            _ => "",
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Username => Some(&mut self.username),
            Field::Password => Some(&mut self.password),
            _ => None,
        }
    }

    fn validation(&self) -> &Validation {
        &self.validation
    }

    fn validation_mut(&mut self) -> &mut Validation {
        &mut self.validation
    }

    /// Required fields first, then the demo credential.
    fn submit(&mut self, auth: &AuthSettings) -> FormOutcome {
        let mut v = Validation::default();
        let username = self.username.trim();

        if username.is_empty() {
            v.fail(Field::Username, "Enter your username.");
        }
        if self.password.is_empty() {
            v.fail(Field::Password, "Enter your password.");
        }
        if v.is_ok() && (username != auth.demo_username || self.password != auth.demo_password) {
            v.fail(Field::Username, "Incorrect username or password.");
            v.fail(Field::Password, "Incorrect username or password.");
        }

        if !v.is_ok() {
            self.focus = v.invalid[0];
            self.validation = v;
            return FormOutcome::Invalid;
        }

        let user = AuthUser::new(username, None);
        *self = Self::default();
        FormOutcome::Success(user)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub display_name: String,
    pub username: String,
    pub password: String,
    pub confirm: String,
    focus: Field,
    validation: Validation,
}

impl SignupForm {
    const FIELDS: [Field; 4] = [
        Field::DisplayName,
        Field::Username,
        Field::Password,
        Field::Confirm,
    ];
}

/// `[A-Za-z0-9_.-]{3,32}`.
pub(super) fn valid_username(name: &str) -> bool {
    (3..=32).contains(&name.chars().count())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

impl AuthForm for SignupForm {
    fn fields(&self) -> &'static [Field] {
        &Self::FIELDS
    }

    fn focus(&self) -> Field {
        self.focus
    }

    fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::DisplayName => &self.display_name,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::Confirm => &self.confirm,
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        Some(match field {
            Field::DisplayName => &mut self.display_name,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::Confirm => &mut self.confirm,
        })
    }

    fn validation(&self) -> &Validation {
        &self.validation
    }

    fn validation_mut(&mut self) -> &mut Validation {
        &mut self.validation
    }

    fn submit(&mut self, auth: &AuthSettings) -> FormOutcome {
        let mut v = Validation::default();
        let username = self.username.trim();

        if username.is_empty() {
            v.fail(Field::Username, "Choose a username.");
        } else if !valid_username(username) {
            v.fail(
                Field::Username,
                "Usernames are 3 to 32 characters: letters, digits, '.', '_' or '-'.",
            );
        }
        if self.password.chars().count() < auth.min_password_len {
            v.fail(
                Field::Password,
                format!("Use at least {} characters for the password.", auth.min_password_len),
            );
        }
        if self.confirm != self.password {
            v.fail(Field::Confirm, "Passwords do not match.");
        }

        if !v.is_ok() {
            self.focus = v.invalid[0];
            self.validation = v;
            return FormOutcome::Invalid;
        }

        let display_name = Some(self.display_name.trim().to_string()).filter(|n| !n.is_empty());
        let user = AuthUser::new(username, display_name);
        *self = Self::default();
        FormOutcome::Success(user)
    }
}
