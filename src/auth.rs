//! Demo sign-in: the stored session flag, in-app locations with their
//! `next` return path, and the login/signup forms.

mod form;
mod location;
mod session;

pub use form::{AuthForm, Field, FormOutcome, LoginForm, SignupForm, Validation};
pub use location::{Location, Route, after_auth, guard, sanitize_next};
pub use session::{AUTH_KEY, AuthUser, current_user, sign_in, sign_out};

#[cfg(test)]
mod tests;
