//! HTML form bodies and their field-level error lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::validation::{
    validate_email, validate_new_password, validate_password_confirmation, validate_username,
};
use crate::web::middleware::CsrfProtected;

const REQUIRED: &str = "This field is required.";

/// Field errors collected while cleaning a form.
///
/// Templates read `errors.fields.<name>` and `errors.non_field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    /// Create an empty error list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `validator` output into per-field messages.
    ///
    /// A missing value reports only the "required" message for that field.
    pub fn from_validation_errors(errors: &validator::ValidationErrors) -> Self {
        let mut form_errors = Self::new();
        for (field, field_errors) in errors.field_errors() {
            let required = field_errors.iter().any(|e| e.code == "required");
            for e in field_errors {
                if required && e.code != "required" {
                    continue;
                }
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                form_errors.add(&field, message);
            }
        }
        form_errors
    }

    /// Attach a message to a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Attach a message to the form as a whole.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// True when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Messages for one field.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Messages not tied to a field.
    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn required(value: &str) -> Result<(), validator::ValidationError> {
    if value.is_empty() {
        return Err(validator::ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

/// New-topic form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct NewTopicForm {
    /// Topic subject.
    #[validate(
        custom(function = "required"),
        length(
            max = 255,
            message = "Ensure this value has at most 255 characters."
        )
    )]
    pub subject: String,
    /// Opening post.
    #[validate(
        custom(function = "required"),
        length(
            max = 4000,
            message = "Ensure this value has at most 4000 characters."
        )
    )]
    pub message: String,
    /// Hidden CSRF field.
    #[serde(rename = "csrfmiddlewaretoken", skip_serializing)]
    pub csrf_token: String,
}

impl NewTopicForm {
    /// Trim the inputs and validate them.
    pub fn clean(&mut self) -> Result<(), FormErrors> {
        self.subject = self.subject.trim().to_string();
        self.message = self.message.trim().to_string();
        self.validate()
            .map_err(|e| FormErrors::from_validation_errors(&e))
    }
}

/// Reply and edit form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct PostForm {
    /// Post body.
    #[validate(
        custom(function = "required"),
        length(
            max = 4000,
            message = "Ensure this value has at most 4000 characters."
        )
    )]
    pub message: String,
    /// Hidden CSRF field.
    #[serde(rename = "csrfmiddlewaretoken", skip_serializing)]
    pub csrf_token: String,
}

impl PostForm {
    /// Trim the message and validate it.
    pub fn clean(&mut self) -> Result<(), FormErrors> {
        self.message = self.message.trim().to_string();
        self.validate()
            .map_err(|e| FormErrors::from_validation_errors(&e))
    }
}

/// Signup form.
///
/// Password strength problems are reported on `password2`, the field the
/// user fills in last.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SignupForm {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    #[serde(skip_serializing)]
    pub password1: String,
    /// Password confirmation.
    #[serde(skip_serializing)]
    pub password2: String,
    /// Hidden CSRF field.
    #[serde(rename = "csrfmiddlewaretoken", skip_serializing)]
    pub csrf_token: String,
}

impl SignupForm {
    /// Validate every field that does not need the database.
    pub fn clean(&mut self) -> Result<(), FormErrors> {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();

        let mut errors = FormErrors::new();
        if let Err(e) = validate_username(&self.username) {
            errors.add("username", e.to_string());
        }
        if let Err(e) = validate_email(&self.email) {
            errors.add("email", e.to_string());
        }
        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        match validate_password_confirmation(&self.password1, &self.password2) {
            Err(e) => errors.add("password2", e.to_string()),
            Ok(()) => {
                for e in validate_new_password(&self.password2, &self.username) {
                    errors.add("password2", e.to_string());
                }
            }
        }
        errors.into_result()
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    /// Username.
    pub username: String,
    /// Password.
    #[serde(skip_serializing)]
    pub password: String,
    /// Where to go after logging in.
    pub next: String,
    /// Hidden CSRF field.
    #[serde(rename = "csrfmiddlewaretoken", skip_serializing)]
    pub csrf_token: String,
}

impl LoginForm {
    /// Check that both credentials were supplied.
    pub fn clean(&mut self) -> Result<(), FormErrors> {
        self.username = self.username.trim().to_string();

        let mut errors = FormErrors::new();
        if self.username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result()
    }

    /// The post-login destination, if it is a path on this site.
    pub fn safe_next(&self) -> Option<&str> {
        safe_redirect_target(&self.next)
    }
}

/// Accept only local absolute paths as redirect targets.
pub fn safe_redirect_target(target: &str) -> Option<&str> {
    let local = target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(char::is_control);
    local.then_some(target)
}

macro_rules! csrf_protected {
    ($($form:ty),+ $(,)?) => {
        $(impl CsrfProtected for $form {
            fn csrf_token(&self) -> &str {
                &self.csrf_token
            }
        })+
    };
}

csrf_protected!(NewTopicForm, PostForm, SignupForm, LoginForm);
