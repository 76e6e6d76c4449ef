//! Acceptance rules shared by the create and edit brand forms.
//!
//! Validation is synchronous and pure: it reads a [`BrandFormValues`] and
//! produces a [`FormErrors`] map holding one message per failing field. The
//! active flag has no invalid state and is therefore not part of the values
//! checked here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::ChainId;

/// Maximum brand name length in UTF-16 code units, counted after trimming.
pub const BRAND_NAME_MAX_LEN: usize = 50;

pub const BRAND_NAME_REQUIRED: &str = "Brand name is required";
pub const BRAND_NAME_TOO_LONG: &str = "Brand name must not exceed 50 characters";
pub const COMPANY_REQUIRED: &str = "Please select a company";

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormField {
    #[serde(rename = "brandName")]
    BrandName,
    #[serde(rename = "chainId")]
    ChainId,
}

impl FormField {
    /// Wire name used by the REST API.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::BrandName => "brandName",
            FormField::ChainId => "chainId",
        }
    }

    /// Message for a field whose rule failed without supplying one.
    pub fn missing_message(&self) -> &'static str {
        match self {
            FormField::BrandName => BRAND_NAME_REQUIRED,
            FormField::ChainId => COMPANY_REQUIRED,
        }
    }

    /// Resolves both the wire (`brandName`) and the struct (`brand_name`) spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brandName" | "brand_name" => Some(FormField::BrandName),
            "chainId" | "chain_id" => Some(FormField::ChainId),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to human-readable message; only failing fields are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drops the error for `field`, if any.
    pub fn clear(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    /// Copies every entry of `other` over this map.
    pub fn merge(&mut self, other: &FormErrors) {
        for (field, message) in other.iter() {
            self.0.insert(field, message.to_string());
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Builds field errors from a server `details` object, skipping fields
    /// the form does not render.
    pub fn from_server_details<'a, I>(details: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut errors = Self::new();
        for (name, message) in details {
            if let Some(field) = FormField::from_name(name) {
                errors.insert(field, message.clone());
            }
        }
        errors
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (name, field_errors) in errors.field_errors() {
            let Some(field) = FormField::from_name(name) else {
                continue;
            };
            let message = field_errors
                .first()
                .and_then(|err| err.message.as_ref())
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| field.missing_message().to_string());
            form_errors.insert(field, message);
        }
        form_errors
    }
}

/// Candidate values of a brand form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BrandFormValues {
    #[validate(custom = "validate_brand_name")]
    pub brand_name: String,

    #[validate(required)]
    pub chain_id: Option<ChainId>,
}

impl BrandFormValues {
    pub fn new(brand_name: impl Into<String>, chain_id: Option<ChainId>) -> Self {
        Self {
            brand_name: brand_name.into(),
            chain_id,
        }
    }

    /// Runs every rule and returns the failing fields. An empty map means the
    /// values may be submitted.
    pub fn check(&self) -> FormErrors {
        match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(errors) => FormErrors::from(&errors),
        }
    }

    /// The name as it is sent to the server.
    pub fn trimmed_name(&self) -> &str {
        trim_name(&self.brand_name)
    }
}

/// Strips surrounding whitespace, including the U+FEFF byte order mark.
pub fn trim_name(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Length as the server measures it: UTF-16 code units.
pub fn name_length(name: &str) -> usize {
    name.encode_utf16().count()
}

/// Convenience wrapper over [`BrandFormValues::check`].
pub fn validate_brand_form(brand_name: &str, chain_id: Option<ChainId>) -> FormErrors {
    BrandFormValues::new(brand_name, chain_id).check()
}

fn validate_brand_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = trim_name(name);

    if trimmed.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(BRAND_NAME_REQUIRED.into());
        return Err(err);
    }

    if name_length(trimmed) > BRAND_NAME_MAX_LEN {
        let mut err = ValidationError::new("too_long");
        err.message = Some(BRAND_NAME_TOO_LONG.into());
        return Err(err);
    }

    Ok(())
}
