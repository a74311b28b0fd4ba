//! Registration form data and validation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A field of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    EntryNumber,
    PhoneNumber,
    Town,
    State,
    Remarks,
}

impl FormField {
    /// All fields in display order
    pub const ALL: [FormField; 6] = [
        Self::FullName,
        Self::EntryNumber,
        Self::PhoneNumber,
        Self::Town,
        Self::State,
        Self::Remarks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::EntryNumber => "entryNumber",
            Self::PhoneNumber => "phoneNumber",
            Self::Town => "town",
            Self::State => "state",
            Self::Remarks => "remarks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::EntryNumber => "Entry Number",
            Self::PhoneNumber => "Phone Number",
            Self::Town => "Town",
            Self::State => "State",
            Self::Remarks => "Remarks",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Remarks)
    }

    pub fn required_message(&self) -> String {
        format!("{} is required.", self.label())
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current values of the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub full_name: String,
    pub entry_number: String,
    pub phone_number: String,
    pub town: String,
    pub state: String,
    /// Optional; empty means absent
    #[serde(default)]
    pub remarks: String,
}

impl RegistrationForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::EntryNumber => &self.entry_number,
            FormField::PhoneNumber => &self.phone_number,
            FormField::Town => &self.town,
            FormField::State => &self.state,
            FormField::Remarks => &self.remarks,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::FullName => &mut self.full_name,
            FormField::EntryNumber => &mut self.entry_number,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::Town => &mut self.town,
            FormField::State => &mut self.state,
            FormField::Remarks => &mut self.remarks,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// Per-field error messages; a missing key means the field is valid
pub type FormErrors = BTreeMap<FormField, String>;

/// Check that every required field has a value.
///
/// Only emptiness is checked: values are not trimmed and their shape is not
/// inspected, so a phone number of "abc" passes.
pub fn validate(form: &RegistrationForm) -> FormErrors {
    FormField::ALL
        .iter()
        .filter(|field| field.is_required() && form.get(**field).is_empty())
        .map(|field| (*field, field.required_message()))
        .collect()
}
