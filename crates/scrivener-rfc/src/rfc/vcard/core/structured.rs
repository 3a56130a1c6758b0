//! Structured vCard properties.
//!
//! These properties hold multi-component values like N, ADR, ORG and GENDER.

use super::parameter::VCardParameters;
use super::property::impl_vcard_property;

/// Address (ADR property, RFC 6350 §6.3.1).
///
/// All components are optional and may hold several values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub parameters: VCardParameters,
    pub group: Option<String>,
    /// Post office box.
    pub po_box: Vec<String>,
    /// Extended address (e.g., apartment or suite number).
    pub extended: Vec<String>,
    /// Street address.
    pub street: Vec<String>,
    /// Locality (city).
    pub locality: Vec<String>,
    /// Region (state or province).
    pub region: Vec<String>,
    /// Postal code.
    pub postal_code: Vec<String>,
    /// Country name.
    pub country: Vec<String>,
}

impl_vcard_property!(Address);

impl Address {
    /// Creates an empty address.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven components in wire order.
    #[must_use]
    pub fn components(&self) -> [&[String]; 7] {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
    }

    /// The formatted label, kept in the LABEL parameter.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.parameters.label()
    }

    /// Sets or clears the formatted label.
    pub fn set_label(&mut self, label: Option<impl Into<String>>) {
        self.parameters.set_label(label);
    }
}

/// Structured name (N property, RFC 6350 §6.2.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredName {
    pub parameters: VCardParameters,
    pub group: Option<String>,
    /// Family names (surnames).
    pub family: Vec<String>,
    /// Given names (first names).
    pub given: Vec<String>,
    /// Additional names (middle names).
    pub additional: Vec<String>,
    /// Honorific prefixes (e.g., "Mr.", "Dr.").
    pub prefixes: Vec<String>,
    /// Honorific suffixes (e.g., "Jr.", "M.D.").
    pub suffixes: Vec<String>,
}

impl_vcard_property!(StructuredName);

impl StructuredName {
    /// Creates an empty structured name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a structured name with family and given names.
    #[must_use]
    pub fn simple(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: vec![family.into()],
            given: vec![given.into()],
            ..Self::default()
        }
    }

    /// The five components in wire order.
    #[must_use]
    pub fn components(&self) -> [&[String]; 5] {
        [
            &self.family,
            &self.given,
            &self.additional,
            &self.prefixes,
            &self.suffixes,
        ]
    }
}

/// Organization (ORG property, RFC 6350 §6.6.4).
///
/// The first value is the organizational name, subsequent values are
/// organizational units in order of decreasing specificity. Any of them may
/// be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub parameters: VCardParameters,
    pub group: Option<String>,
    pub values: Vec<String>,
}

impl_vcard_property!(Organization);

impl Organization {
    /// Creates an organization with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            values: vec![name.into()],
            ..Self::default()
        }
    }

    /// Creates an organization with name and units.
    #[must_use]
    pub fn with_units(name: impl Into<String>, units: Vec<String>) -> Self {
        let mut values = vec![name.into()];
        values.extend(units);
        Self {
            values,
            ..Self::default()
        }
    }

    /// The organizational name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// The organizational units.
    #[must_use]
    pub fn units(&self) -> &[String] {
        self.values.get(1..).unwrap_or_default()
    }
}

/// Gender (GENDER property, RFC 6350 §6.2.7).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gender {
    pub parameters: VCardParameters,
    pub group: Option<String>,
    /// Sex component: M, F, O, N, or U.
    pub sex: Option<Sex>,
    /// Gender identity text (free-form).
    pub identity: Option<String>,
}

impl_vcard_property!(Gender);

impl Gender {
    /// Creates a gender with just sex.
    #[must_use]
    pub fn sex(sex: Sex) -> Self {
        Self {
            sex: Some(sex),
            ..Self::default()
        }
    }

    /// Creates a gender with just identity text.
    #[must_use]
    pub fn identity(text: impl Into<String>) -> Self {
        Self {
            identity: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates a gender with both sex and identity.
    #[must_use]
    pub fn full(sex: Sex, identity: impl Into<String>) -> Self {
        Self {
            sex: Some(sex),
            identity: Some(identity.into()),
            ..Self::default()
        }
    }
}

/// Sex component of GENDER property (RFC 6350 §6.2.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
    /// None or not applicable.
    None,
    /// Unknown.
    Unknown,
}

impl Sex {
    /// Parses from single character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'M' | 'm' => Some(Self::Male),
            'F' | 'f' => Some(Self::Female),
            'O' | 'o' => Some(Self::Other),
            'N' | 'n' => Some(Self::None),
            'U' | 'u' => Some(Self::Unknown),
            _ => Option::None,
        }
    }

    /// Parses a one-character component; anything longer is rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), Option::None) => Self::from_char(c),
            _ => Option::None,
        }
    }

    /// Returns the single-character representation.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Other => 'O',
            Self::None => 'N',
            Self::Unknown => 'U',
        }
    }
}
