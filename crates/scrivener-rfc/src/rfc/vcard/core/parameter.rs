//! vCard parameter types.

use super::data_type::VCardDataType;

/// Well-known parameter names.
pub mod names {
    pub const TYPE: &str = "TYPE";
    pub const PREF: &str = "PREF";
    pub const VALUE: &str = "VALUE";
    pub const LABEL: &str = "LABEL";
    pub const MEDIATYPE: &str = "MEDIATYPE";
    pub const ENCODING: &str = "ENCODING";
    pub const CHARSET: &str = "CHARSET";
    pub const LANGUAGE: &str = "LANGUAGE";
    pub const ALTID: &str = "ALTID";
    pub const PID: &str = "PID";
}

/// A vCard parameter.
///
/// Parameters can have multiple values (e.g., TYPE=home,work).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCardParameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values.
    pub values: Vec<String>,
}

impl VCardParameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

/// The parameters of one property.
///
/// An ordered multimap with case-insensitive names. `Clone` is a deep copy,
/// which is what the write path relies on when it rewrites parameters for a
/// target version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VCardParameters {
    params: Vec<VCardParameter>,
}

impl VCardParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of distinct parameter names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterates over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &VCardParameter> {
        self.params.iter()
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VCardParameter> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the first value of a parameter.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)?.value()
    }

    /// Returns all values of a parameter.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|p| p.values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns whether the parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends a value, creating the parameter if needed.
    pub fn put(&mut self, name: &str, value: impl Into<String>) {
        if let Some(param) = self
            .params
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
        {
            param.values.push(value.into());
        } else {
            self.params.push(VCardParameter::new(name, value));
        }
    }

    /// Appends several values.
    pub fn put_all<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.put(name, value);
        }
    }

    /// Replaces all values of a parameter with a single value.
    pub fn replace(&mut self, name: &str, value: impl Into<String>) {
        self.remove_all(name);
        self.params.push(VCardParameter::new(name, value));
    }

    /// Removes a parameter entirely, returning its values.
    pub fn remove_all(&mut self, name: &str) -> Vec<String> {
        if let Some(pos) = self
            .params
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
        {
            self.params.remove(pos).values
        } else {
            Vec::new()
        }
    }

    /// Removes one value (case-insensitive). Drops the parameter when its
    /// last value goes.
    pub fn remove_value(&mut self, name: &str, value: &str) {
        if let Some(pos) = self
            .params
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
        {
            let param = &mut self.params[pos];
            if let Some(idx) = param
                .values
                .iter()
                .position(|v| v.eq_ignore_ascii_case(value))
            {
                param.values.remove(idx);
            }
            if param.values.is_empty() {
                self.params.remove(pos);
            }
        }
    }

    /// Sets or clears a single-valued parameter.
    pub fn set(&mut self, name: &str, value: Option<impl Into<String>>) {
        match value {
            Some(value) => self.replace(name, value),
            None => {
                self.remove_all(name);
            }
        }
    }

    // --- Typed accessors ---

    /// Returns the TYPE values.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.values(names::TYPE)
    }

    /// Returns whether a TYPE value is present (case-insensitive).
    #[must_use]
    pub fn has_type(&self, value: &str) -> bool {
        self.get(names::TYPE).is_some_and(|p| p.has_value(value))
    }

    /// Adds a TYPE value.
    pub fn add_type(&mut self, value: impl Into<String>) {
        self.put(names::TYPE, value);
    }

    /// Returns the PREF rank if present and numeric.
    ///
    /// Ranks outside 1-100 are still returned; validation reports them.
    #[must_use]
    pub fn pref(&self) -> Option<u32> {
        self.first(names::PREF)?.trim().parse().ok()
    }

    /// Sets or clears the PREF rank.
    pub fn set_pref(&mut self, pref: Option<u32>) {
        self.set(names::PREF, pref.map(|p| p.to_string()));
    }

    /// Returns the LABEL parameter (formatted address text).
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.first(names::LABEL)
    }

    /// Sets or clears the LABEL parameter.
    pub fn set_label(&mut self, label: Option<impl Into<String>>) {
        self.set(names::LABEL, label);
    }

    /// Returns the MEDIATYPE parameter.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.first(names::MEDIATYPE)
    }

    /// Returns the ENCODING parameter.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.first(names::ENCODING)
    }

    /// Returns the data type declared by the VALUE parameter.
    #[must_use]
    pub fn value_type(&self) -> Option<VCardDataType> {
        self.first(names::VALUE).map(VCardDataType::parse)
    }
}

impl<'a> IntoIterator for &'a VCardParameters {
    type Item = &'a VCardParameter;
    type IntoIter = std::slice::Iter<'a, VCardParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl FromIterator<VCardParameter> for VCardParameters {
    fn from_iter<T: IntoIterator<Item = VCardParameter>>(iter: T) -> Self {
        let mut params = Self::new();
        for param in iter {
            params.put_all(&param.name, param.values);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_single_value() {
        let param = VCardParameter::new("type", "home");
        assert_eq!(param.name, "TYPE");
        assert_eq!(param.value(), Some("home"));
    }

    #[test]
    fn parameter_has_value() {
        let param = VCardParameter::multi("TYPE", vec!["home".into(), "work".into()]);
        assert!(param.has_value("home"));
        assert!(param.has_value("HOME"));
        assert!(param.has_value("work"));
        assert!(!param.has_value("cell"));
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut params = VCardParameters::new();
        params.put("type", "home");
        params.put("Type", "work");

        assert_eq!(params.len(), 1);
        assert_eq!(params.types(), vec!["home", "work"]);
        assert!(params.has_type("WORK"));
    }

    #[test]
    fn replace_and_remove() {
        let mut params = VCardParameters::new();
        params.put_all("TYPE", ["home", "pref"]);
        params.remove_value("type", "PREF");
        assert_eq!(params.types(), vec!["home"]);

        params.remove_value("TYPE", "home");
        assert!(!params.contains("TYPE"));

        params.replace("LABEL", "a");
        params.replace("label", "b");
        assert_eq!(params.values("LABEL"), vec!["b"]);
    }

    #[test]
    fn pref_parses_numbers_only() {
        let mut params = VCardParameters::new();
        assert_eq!(params.pref(), None);

        params.set_pref(Some(10));
        assert_eq!(params.pref(), Some(10));

        params.replace("PREF", "high");
        assert_eq!(params.pref(), None);

        params.set_pref(None);
        assert!(!params.contains("PREF"));
    }

    #[test]
    fn clone_is_independent() {
        let mut original = VCardParameters::new();
        original.set_label(Some("123 Main St"));

        let mut copy = original.clone();
        copy.set_label(None::<String>);

        assert_eq!(original.label(), Some("123 Main St"));
        assert_eq!(copy.label(), None);
    }

    #[test]
    fn value_type_parses() {
        let mut params = VCardParameters::new();
        params.put("VALUE", "URI");
        assert_eq!(params.value_type(), Some(VCardDataType::Uri));
    }
}
