//! Token set
//!
//! Ordered-unique string collection backed by an external attribute, with a
//! default fallback set that applies until a value has been explicitly
//! assigned. Used for the controller's `hotkeys` attribute.

/// Ordered-unique token collection.
///
/// `assigned == None` means no explicit value has ever been set and the
/// defaults are in effect. Any mutation materializes the effective list as
/// the assigned value, exactly like writing the backing attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    assigned: Option<Vec<String>>,
    defaults: Vec<String>,
}

impl TokenSet {
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assigned: None,
            defaults: dedupe(defaults.into_iter().map(Into::into)),
        }
    }

    /// Build from a backing attribute value. `None` keeps the defaults.
    pub fn from_attr<I, S>(value: Option<&str>, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new(defaults);
        if let Some(value) = value {
            set.assign(value);
        }
        set
    }

    /// Replace the assigned value from an attribute string.
    pub fn assign(&mut self, value: &str) {
        self.assigned = Some(dedupe(value.split_whitespace().map(str::to_string)));
    }

    /// The tokens currently in effect.
    pub fn effective(&self) -> &[String] {
        self.assigned.as_deref().unwrap_or(&self.defaults)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.effective().iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.effective().len()
    }

    pub fn is_empty(&self) -> bool {
        self.effective().is_empty()
    }

    pub fn add(&mut self, token: &str) {
        let mut items = self.effective().to_vec();
        if !items.iter().any(|t| t == token) {
            items.push(token.to_string());
        }
        self.assigned = Some(items);
    }

    pub fn remove(&mut self, token: &str) {
        let mut items = self.effective().to_vec();
        items.retain(|t| t != token);
        self.assigned = Some(items);
    }

    /// Returns whether the token is present afterwards.
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let present = self.contains(token);
        let want = force.unwrap_or(!present);
        if want && !present {
            self.add(token);
        } else if !want && present {
            self.remove(token);
        }
        want
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.effective().iter().map(String::as_str)
    }

    /// Space-joined effective value, as rendered into the attribute.
    pub fn value(&self) -> String {
        self.effective().join(" ")
    }

    /// The value to write back to the backing attribute; `None` while the
    /// defaults are still in effect (attribute stays unset).
    pub fn assigned_value(&self) -> Option<String> {
        self.assigned.as_ref().map(|items| items.join(" "))
    }
}

fn dedupe(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
