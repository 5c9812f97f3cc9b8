//! Registry settings.

/// Tunables for a [`Registry`](crate::registry::Registry).
///
/// # Examples
/// ```
/// use sijill_container::settings::RegistrySettings;
///
/// let settings = RegistrySettings::default();
/// assert!(settings.suggestions);
/// assert_eq!(settings.max_suggestions, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Attach "did you mean?" names to not-found errors.
    pub suggestions: bool,
    /// Upper bound on suggested names per error.
    pub max_suggestions: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            suggestions: true,
            max_suggestions: 3,
        }
    }
}

impl RegistrySettings {
    /// Settings with suggestions turned off.
    pub fn quiet() -> Self {
        Self {
            suggestions: false,
            ..Self::default()
        }
    }

    /// Effective suggestion limit; zero when suggestions are off.
    pub(crate) fn suggestion_limit(&self) -> usize {
        if self.suggestions { self.max_suggestions } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_disables_suggestions() {
        let settings = RegistrySettings::quiet();
        assert!(!settings.suggestions);
        assert_eq!(settings.suggestion_limit(), 0);
    }

    #[test]
    fn default_limit() {
        assert_eq!(RegistrySettings::default().suggestion_limit(), 3);
    }
}
