//! Violation collector shared by the section validators.

use std::fmt::Display;
use std::ops::RangeInclusive;

/// Checks for one config section. Every violation is recorded against the
/// section-qualified key (`reconnect.jitter`), matching how the key is
/// written in the TOML file.
pub(crate) struct SectionCheck<'a> {
    section: &'static str,
    errors: &'a mut Vec<String>,
}

impl<'a> SectionCheck<'a> {
    pub(crate) fn new(section: &'static str, errors: &'a mut Vec<String>) -> Self {
        Self { section, errors }
    }

    /// `value` must lie in `bounds`. NaN never does.
    pub(crate) fn within<T>(&mut self, key: &str, value: T, bounds: RangeInclusive<T>)
    where
        T: PartialOrd + Display,
    {
        if !bounds.contains(&value) {
            self.fail(
                key,
                format_args!(
                    "= {value} must be between {} and {}",
                    bounds.start(),
                    bounds.end()
                ),
            );
        }
    }

    /// Record `problem` against `key` unless `ok`.
    pub(crate) fn ensure(&mut self, ok: bool, key: &str, problem: impl Display) {
        if !ok {
            self.fail(key, problem);
        }
    }

    fn fail(&mut self, key: &str, problem: impl Display) {
        self.errors.push(format!("{}.{key} {problem}", self.section));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_key_with_section() {
        let mut errors = Vec::new();
        SectionCheck::new("reconnect", &mut errors).within("max_attempts", 0u32, 1..=100);
        assert_eq!(
            errors,
            vec!["reconnect.max_attempts = 0 must be between 1 and 100"]
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut errors = Vec::new();
        let mut check = SectionCheck::new("server", &mut errors);
        check.within("keepalive_interval_secs", 0u32, 0..=300);
        check.within("keepalive_interval_secs", 300u32, 0..=300);
        check.within("jitter", 1.0, 0.0..=1.0);
        assert!(errors.is_empty());
    }

    #[test]
    fn nan_is_out_of_range() {
        let mut errors = Vec::new();
        SectionCheck::new("reconnect", &mut errors).within("jitter", f64::NAN, 0.0..=1.0);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("reconnect.jitter = NaN"));
    }

    #[test]
    fn ensure_records_only_failures() {
        let mut errors = Vec::new();
        let mut check = SectionCheck::new("server", &mut errors);
        check.ensure(true, "host", "must not be empty");
        check.ensure(false, "path_prefix", "must start with '/'");
        assert_eq!(errors, vec!["server.path_prefix must start with '/'"]);
    }
}
