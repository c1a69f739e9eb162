//! Include / ignore prefix filtering.

/// Decides which custom properties get renamed.
///
/// Prefixes are matched literally and case-sensitively against the name without its leading
/// `--`, so `ignore` matches both `--ignore-foo` and `--ignored`. When include prefixes are
/// configured a name must start with one of them; ignore prefixes then veto what is left.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixFilter {
    include: Vec<String>,
    ignore: Vec<String>,
}

impl PrefixFilter {
    pub fn new(include: Vec<String>, ignore: Vec<String>) -> Self {
        Self { include, ignore }
    }

    /// Filter that lets every name through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Whether `name` (a custom property name without the leading `--`) should be renamed.
    pub fn should_rewrite(&self, name: &str) -> bool {
        let starts_with_any =
            |prefixes: &[String]| prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()));
        if !self.include.is_empty() && !starts_with_any(&self.include) {
            return false;
        }
        !starts_with_any(&self.ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|&prefix| prefix.to_owned()).collect()
    }

    #[test]
    fn empty_filter_allows_everything() {
        let filter = PrefixFilter::allow_all();
        assert!(filter.should_rewrite("anything"));
        assert!(filter.should_rewrite(""));
    }

    #[test]
    fn ignore_is_a_plain_prefix_match() {
        let filter = PrefixFilter::new(Vec::new(), prefixes(&["ignore"]));
        assert!(!filter.should_rewrite("ignore"));
        assert!(!filter.should_rewrite("ignore-foo"));
        assert!(!filter.should_rewrite("ignored"));
        assert!(filter.should_rewrite("test"));
        assert!(filter.should_rewrite("Ignore"));
    }

    #[test]
    fn include_narrows_then_ignore_vetoes() {
        let filter = PrefixFilter::new(prefixes(&["brand", "ui"]), prefixes(&["brand-legacy"]));
        assert!(filter.should_rewrite("brand-primary"));
        assert!(filter.should_rewrite("ui-gap"));
        assert!(!filter.should_rewrite("spacing"));
        assert!(!filter.should_rewrite("brand-legacy-red"));
    }
}
