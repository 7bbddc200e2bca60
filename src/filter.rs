// @file filter.rs
// @brief fur-color selection state

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("unknown fur color {0:?}")]
pub struct UnknownCategory(pub String);

/// One toggle per category, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    toggles: Vec<(String, bool)>,
}

impl FilterState {
    /// All categories start selected.
    pub fn new(categories: &[String]) -> FilterState {
        let mut toggles: Vec<(String, bool)> = Vec::new();
        for c in categories {
            if !toggles.iter().any(|(name, _)| name == c) {
                toggles.push((c.clone(), true));
            }
        }
        FilterState { toggles }
    }

    fn position(&self, category: &str) -> Result<usize, UnknownCategory> {
        self.toggles
            .iter()
            .position(|(name, _)| name == category)
            .ok_or_else(|| UnknownCategory(category.to_string()))
    }

    /// Returns true if the selection changed.
    pub fn set(&mut self, category: &str, selected: bool) -> Result<bool, UnknownCategory> {
        let i = self.position(category)?;
        let changed = self.toggles[i].1 != selected;
        self.toggles[i].1 = selected;
        Ok(changed)
    }

    /// Flips one toggle; returns the new state.
    pub fn toggle(&mut self, category: &str) -> Result<bool, UnknownCategory> {
        let i = self.position(category)?;
        self.toggles[i].1 = !self.toggles[i].1;
        Ok(self.toggles[i].1)
    }

    pub fn select_all(&mut self) -> bool {
        self.set_every(true)
    }

    pub fn clear_all(&mut self) -> bool {
        self.set_every(false)
    }

    fn set_every(&mut self, selected: bool) -> bool {
        let mut changed = false;
        for (_, s) in self.toggles.iter_mut() {
            changed |= *s != selected;
            *s = selected;
        }
        changed
    }

    /// Selects exactly the categories matching `pattern`.
    pub fn select_matching(&mut self, pattern: &Regex) -> bool {
        let mut changed = false;
        for (name, s) in self.toggles.iter_mut() {
            let selected = pattern.is_match(name);
            changed |= *s != selected;
            *s = selected;
        }
        changed
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.toggles.iter().any(|(name, s)| *s && name == category)
    }

    pub fn selected(&self) -> Vec<&str> {
        self.toggles.iter().filter(|(_, s)| *s).map(|(name, _)| name.as_str()).collect()
    }

    pub fn toggles(&self) -> &[(String, bool)] {
        &self.toggles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FilterState {
        let names = ["Gray", "Cinnamon", "Black", "Gray"].map(String::from);
        FilterState::new(&names)
    }

    #[test]
    fn test_defaults_selected_in_order() {
        let f = state();
        assert_eq!(f.selected(), vec!["Gray", "Cinnamon", "Black"]);
        assert_eq!(f.toggles().len(), 3);
    }

    #[test]
    fn test_toggle_and_set() {
        let mut f = state();
        assert_eq!(f.toggle("Black"), Ok(false));
        assert!(!f.is_selected("Black"));
        assert_eq!(f.set("Black", false), Ok(false));
        assert_eq!(f.set("Black", true), Ok(true));
        assert_eq!(f.toggle("White"), Err(UnknownCategory("White".to_string())));
    }

    #[test]
    fn test_bulk_actions() {
        let mut f = state();
        assert!(!f.select_all());
        assert!(f.clear_all());
        assert!(f.selected().is_empty());
        assert!(!f.clear_all());
        assert!(f.select_all());
        assert_eq!(f.selected().len(), 3);
    }

    #[test]
    fn test_select_matching() {
        let mut f = state();
        assert!(f.select_matching(&Regex::new("^(Gray|Black)$").unwrap()));
        assert_eq!(f.selected(), vec!["Gray", "Black"]);
    }
}
