//! Pattern registry

use std::fmt;
use std::sync::Arc;

use complimask_domain::{MaskError, MaskLevel, PatternInfo, Result};
use parking_lot::RwLock;
use tracing::debug;

/// Inputs a transform may specialise on besides the value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternContext {
    /// Data type token, e.g. `SSN`.
    pub data_type: String,
    /// Role the value is rendered for.
    pub role: String,
}

impl PatternContext {
    /// Context for rendering a `data_type` value to `role`.
    pub fn new(data_type: impl Into<String>, role: impl Into<String>) -> Self {
        Self { data_type: data_type.into(), role: role.into() }
    }
}

/// Shared transform function.
pub type Transform = Arc<dyn Fn(&str, &PatternContext) -> String + Send + Sync>;

/// A named transform implementing one mask level.
///
/// A pattern with no `data_types` applies to any data type.
#[derive(Clone)]
pub struct MaskPattern {
    /// Unique registry key.
    pub id: String,
    /// Display name; defaults to the id.
    pub name: String,
    pub description: String,
    /// Level this pattern implements.
    pub level: MaskLevel,
    /// Data types the pattern is restricted to; empty means any.
    pub data_types: Vec<String>,
    transform: Transform,
}

impl MaskPattern {
    /// Generic pattern for `level`, named after its id.
    pub fn new<F>(id: impl Into<String>, level: MaskLevel, transform: F) -> Self
    where
        F: Fn(&str, &PatternContext) -> String + Send + Sync + 'static,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            level,
            data_types: Vec::new(),
            transform: Arc::new(transform),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description shown in service discovery.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restrict the pattern to the given data types.
    pub fn for_data_types<I, S>(mut self, data_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_types = data_types.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the pattern applies to every data type.
    pub fn is_generic(&self) -> bool {
        self.data_types.is_empty()
    }

    /// Whether the pattern may render a `data_type` value.
    pub fn applies_to(&self, data_type: &str) -> bool {
        self.is_generic() || self.data_types.iter().any(|dt| dt == data_type)
    }

    /// Run the transform.
    pub fn apply(&self, value: &str, context: &PatternContext) -> String {
        (self.transform)(value, context)
    }

    /// Discovery view; generic patterns list their data types as `["all"]`.
    pub fn info(&self) -> PatternInfo {
        PatternInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            level: self.level,
            data_types: if self.is_generic() {
                vec!["all".to_string()]
            } else {
                self.data_types.clone()
            },
        }
    }
}

impl fmt::Debug for MaskPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskPattern")
            .field("id", &self.id)
            .field("level", &self.level)
            .field("data_types", &self.data_types)
            .finish_non_exhaustive()
    }
}

/// Ordered catalogue of mask patterns.
///
/// Registration order is significant: `find_by_level` returns the first
/// match. Patterns sit behind a `RwLock` and lookups return clones.
#[derive(Default)]
pub struct PatternRegistry {
    patterns: RwLock<Vec<MaskPattern>>,
}

impl PatternRegistry {
    /// Empty registry. See [`PatternRegistry::with_builtins`] for the
    /// standard catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern, replacing any pattern with the same id in place.
    pub fn register(&self, pattern: MaskPattern) {
        let mut patterns = self.patterns.write();
        if let Some(existing) = patterns.iter_mut().find(|p| p.id == pattern.id) {
            debug!(pattern_id = %pattern.id, "replacing mask pattern");
            *existing = pattern;
        } else {
            debug!(pattern_id = %pattern.id, level = %pattern.level, "registering mask pattern");
            patterns.push(pattern);
        }
    }

    /// Remove a pattern; returns it if it was registered.
    pub fn unregister(&self, id: &str) -> Option<MaskPattern> {
        let mut patterns = self.patterns.write();
        let index = patterns.iter().position(|p| p.id == id)?;
        Some(patterns.remove(index))
    }

    /// Pattern registered under `id`.
    ///
    /// ```
    /// use complimask_core::patterns::{ids, PatternContext, PatternRegistry};
    ///
    /// let registry = PatternRegistry::with_builtins();
    /// let pattern = registry.get(ids::PARTIAL_LAST4).expect("built-in pattern");
    /// let context = PatternContext::new("SSN", "Teller");
    /// assert_eq!(pattern.apply("123-45-6789", &context), "***-**-6789");
    /// assert!(registry.get("UNKNOWN").is_none());
    /// ```
    pub fn get(&self, id: &str) -> Option<MaskPattern> {
        self.patterns.read().iter().find(|p| p.id == id).cloned()
    }

    /// All patterns in registration order.
    pub fn list(&self) -> Vec<MaskPattern> {
        self.patterns.read().clone()
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Whether no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }

    /// First registered pattern for `level`.
    pub fn find_by_level(&self, level: MaskLevel) -> Option<MaskPattern> {
        self.patterns.read().iter().find(|p| p.level == level).cloned()
    }

    /// Patterns that are generic or list `data_type`.
    pub fn find_for_data_type(&self, data_type: &str) -> Vec<MaskPattern> {
        self.patterns.read().iter().filter(|p| p.applies_to(data_type)).cloned().collect()
    }

    /// Pattern implementing `level` for `data_type`.
    ///
    /// A pattern restricted to `data_type` wins over generic ones.
    pub fn resolve(&self, level: MaskLevel, data_type: &str) -> Option<MaskPattern> {
        let patterns = self.patterns.read();
        let mut candidates =
            patterns.iter().filter(|p| p.level == level && p.applies_to(data_type));
        let first = candidates.next()?;
        if !first.is_generic() {
            return Some(first.clone());
        }
        candidates.find(|p| !p.is_generic()).or(Some(first)).cloned()
    }

    /// Apply the pattern registered under `id`.
    ///
    /// # Errors
    /// Returns `MaskError::NotFound` if no pattern has that id.
    pub fn apply(&self, id: &str, value: &str, context: &PatternContext) -> Result<String> {
        let pattern = self.get(id).ok_or_else(|| MaskError::not_found("mask pattern", id))?;
        Ok(pattern.apply(value, context))
    }

    /// Apply the pattern [`resolve`](Self::resolve)d for `level`.
    ///
    /// # Errors
    /// Returns `MaskError::NotFound` if no pattern implements `level`.
    pub fn apply_level(
        &self,
        level: MaskLevel,
        value: &str,
        context: &PatternContext,
    ) -> Result<String> {
        let pattern = self
            .resolve(level, &context.data_type)
            .ok_or_else(|| MaskError::not_found("mask pattern for level", level.as_str()))?;
        Ok(pattern.apply(value, context))
    }
}

impl fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRegistry").field("patterns", &self.len()).finish()
    }
}
