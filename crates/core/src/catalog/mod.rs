//! Workflow template catalog.
//!
//! A [`Catalog`] is an immutable, validated list of templates. Callers share it
//! as `Arc<Catalog>` snapshots handed out by [`CatalogStore`], which applies
//! runtime edits copy-on-write so a reader never sees a half-applied change.

mod builtin;

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use thiserror::Error;

use crate::domain::template::{BusinessSize, Complexity, Template, TemplateCategory};
use crate::errors::DomainError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateQuery {
    pub text: Option<String>,
    pub category: Option<TemplateCategory>,
    pub complexity: Option<Complexity>,
    pub business_size: Option<BusinessSize>,
    pub tags: Vec<String>,
    pub max_price: Option<u32>,
}

impl TemplateQuery {
    fn matches(&self, template: &Template) -> bool {
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|text| !text.is_empty()) {
            let needle = text.to_lowercase();
            let hit = template.name.to_lowercase().contains(&needle)
                || template.description.to_lowercase().contains(&needle)
                || template.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
                || template.features.iter().any(|feature| feature.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if self.category.is_some_and(|category| category != template.category) {
            return false;
        }
        if self.complexity.is_some_and(|complexity| complexity != template.complexity) {
            return false;
        }
        if self.business_size.is_some_and(|size| size != template.business_size) {
            return false;
        }
        if self.max_price.is_some_and(|max_price| template.price > max_price) {
            return false;
        }

        self.tags.is_empty()
            || self.tags.iter().any(|wanted| {
                template.tags.iter().any(|tag| tag.eq_ignore_ascii_case(wanted.trim()))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: TemplateCategory,
    pub count: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    templates: Vec<Arc<Template>>,
}

impl Catalog {
    /// Builds a catalog, rejecting blank or duplicate ids.
    pub fn new(templates: Vec<Template>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(templates.len());
        for template in &templates {
            let id = template.id.as_str().trim();
            if id.is_empty() {
                return Err(DomainError::InvariantViolation(
                    "template id must not be empty".to_string(),
                ));
            }
            if template.name.trim().is_empty() {
                return Err(DomainError::InvariantViolation(format!(
                    "template `{id}` must have a name"
                )));
            }
            if !seen.insert(id.to_string()) {
                return Err(DomainError::DuplicateTemplate(id.to_string()));
            }
        }

        Ok(Self { templates: templates.into_iter().map(Arc::new).collect() })
    }

    pub fn builtin() -> Self {
        Self { templates: builtin::builtin_templates().into_iter().map(Arc::new).collect() }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let templates: Vec<Template> = serde_json::from_str(raw)?;
        Ok(Self::new(templates)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    /// Loads `path` when given, otherwise falls back to the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[Arc<Template>] {
        &self.templates
    }

    pub fn find(&self, template_id: &str) -> Option<&Arc<Template>> {
        self.templates.iter().find(|template| template.id.as_str() == template_id)
    }

    pub fn search(&self, query: &TemplateQuery) -> Vec<Arc<Template>> {
        self.templates.iter().filter(|template| query.matches(template)).cloned().collect()
    }

    /// Category counts in first-seen catalog order.
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = Vec::new();
        for template in &self.templates {
            match counts.iter_mut().find(|entry| entry.category == template.category) {
                Some(entry) => entry.count += 1,
                None => counts.push(CategoryCount { category: template.category, count: 1 }),
            }
        }
        counts
    }

    pub fn tags(&self) -> Vec<String> {
        self.templates
            .iter()
            .flat_map(|template| template.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn with_added(&self, template: Template) -> Result<Self, DomainError> {
        if self.find(template.id.as_str()).is_some() {
            return Err(DomainError::DuplicateTemplate(template.id.0));
        }
        let mut templates = self.templates.iter().map(|t| t.as_ref().clone()).collect::<Vec<_>>();
        templates.push(template);
        Self::new(templates)
    }

    fn with_replaced(&self, template_id: &str, template: Template) -> Result<Self, DomainError> {
        let position = self
            .templates
            .iter()
            .position(|existing| existing.id.as_str() == template_id)
            .ok_or_else(|| DomainError::TemplateNotFound(template_id.to_string()))?;

        let mut templates = self.templates.clone();
        templates[position] = Arc::new(template);
        Self::new(templates.iter().map(|t| t.as_ref().clone()).collect())
    }

    fn without(&self, template_id: &str) -> Result<(Self, Arc<Template>), DomainError> {
        let position = self
            .templates
            .iter()
            .position(|existing| existing.id.as_str() == template_id)
            .ok_or_else(|| DomainError::TemplateNotFound(template_id.to_string()))?;

        let mut templates = self.templates.clone();
        let removed = templates.remove(position);
        Ok((Self { templates }, removed))
    }
}

/// Shared holder for the current catalog snapshot.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self { current: RwLock::new(Arc::new(catalog)) }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace(&self, catalog: Catalog) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    pub fn add(&self, template: Template) -> Result<(), DomainError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = current.with_added(template)?;
        *current = Arc::new(next);
        Ok(())
    }

    pub fn update(&self, template_id: &str, template: Template) -> Result<(), DomainError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = current.with_replaced(template_id, template)?;
        *current = Arc::new(next);
        Ok(())
    }

    pub fn remove(&self, template_id: &str) -> Result<Arc<Template>, DomainError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let (next, removed) = current.without(template_id)?;
        *current = Arc::new(next);
        Ok(removed)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}
