pub mod accounts;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod recommend;

pub use accounts::UserDirectory;
pub use catalog::{Catalog, CatalogError, CatalogStore, CategoryCount, TemplateQuery};
pub use domain::account::{Plan, User, UserId};
pub use domain::conversation::{ChatMessage, Role};
pub use domain::profile::BusinessProfile;
pub use domain::recommendation::{ImplementationStep, Recommendation};
pub use domain::template::{BusinessSize, Complexity, Template, TemplateCategory, TemplateId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use extract::{extract_from_transcript, extract_profile};
pub use recommend::{recommend, TemplateRecommender};
