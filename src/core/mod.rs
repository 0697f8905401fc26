//! Core module - store, identity and derived views

pub mod attachments;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod entity;
pub mod forms;
pub mod identity;
pub mod progress;
pub mod query;
pub mod seed;
pub mod shortid;
pub mod store;

pub use attachments::AttachmentError;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use dashboard::{DashboardStats, DateRange};
pub use entity::{Entity, Update};
pub use forms::{ClientForm, ProjectForm, SellerForm, ValidationError};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use query::{FileListView, FileSortField, ProjectFilter, SortDirection};
pub use shortid::{ShortIdError, ShortIdIndex};
pub use store::{EntityStore, StoreSnapshot};
