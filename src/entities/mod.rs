//! Entity type definitions
//!
//! - [`Client`] - Customers, with contact details
//! - [`Seller`] - Sales representatives responsible for projects
//! - [`Project`] - Furniture/renovation jobs with extras, measurements,
//!   images and attached files

pub mod client;
pub mod file;
pub mod project;
pub mod seller;

pub use client::{Client, ClientUpdate, NewClient};
pub use file::{ProjectFile, ProjectFileType};
pub use project::{
    Company, Environment, Extra, Measurement, NewProject, Project, ProjectImage, ProjectStatus,
    ProjectUpdate,
};
pub use seller::{NewSeller, Seller, SellerUpdate};
