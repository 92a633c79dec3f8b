//! Installed-package inventory for depsweep.
//!
//! This module maps each installed distribution to the import identifiers
//! it provides, read from the metadata left in site-packages directories.
//! The environment is reached only through the [`PackageSource`] trait, so
//! callers can substitute a fixed [`Inventory`].

pub mod site_packages;
pub mod types;

pub use site_packages::{
    package_name_from_metadata_dir, InventoryError, InventoryResult, PackageSource, SitePackages,
};
pub use types::Inventory;
