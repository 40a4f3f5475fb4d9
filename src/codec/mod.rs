//! Audio codec bus glue

pub mod adau1372;
