pub mod catalog;
pub mod product;
pub mod profile;
pub mod report;
