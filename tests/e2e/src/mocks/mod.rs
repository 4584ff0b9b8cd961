//! Mock collaborators and test data factories

pub mod fixtures;
