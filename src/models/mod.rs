// src/models/mod.rs

pub mod analytics;
pub mod attempt;
pub mod question;
pub mod result_record;
pub mod subject;
