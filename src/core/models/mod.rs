pub mod analytics;
pub mod audit;
pub mod question;
pub mod submission;
pub mod survey;
pub mod user;
