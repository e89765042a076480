pub mod branch;
pub mod description;
pub mod issue_key;
pub mod pull_request;
pub mod ticket;
