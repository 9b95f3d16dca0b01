pub mod derived_writer;
pub mod submission_client;

pub use derived_writer::{DerivedFileInfo, DerivedWriter};
pub use submission_client::SubmissionClient;
