pub mod thumbnail;

pub use thumbnail::{ProcessingReport, ThumbnailService};
