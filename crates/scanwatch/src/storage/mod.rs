pub mod remote;

pub use remote::{UploadClient, UploadResponse, Uploader};
