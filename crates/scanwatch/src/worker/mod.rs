pub mod dispatcher;
pub mod filter;
pub mod job;
pub mod pool;
pub mod scanner;
pub mod watcher;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use filter::EntryFilter;
pub use job::{Job, JobOrigin, JobOutcome, JobResult};
pub use pool::JobLauncher;
pub use scanner::DirectoryScanner;
pub use watcher::FileWatcher;
