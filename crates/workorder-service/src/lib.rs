mod blocking;
mod http;
mod memory;
mod session;
pub mod sync;
mod traits;

pub use blocking::BlockingHttpService;
pub use http::HttpService;
pub use memory::{Dataset, MemoryService};
pub use session::SessionStore;
pub use traits::{ServiceError, WorkOrderService};
