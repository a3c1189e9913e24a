pub mod error;
pub mod form;
pub mod hydrate;
pub mod message;
pub mod rechange;
pub mod reference;
pub mod screen;
pub mod session;
pub mod store;
pub mod work;

pub use error::{ResolveError, WorkOrderError};
pub use form::{FieldErrors, FieldValue, FormField, FormState, WorkOrderForm};
pub use message::{GlobalMessage, MessageKind};
pub use rechange::{RechangeList, RechangeRow, RowErrors};
pub use reference::{Client, Machine, Part, ReferenceLists};
pub use screen::{EditWorkScreen, Navigation, Phase};
pub use session::{Credentials, Session};
pub use store::Store;
pub use work::{MechanicRechange, MechanicWork, WorkInput, WorkPayload};
