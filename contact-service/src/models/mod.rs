pub mod event;
pub mod relay;
pub mod submission;

pub use event::{EventError, FunctionEvent};
pub use relay::{RelayRequest, RelayResponse, SUCCESS_MESSAGE};
pub use submission::{ContactForm, ContactSubmission, FormError};
