//! Token API client - endpoint builders, executor and failure taxonomy

mod error;
mod executor;
mod request;

pub use error::{ErrorBody, FetchError};
pub use executor::{unwrap_envelope, Executor, HttpTransport, RawResponse, Transport};
pub use request::{Endpoints, RequestDescriptor, TransferParams, MAX_AGE_DAYS, MAX_PAGE_SIZE};
