//! Request construction, response classification and the retrying executor.
mod classify;
mod client;
mod executor;
mod request;

#[cfg(test)]
mod test_support;

pub use classify::{Classification, TransientSignature, classify};
pub use client::build_client;
pub use executor::{ExecutorConfig, RequestExecutor, RetryPolicy};
pub use request::{RequestSpec, load_body, mask_secret};
