//! imgpick library root — the core pipeline, exposed for integration tests
//! and embedding in a host chat framework.
//!
//! Pipeline: [`request::RequestTemplate`] builds the URL, [`fetch::Fetcher`]
//! performs the GET, [`resolver::resolve`] classifies the response, and
//! [`agent::ImageAgent`] orchestrates one invocation into a
//! [`sink::SinkMessage`] for whatever [`sink::DeliverySink`] the host wires
//! in. The binary entry point is `src/main.rs`.

pub mod agent;
pub mod config;
pub mod console;
pub mod error;
pub mod fetch;
pub mod logger;
pub mod request;
pub mod resolver;
pub mod sink;
