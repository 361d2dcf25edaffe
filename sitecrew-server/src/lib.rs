//! sitecrew-server: generate, version and preview static sites over HTTP.
//!
//! A request runs the two-agent crew from `sitecrew-agents`, pulls the HTML
//! out of its answer, writes it to the preview directory and records the
//! site (or new version) in a single JSON metadata document.

pub mod allocator;
pub mod artifact;
pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod service;
pub mod store;
pub mod web;
