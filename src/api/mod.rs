//! Transport layer: the connection seam, the reqwest-backed implementation
//! and verification of API responses.

pub use self::{
    client::{join_segments, parse_api_url, RealConnection, RealConnectionManager},
    connection::{Connection, ConnectionManager, RequestArguments, RequestFiles, Response},
    models::{resource_id, StatusEnvelope},
    verify::{verify_request_succeeded, ResponseVerifyingConnection},
};

mod client;
mod connection;
mod models;
mod verify;
