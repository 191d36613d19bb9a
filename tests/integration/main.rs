//! Integration tests — exercise the assistant flows and the HTTP API
//! end to end against a scripted in-memory gateway.

mod mock_gateway;

mod api;
mod flows;
