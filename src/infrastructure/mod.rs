pub mod http_backend;
pub mod simulated_sdk;
