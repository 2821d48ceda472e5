pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod normalizer;
pub mod oauth;
pub mod render;
pub mod services;
pub mod sources;
pub mod storage;
