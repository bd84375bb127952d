// Library for tests to access modules

pub mod classifier;
pub mod config;
pub mod consumer;
pub mod detect;
pub mod history;
pub mod models;
pub mod publisher;
pub mod resolver;
pub mod routes;
pub mod simulator;
pub mod source;
pub mod state;
