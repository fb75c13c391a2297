pub mod config;
pub mod constants;
pub mod error;

// Embedded XML fragments and the row validator built on them
pub mod fragment;

// Domain value types shared across layers
pub mod domain;

// Ingestion, processing and extraction stages
pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub mod observability;
