//! Domain types and services

pub mod messaging;
