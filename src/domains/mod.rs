//! Domain logic exposed by the server.

pub mod tools;
