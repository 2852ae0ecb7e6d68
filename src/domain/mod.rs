//! Domain layer: catalog mirror, cart, invoice and the session engine that keeps them consistent.
pub mod aggregates;
pub mod events;
pub mod value_objects;
