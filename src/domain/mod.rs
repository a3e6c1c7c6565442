//! Domain types of a card checkout and the ports to its external collaborators.

pub mod amount;
pub mod payment;
pub mod ports;
