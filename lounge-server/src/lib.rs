//! Gaming lounge station reservation server.
//!
//! A web application for the front desk that answers: "which stations are
//! free for this party, from this time until then?" and records the booking.

pub mod booking;
pub mod config;
pub mod domain;
pub mod occupancy;
pub mod picker;
pub mod store;
pub mod web;
