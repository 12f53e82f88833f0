//! Rotating multi-instance BLE advertising.
//!
//! Controllers that support the extended advertising feature expose a small, fixed number of
//! *advertising sets* that can broadcast independently. This crate cycles a larger, fixed table of
//! logical advertisement definitions through that pool on a periodic tick, reusing sets as they
//! free up and never assigning the same set to two definitions at once.
//!
//! # Using the crate
//!
//! `multiadv` is runtime and hardware-agnostic: It does not need an RTOS and does not talk to a
//! controller directly. The platform has to provide a few services:
//! * An implementation of [`AdvRadio`] that forwards commands to the vendor BLE stack.
//! * A 1-second periodic timer that feeds [`Event::Tick`] into [`BeaconApp::handle_event`].
//! * Delivery of connection and advertising-state events from the stack as [`Event`]s.
//!
//! All events, including the tick, must be dispatched from a single execution context. The stack
//! runtimes this crate targets serialize their callbacks, so no locking is needed; the scheduler
//! relies on that guarantee.
//!
//! [`AdvRadio`]: radio/trait.AdvRadio.html
//! [`Event::Tick`]: event/enum.Event.html
//! [`BeaconApp::handle_event`]: event/struct.BeaconApp.html#method.handle_event
//! [`Event`]: event/enum.Event.html

// We're `#[no_std]`, except when we're testing
#![cfg_attr(not(test), no_std)]
// Deny a few warnings in doctests, since rustdoc `allow`s many warnings by default
#![doc(test(attr(deny(unused_imports, unused_must_use))))]
#![warn(rust_2018_idioms)]

#[macro_use]
mod log;
pub mod address;
mod error;
pub mod event;
pub mod params;
pub mod payload;
pub mod radio;
pub mod sched;
pub mod time;

pub use self::error::Error;
