//! Host-stack event dispatch.
//!
//! Everything the application reacts to arrives as one [`Event`]: the periodic rotation tick and
//! the informational callbacks from the stack. The platform feeds them all into
//! [`BeaconApp::handle_event`] from the same execution context, which keeps the whole crate free
//! of locking.
//!
//! Connection and advertising-state events only steer the *generic discoverable* advertisement;
//! the rotation itself is never paused by any of them.
//!
//! [`Event`]: enum.Event.html
//! [`BeaconApp::handle_event`]: struct.BeaconApp.html#method.handle_event

use crate::payload::PayloadSource;
use crate::radio::{AdvRadio, DiscoverableMode};
use crate::sched::Rotor;
use crate::Error;

/// An inbound event consumed by [`BeaconApp::handle_event`].
///
/// [`BeaconApp::handle_event`]: struct.BeaconApp.html#method.handle_event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Event {
    /// The 1-second rotation timer fired.
    Tick,

    /// A peer connected; carries the stack's connection id.
    Connected(u16),

    /// The peer disconnected.
    Disconnected,

    /// The stack reports that the generic discoverable advertisement changed mode.
    AdvStateChanged(DiscoverableMode),
}

/// The application state machine: the rotation plus connectability handling.
pub struct BeaconApp<P: PayloadSource> {
    rotor: Rotor<P>,
    conn: Option<u16>,
}

impl<P: PayloadSource> BeaconApp<P> {
    /// Creates the application around a configured scheduler.
    pub fn new(rotor: Rotor<P>) -> Self {
        BeaconApp { rotor, conn: None }
    }

    /// Returns the rotation scheduler.
    pub fn rotor(&self) -> &Rotor<P> {
        &self.rotor
    }

    /// Returns whether a peer is currently connected.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Runs the startup sequence once the stack reports itself ready.
    pub fn start<R: AdvRadio>(
        &mut self,
        radio: &mut R,
        discoverable_data: &[u8],
    ) -> Result<(), Error> {
        self.rotor.start(radio, discoverable_data)
    }

    /// Dispatches one inbound event.
    ///
    /// Pool exhaustion on a tick is consumed here: it is logged and the tick is otherwise a
    /// no-op, since the rotation recovers by itself on a later tick. Rejected controller
    /// commands are propagated for the platform to report.
    pub fn handle_event<R: AdvRadio>(&mut self, radio: &mut R, event: Event) -> Result<(), Error> {
        match event {
            Event::Tick => match self.rotor.on_tick(radio) {
                Err(Error::Exhausted) => {
                    warn!("tick: no free adv set, skipping activation");
                    Ok(())
                }
                other => other,
            },
            Event::Connected(id) => {
                info!("connected, id {}", id);
                self.conn = Some(id);
                // A connected peer doesn't need the discoverable advertisement; the rotating
                // sets keep transmitting.
                radio.set_discoverable(DiscoverableMode::Off)
            }
            Event::Disconnected => {
                info!("disconnected");
                self.conn = None;
                radio.set_discoverable(DiscoverableMode::High)
            }
            Event::AdvStateChanged(mode) => {
                debug!("adv state changed: {:?}", mode);
                if mode == DiscoverableMode::Off && self.conn.is_none() {
                    // High-duty advertising timed out without a connection; stay reachable at
                    // low duty so a peer can still connect when it wakes up.
                    radio.set_discoverable(DiscoverableMode::Low)
                } else {
                    Ok(())
                }
            }
        }
    }
}
