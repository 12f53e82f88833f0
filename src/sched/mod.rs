//! The rotation scheduler.
//!
//! Each tick, one slot is retired and one is activated on the set the retired slot gave up. The
//! activation index is offset from the retirement index by the number of supported sets, not by
//! one: with `supported` sets live at any time, this walks all [`SLOT_COUNT`] definitions in a
//! cycle while always keeping exactly `supported` of them on air.
//!
//! ```notrust
//! SLOT_COUNT = 5, supported = 2
//!
//! tick  retire  activate  on air afterwards
//!   1     0     (0+2)%5=2    1 2   ->   2 3*   (* = slot index)
//!   2     1     (1+2)%5=3    2 3   ->   3 4
//!   3     2     (2+2)%5=4    ...
//! ```
//!
//! All scheduler methods run to completion on the caller's context; the crate-wide
//! single-context serialization requirement (see the crate docs) makes locking unnecessary.
//!
//! [`SLOT_COUNT`]: constant.SLOT_COUNT.html

mod slot;

pub use self::slot::{Released, Slot, SlotTable, SLOT_COUNT};

use crate::address::DeviceAddress;
use crate::params::{AdvParams, DurationBudget};
use crate::payload::{PayloadBuf, PayloadSource};
use crate::radio::{AdvHandle, AdvRadio, DiscoverableMode};
use crate::Error;

/// Drives the rotation of logical definitions across the advertising sets.
pub struct Rotor<P: PayloadSource> {
    table: SlotTable<P>,
    next_retire: u8,
}

impl<P: PayloadSource> Rotor<P> {
    /// Creates a scheduler over `table`. Nothing is broadcast until [`Rotor::start`] runs.
    ///
    /// [`Rotor::start`]: #method.start
    pub fn new(table: SlotTable<P>) -> Self {
        Rotor {
            table,
            next_retire: 0,
        }
    }

    /// Returns the slot table.
    pub fn table(&self) -> &SlotTable<P> {
        &self.table
    }

    /// Returns the index of the slot retired by the next tick.
    pub fn next_retire(&self) -> usize {
        usize::from(self.next_retire)
    }

    /// Runs the startup sequence.
    ///
    /// Makes the device generally discoverable with `discoverable_data` as payload, queries the
    /// controller for its supported set count (clamped to [`SLOT_COUNT`]), and starts slots
    /// `0..supported` on sets `1..=supported`. A controller reporting zero sets is not an error;
    /// the rotation then idles until sets appear free, which on such hardware is never.
    ///
    /// Any rejected command is fatal to initialization and is propagated.
    ///
    /// [`SLOT_COUNT`]: constant.SLOT_COUNT.html
    pub fn start<R: AdvRadio>(
        &mut self,
        radio: &mut R,
        discoverable_data: &[u8],
    ) -> Result<(), Error> {
        radio.set_discoverable_data(discoverable_data)?;
        radio.set_discoverable(DiscoverableMode::High)?;

        let supported = radio.num_adv_sets();
        self.table.set_supported(supported);
        let supported = self.table.supported();
        info!("supported adv sets: {}", supported);

        for idx in 0..usize::from(supported) {
            self.start_slot(radio, idx, AdvHandle::for_slot(idx as u8))?;
        }

        Ok(())
    }

    /// Executes one rotation tick.
    ///
    /// Retires the slot under the cursor, advances the cursor, and activates the offset slot on
    /// the freed set. The retire always completes (and its stop command is issued) before the
    /// activation starts, so the freed set is never seen as in use by the activation.
    ///
    /// Returns `Error::Exhausted` when no set was free; the cursor has advanced and no other
    /// state was touched, so the next tick simply tries the next slot. Other errors indicate a
    /// rejected controller command.
    pub fn on_tick<R: AdvRadio>(&mut self, radio: &mut R) -> Result<(), Error> {
        let retire = usize::from(self.next_retire);
        let activate = (retire + usize::from(self.table.supported())) % SLOT_COUNT;
        self.next_retire = ((retire + 1) % SLOT_COUNT) as u8;

        let handle = match self.table.release(retire)? {
            Released::Reclaimed(handle) => {
                debug!("tick: stop set {} (slot {})", handle, retire);
                radio.stop_adv(handle)?;
                handle
            }
            Released::Spare(handle) => handle,
        };

        self.start_slot(radio, activate, handle)
    }

    /// Activates the slot at `idx` on the advertising set `handle`.
    ///
    /// Programs parameters, the per-slot address and a freshly generated payload, then issues the
    /// start command. The slot records the set only after every command was accepted; on failure
    /// it stays unassigned and the error is propagated, so a silently dead set is never recorded
    /// as broadcasting.
    fn start_slot<R: AdvRadio>(
        &mut self,
        radio: &mut R,
        idx: usize,
        handle: AdvHandle,
    ) -> Result<(), Error> {
        debug!("start set {} for slot {}", handle, idx);

        let params = AdvParams::for_interval(self.table.slot(idx).interval());
        radio.set_adv_params(handle, &params)?;
        radio.set_random_address(handle, DeviceAddress::for_slot(idx as u8))?;

        let mut buf = PayloadBuf::new();
        self.table.slot_mut(idx).source_mut().fill(&mut buf)?;
        radio.set_adv_data(handle, buf.as_slice())?;

        radio.start_adv(handle, DurationBudget::for_handle(handle))?;

        debug_assert!(self.table.holder_of(handle).is_none());
        self.table.slot_mut(idx).assign(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::testing::{CounterSource, FailOn, MockRadio, Op};
    use crate::time::AdvInterval;

    fn rotor() -> Rotor<CounterSource> {
        Rotor::new(SlotTable::new([
            Slot::new(CounterSource::new(0), AdvInterval::from_units(160)),
            Slot::new(CounterSource::new(1), AdvInterval::from_units(320)),
            Slot::new(CounterSource::new(2), AdvInterval::from_units(80)),
            Slot::new(CounterSource::new(3), AdvInterval::from_units(480)),
            Slot::new(CounterSource::new(4), AdvInterval::from_units(1280)),
        ]))
    }

    fn handles(rotor: &Rotor<CounterSource>) -> Vec<Option<u8>> {
        (0..SLOT_COUNT)
            .map(|i| rotor.table().slot(i).handle().map(|h| h.raw()))
            .collect()
    }

    /// Active set handles must stay unique and within `1..=supported`.
    fn check_invariants(rotor: &Rotor<CounterSource>) {
        let supported = rotor.table().supported();
        let mut seen = Vec::new();
        for idx in 0..SLOT_COUNT {
            if let Some(handle) = rotor.table().slot(idx).handle() {
                assert!(handle.raw() >= 1 && handle.raw() <= supported);
                assert!(!seen.contains(&handle.raw()), "set {} held twice", handle);
                seen.push(handle.raw());
            }
        }
        assert!(rotor.table().active_count() <= usize::from(supported));
    }

    #[test]
    fn startup_identity_assignment() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[0x02, 0x01, 0x06]).unwrap();

        assert_eq!(rotor.table().supported(), 2);
        assert_eq!(handles(&rotor), vec![Some(1), Some(2), None, None, None]);
        assert_eq!(radio.running(), vec![1, 2]);
        // Discoverable advertising runs alongside the rotating sets.
        assert!(radio
            .ops
            .contains(&Op::Discoverable(DiscoverableMode::High)));
        check_invariants(&rotor);
    }

    #[test]
    fn startup_clamps_supported_sets() {
        let mut radio = MockRadio::new(8);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        assert_eq!(rotor.table().supported(), SLOT_COUNT as u8);
        assert_eq!(radio.running(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn scenario_two_sets_first_tick() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        rotor.on_tick(&mut radio).unwrap();

        // Slot 0 retired, slot (0+2)%5 = 2 took over set 1.
        assert_eq!(handles(&rotor), vec![None, Some(2), Some(1), None, None]);
        assert_eq!(rotor.next_retire(), 1);
        check_invariants(&rotor);
    }

    #[test]
    fn scenario_two_sets_second_tick() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        rotor.on_tick(&mut radio).unwrap();
        rotor.on_tick(&mut radio).unwrap();

        // Slot 1 retired, slot (1+2)%5 = 3 took over set 2.
        assert_eq!(handles(&rotor), vec![None, None, Some(1), Some(2), None]);
        assert_eq!(rotor.next_retire(), 2);
        check_invariants(&rotor);
    }

    #[test]
    fn degenerate_full_coverage() {
        // With as many sets as slots, every tick retires and re-activates the same slot on the
        // same set.
        let mut radio = MockRadio::new(5);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        for tick in 0..10usize {
            rotor.on_tick(&mut radio).unwrap();
            assert_eq!(handles(&rotor), vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
            assert_eq!(rotor.next_retire(), (tick + 1) % SLOT_COUNT);
            check_invariants(&rotor);
        }
    }

    #[test]
    fn no_sets_at_boot() {
        let mut radio = MockRadio::new(0);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        assert_eq!(rotor.table().supported(), 0);
        assert_eq!(radio.running(), Vec::<u8>::new());

        // Every tick finds no free set and skips activation, indefinitely.
        for _ in 0..7 {
            assert_eq!(rotor.on_tick(&mut radio), Err(Error::Exhausted));
            assert_eq!(handles(&rotor), vec![None; 5]);
        }
        assert_eq!(radio.running(), Vec::<u8>::new());
    }

    #[test]
    fn cursor_visits_every_slot_once_per_cycle() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        let mut retired = Vec::new();
        for _ in 0..SLOT_COUNT {
            retired.push(rotor.next_retire());
            rotor.on_tick(&mut radio).unwrap();
            check_invariants(&rotor);
        }

        let mut sorted = retired.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        // Back where we started after a full cycle.
        assert_eq!(rotor.next_retire(), retired[0]);
    }

    #[test]
    fn long_run_keeps_supported_slots_live() {
        for supported in 1..=5u8 {
            let mut radio = MockRadio::new(supported);
            let mut rotor = rotor();
            rotor.start(&mut radio, &[]).unwrap();

            for _ in 0..50 {
                rotor.on_tick(&mut radio).unwrap();
                check_invariants(&rotor);
                assert_eq!(rotor.table().active_count(), usize::from(supported));
                assert_eq!(radio.running().len(), usize::from(supported));
            }
        }
    }

    #[test]
    fn stop_precedes_start_within_a_tick() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        radio.ops.clear();
        rotor.on_tick(&mut radio).unwrap();

        // Set 1 is stopped before any command re-programs it.
        let stop = radio
            .ops
            .iter()
            .position(|op| *op == Op::Stop(1))
            .expect("no stop command");
        let restart = radio
            .ops
            .iter()
            .position(|op| matches!(op, Op::Params(1, _)))
            .expect("no params command");
        assert!(stop < restart);
    }

    #[test]
    fn payload_regenerated_per_activation() {
        let mut radio = MockRadio::new(5);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();
        rotor.on_tick(&mut radio).unwrap();

        // Slot 0 was activated twice (startup + tick); its counter advanced.
        let datas: Vec<_> = radio
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Data(1, data) => Some(data.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(datas, vec![vec![0, 1, 0], vec![0, 2, 0]]);
    }

    #[test]
    fn per_slot_addresses_and_intervals() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();
        rotor.on_tick(&mut radio).unwrap();

        // Slot 2 came up on set 1 with its own address byte and its own interval.
        assert!(radio
            .ops
            .contains(&Op::Address(1, [0x40, 2, 0x02, 0x03, 0x04, 0x05])));
        let params = radio
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                Op::Params(1, params) => Some(params.clone()),
                _ => None,
            })
            .expect("no params for set 1");
        assert_eq!(params.interval_min, AdvInterval::from_units(80));
    }

    #[test]
    fn rejected_start_leaves_slot_unassigned() {
        let mut radio = MockRadio::new(2);
        let mut rotor = rotor();
        rotor.start(&mut radio, &[]).unwrap();

        radio.fail = Some(FailOn::Start);
        assert_eq!(rotor.on_tick(&mut radio), Err(Error::Rejected));

        // Slot 0 was retired, but slot 2 must not record a set the controller never started.
        assert_eq!(handles(&rotor), vec![None, Some(2), None, None, None]);
        check_invariants(&rotor);

        // The freed set is found again once the controller recovers.
        radio.fail = None;
        rotor.on_tick(&mut radio).unwrap();
        check_invariants(&rotor);
    }

    #[test]
    fn rejected_param_programming_propagates() {
        let mut radio = MockRadio::new(2);
        radio.fail = Some(FailOn::Params);
        let mut rotor = rotor();

        // Initialization failure is fatal and reported to the caller.
        assert_eq!(rotor.start(&mut radio, &[]), Err(Error::Rejected));
        assert_eq!(rotor.table().active_count(), 0);
    }
}
