//! Pass-through, wait and retry states driven through a machine.

mod common;

use common::capture;
use tickfsm::builder::simple_transition;
use tickfsm::composite::{pass_through, wait, Retry};
use tickfsm::core::{AttemptCounter, Predicate, StateHooks, StateKind, Tick};
use tickfsm::{Machine, StateId, Status};

#[derive(Default)]
struct Uplink {
    sends: u32,
    acked_on: Option<u32>,
}

impl Uplink {
    fn acked(&self) -> bool {
        self.acked_on.is_some_and(|n| self.sends >= n)
    }
}

struct Transmit;

impl StateHooks<Uplink> for Transmit {
    fn on_enter(&mut self, link: &mut Uplink) {
        link.sends += 1;
    }
}

struct Wiring {
    machine: Machine<Uplink>,
    retry: Retry,
    done: StateId,
    failed: StateId,
}

fn uplink(retries: u32, delay: u32, acked_on: Option<u32>) -> Wiring {
    let mut machine = Machine::new(
        "uplink",
        Uplink {
            acked_on,
            ..Uplink::default()
        },
    );
    let done = machine.add_state("done").unwrap();
    let failed = machine.add_state("failed").unwrap();
    machine.stay(done, simple_transition("done")).unwrap();
    machine.stay(failed, simple_transition("failed")).unwrap();

    let send = machine.add_state_with_hooks("send", Transmit).unwrap();
    let retry = Retry::create(&mut machine, "await-ack", delay, retries).unwrap();
    machine
        .connect(send, retry.state(), simple_transition("sent"))
        .unwrap();
    retry
        .set_ok_transition(
            &mut machine,
            Predicate::new("acked", |t: &Tick<Uplink>| t.context().acked()),
            done,
        )
        .unwrap();
    retry
        .set_retry_error_transition(
            &mut machine,
            Predicate::new("no ack", |t: &Tick<Uplink>| !t.context().acked()),
            send,
            failed,
        )
        .unwrap();
    machine.set_initial_state(send).unwrap();

    Wiring {
        machine,
        retry,
        done,
        failed,
    }
}

#[test]
fn two_retries_then_error() {
    let (wiring, logs) = capture(|| {
        let mut wiring = uplink(2, 0, None);
        for _ in 0..6 {
            assert_eq!(wiring.machine.step(), Status::Ok);
        }
        wiring
    });

    assert_eq!(wiring.machine.current(), Some(wiring.failed));
    assert_eq!(wiring.machine.context().sends, 3);
    assert_eq!(wiring.retry.attempts().get(), AttemptCounter::INITIAL);
    assert_eq!(logs.count("Try: 1"), 1);
    assert_eq!(logs.count("Try: 2"), 1);
    assert_eq!(logs.count("Try: 3"), 1);
    assert_eq!(logs.count("from await-ack to send due to no ack && retries <= 2"), 2);
    assert_eq!(logs.count("from await-ack to failed due to no ack && retries > 2"), 1);
}

#[test]
fn counter_restarts_after_giving_up() {
    let mut wiring = uplink(1, 0, None);
    let failed = wiring.failed;
    for _ in 0..4 {
        wiring.machine.step();
    }
    assert_eq!(wiring.machine.current(), Some(failed));
    assert_eq!(wiring.retry.attempts().attempts_made(), 0);
}

#[test]
fn late_ack_succeeds_and_resets_attempts() {
    let mut wiring = uplink(2, 0, Some(2));

    for _ in 0..4 {
        wiring.machine.step();
    }

    assert_eq!(wiring.machine.current(), Some(wiring.done));
    assert_eq!(wiring.machine.context().sends, 2);
    assert_eq!(wiring.retry.attempts().get(), AttemptCounter::INITIAL);
}

#[test]
fn retry_delay_is_counted_in_ticks() {
    let mut wiring = uplink(2, 3, Some(1));
    let waiting = wiring.retry.state();

    wiring.machine.step();
    for _ in 0..3 {
        wiring.machine.step();
        assert_eq!(wiring.machine.current(), Some(waiting));
    }

    wiring.machine.step();
    assert_eq!(wiring.machine.current(), Some(wiring.done));
}

#[test]
fn retrying_into_itself_still_gives_up() {
    let (machine, logs) = capture(|| {
        let mut machine = Machine::new("self-retry", Uplink::default());
        let failed = machine.add_state("failed").unwrap();
        machine.stay(failed, simple_transition("failed")).unwrap();
        let retry = Retry::create(&mut machine, "retry", 1, 2).unwrap();
        retry
            .set_retry_error_transition(
                &mut machine,
                Predicate::new("no ack", |t: &Tick<Uplink>| !t.context().acked()),
                retry.state(),
                failed,
            )
            .unwrap();
        machine.set_initial_state(retry.state()).unwrap();

        for _ in 0..50 {
            machine.step();
        }
        machine
    });

    assert_eq!(machine.current(), machine.state_id("failed"));
    assert_eq!(machine.status(), Status::Ok);
    assert_eq!(logs.count("Try: 3"), 1);
    assert_eq!(logs.count("Try: 4"), 0);
    assert_eq!(logs.count("waiting for 1 ticks"), 3);
    assert_eq!(logs.count("leaving state: retry"), 3);
}

#[test]
fn wait_of_three_leaves_on_the_fourth_tick() {
    let mut machine = Machine::new("cooldown", ());
    let ready = machine.add_state("ready").unwrap();
    machine.stay(ready, simple_transition("ready")).unwrap();
    let cooling = wait(&mut machine, "cooling", 3, ready).unwrap();
    machine.set_initial_state(cooling).unwrap();

    for tick in 1..=3 {
        machine.step();
        assert_eq!(machine.current(), Some(cooling), "left early on tick {tick}");
    }

    machine.step();
    assert_eq!(machine.current(), Some(ready));
    assert_eq!(machine.history().last().unwrap().tick, 4);
    assert!(matches!(
        machine.state(cooling).unwrap().kind(),
        StateKind::Wait { .. }
    ));
}

#[test]
fn wait_logs_its_countdown_on_entry() {
    let (_, logs) = capture(|| {
        let mut machine = Machine::new("cooldown", ());
        let ready = machine.add_state("ready").unwrap();
        machine.stay(ready, simple_transition("ready")).unwrap();
        let cooling = wait(&mut machine, "cooling", 2, ready).unwrap();
        machine.set_initial_state(cooling).unwrap();
        for _ in 0..3 {
            machine.step();
        }
    });

    assert_eq!(logs.count("waiting for 2 ticks"), 1);
    assert_eq!(logs.count("from cooling to cooling due to !OneShotWait"), 1);
    assert_eq!(logs.count("from cooling to ready due to True"), 1);
}

#[test]
fn pass_through_chain_advances_one_state_per_tick() {
    let mut machine = Machine::new("relay", ());
    let end = machine.add_state("end").unwrap();
    machine.stay(end, simple_transition("end")).unwrap();
    let second = pass_through(&mut machine, "second", end).unwrap();
    let first = pass_through(&mut machine, "first", second).unwrap();
    machine.set_initial_state(first).unwrap();

    machine.step();
    assert_eq!(machine.current(), Some(second));
    machine.step();
    assert_eq!(machine.current(), Some(end));
    assert_eq!(machine.status(), Status::Ok);
}
