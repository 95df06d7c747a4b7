//! Request/acknowledge loop with bounded retries.
//!
//! A link sends a request, waits a few ticks for the acknowledgement and
//! resends up to three times before giving up. The simulated peer only
//! answers the third request.
//!
//! Run with: cargo run --example request_retry

use tickfsm::builder::{simple_transition, MachineBuilder};
use tickfsm::composite::{pass_through, wait, Retry};
use tickfsm::config::Verbosity;
use tickfsm::core::{Predicate, StateHooks, Tick};
use tickfsm::Status;

#[derive(Debug, Default)]
struct Link {
    requests: u32,
    answers_on: u32,
}

impl Link {
    fn acknowledged(&self) -> bool {
        self.requests >= self.answers_on
    }
}

struct SendRequest;

impl StateHooks<Link> for SendRequest {
    fn on_enter(&mut self, link: &mut Link) {
        link.requests += 1;
        tracing::info!(request = link.requests, "request sent");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut machine = MachineBuilder::new()
        .id("link")
        .verbosity(Verbosity::Info)
        .build(Link {
            answers_on: 3,
            ..Link::default()
        })?;

    let online = machine.add_state("online")?;
    machine.stay(online, simple_transition("online"))?;
    let offline = machine.add_state("offline")?;
    machine.stay(offline, simple_transition("offline"))?;

    let send = machine.add_state_with_hooks("send", SendRequest)?;
    let retry = Retry::create(&mut machine, "await-ack", 2, 3)?;
    machine.connect(send, retry.state(), simple_transition("sent"))?;

    let backoff = wait(&mut machine, "backoff", 1, send)?;
    let settle = pass_through(&mut machine, "settle", online)?;

    retry.set_ok_transition(
        &mut machine,
        Predicate::new("acked", |t: &Tick<Link>| t.context().acknowledged()),
        settle,
    )?;
    retry.set_retry_error_transition(
        &mut machine,
        Predicate::new("no ack", |t: &Tick<Link>| !t.context().acknowledged()),
        backoff,
        offline,
    )?;
    machine.set_initial_state(send)?;
    machine.set_recovery_state(offline)?;

    if let stillwater::validation::Validation::Failure(issues) = machine.validate() {
        for issue in issues.iter() {
            tracing::error!(%issue, "topology issue");
        }
        return Err("machine is not wired correctly".into());
    }

    while machine.current() != Some(online) && machine.current() != Some(offline) {
        if machine.step() != Status::Ok {
            break;
        }
    }

    println!(
        "finished in {} after {} ticks and {} requests",
        machine
            .current_state()
            .map(|s| s.id().as_str())
            .unwrap_or("no state"),
        machine.tick(),
        machine.context().requests
    );
    for record in machine.history().records() {
        println!("  tick {:>2}: {} -> {}", record.tick, record.from, record.to);
    }

    Ok(())
}
