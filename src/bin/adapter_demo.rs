//! Walks through the adapter scenarios: default escalation, logging
//! recovery, translated failures and overload admission.
//!
//! Run with: cargo run --bin adapter_demo
//! Set RUST_LOG=debug to see policy decisions.

use std::sync::{Arc, Mutex};

use anyhow::bail;
use tracing_subscriber::EnvFilter;
use work_adapter::{
    drive, Action, Adapter, EntryPoint, ErrorPolicy, OverloadSet, PolicyConfig, Producer, Raises,
    Receiver, Shape, UnrecoverableError, WorkError,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Producer with Default Policy ===");
    let answer = Adapter::wrap_default(Producer::infallible(|| 42));
    println!("  run() = {}", answer.run()?);

    println!("\n=== Action Recovered by Handler ===");
    let logged = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&logged);
    let save = Adapter::wrap(
        Action::new(|| bail!("disk full")),
        ErrorPolicy::custom(Receiver::infallible(move |err: WorkError| {
            if let Ok(mut log) = sink.lock() {
                log.push(err.to_string());
            }
        })),
    );
    save.run()?;
    let seen = logged.lock().map(|log| log.clone()).unwrap_or_default();
    println!("  run() returned normally, handler saw: {:?}", seen);

    println!("\n=== Handler Translating the Failure ===");
    let save = Adapter::wrap(
        Action::new(|| bail!("disk full")),
        ErrorPolicy::custom(Receiver::new(|_: WorkError| bail!("translated"))),
    );
    match save.run() {
        Ok(()) => println!("  Unexpected success"),
        Err(err @ UnrecoverableError::Policy(_)) => {
            println!("  Escalated: {} (cause: {})", err, err.cause())
        }
        Err(err) => println!("  Escalated unchanged: {} ({})", err, err.cause()),
    }

    println!("\n=== Driving a Receiver over Input ===");
    let config = PolicyConfig::from_toml_str("on_failure = \"log\"\nlabel = \"demo\"")?;
    let parse = Adapter::wrap(
        Receiver::new(|line: &str| {
            let n: u32 = line.trim().parse()?;
            println!("  parsed {}", n);
            Ok(())
        }),
        config.policy(),
    );
    drive::for_each(["1", "two", "3"], &parse)?;

    let strict = Adapter::wrap_default(Receiver::new(|line: &str| {
        let _: u32 = line.trim().parse()?;
        Ok(())
    }));
    if let Err(err) = drive::for_each(["1", "two", "3"], &strict) {
        println!("  Strict run stopped: {} ({})", err, err.cause());
    }

    println!("\n=== Overload Admission ===");
    let admitted = OverloadSet::builder("run")
        .accept::<Action>()
        .accept::<Producer<i32>>()
        .build()?;
    println!("  `{}` accepts {} shapes", admitted.operation(), admitted.entries().len());

    let rejected = OverloadSet::builder("run")
        .entry(EntryPoint::new(Shape::ACTION).raises(Raises::Never))
        .entry(EntryPoint::new(Shape::ACTION).raises(Raises::Checked))
        .build();
    if let Err(err) = rejected {
        println!("  Rejected: {}", err);
    }

    Ok(())
}
