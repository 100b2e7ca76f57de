use ringdial::{DialConfig, DialSession, Ring, SimulatedConnector};
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("ringdial=debug").init();

    // Same dial as the window uses, minus the window
    let config = DialConfig::builder()
        .title("headless".to_string())
        .max_line_len(256)
        .build();

    let mut session = DialSession::new(&config, SimulatedConnector::default());
    let selections = session.dial_mut().subscribe();

    session.connect();
    println!("status: {}", session.connection_state());

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut last_label = None;
    while Instant::now() < deadline {
        session.pump();

        if let Some(selection) = selections.try_iter().last() {
            let label = selection.outer.map(|o| o.label);
            if label != last_label {
                println!(
                    "outer {:>8.2}° -> {}",
                    session.dial().angle(Ring::Outer),
                    label.as_deref().unwrap_or("-")
                );
                last_label = label;
            }
        }

        thread::sleep(Duration::from_millis(16));
    }

    println!("raw: {:?}", session.link().last_raw());
    session.disconnect();
    println!("status: {}", session.connection_state());
    Ok(())
}
