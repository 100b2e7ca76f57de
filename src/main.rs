use clap::Parser;
use ringdial::{DialApp, DialConfig, SerialConnector, SimulatedConnector};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ringdial", about = "Three-ring filter dial with serial potentiometer input")]
struct Args {
    /// Serial port to read; the first available port when omitted
    #[arg(long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// Drive the dial from a simulated device instead of a serial port
    #[arg(long)]
    simulate: bool,

    /// Window size in logical pixels
    #[arg(long, default_value_t = 373)]
    size: u32,

    /// Connect immediately instead of waiting for the centre button
    #[arg(long)]
    connect: bool,

    #[arg(long, default_value = "Ring Dial")]
    title: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ringdial=info")),
        )
        .init();

    let args = Args::parse();
    let config = DialConfig::builder()
        .title(args.title)
        .baud_rate(args.baud)
        .window_size(args.size)
        .build();

    if args.simulate {
        let mut app = DialApp::new(config, SimulatedConnector::default());
        if args.connect {
            app.session_mut().connect();
        }
        app.run()?;
    } else {
        let mut app = DialApp::new(config, SerialConnector::new(args.port));
        if args.connect {
            app.session_mut().connect();
        }
        app.run()?;
    }

    Ok(())
}
