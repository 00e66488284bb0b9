//! Send a text notification to a Timebox bridge.
//!
//! Run with:
//! ```sh
//! TIMEBOX_BRIDGE_URL=http://bridge.local:5555 \
//! TIMEBOX_MAC=11:22:33:44:55:66 \
//! cargo run --example notify
//! ```

use timebox_notify::{Config, NotificationDispatcher};

#[tokio::main]
async fn main() -> Result<(), timebox_notify::Error> {
    let config =
        Config::from_env().expect("TIMEBOX_BRIDGE_URL and TIMEBOX_MAC must be set");

    let dispatcher = NotificationDispatcher::connect(config).await?;

    if dispatcher.send("Hello from Rust!", None).await {
        println!("notification delivered");
    } else {
        println!("notification not delivered, see logs");
    }
    Ok(())
}
