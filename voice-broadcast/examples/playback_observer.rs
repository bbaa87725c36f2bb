//! Playback Observer - drives a holder from the main thread and renders
//! state changes from a second thread.
//!
//! Run: BROADCAST_LOG_MODE=debug cargo run -p voice-broadcast --example playback_observer

use std::sync::Arc;
use std::thread;

use voice_broadcast::logging::init_logging_from_env;
use voice_broadcast::{BroadcastDescriptor, PlaybackStateHolder};

fn main() -> Result<(), voice_broadcast::PlaybackError> {
    init_logging_from_env()?;

    let descriptor = Arc::new(BroadcastDescriptor::new("$info:example.org", "!room:example.org"));
    let holder = PlaybackStateHolder::new(descriptor);

    // Renderer thread: consumes changes until the holder is destroyed
    let changes = holder.changes();
    let renderer = thread::spawn(move || {
        for event in changes {
            println!("[render] {} -> {}", event.entity_id, event.value);
        }
        println!("[render] broadcast retired");
    });

    // Inline observer, called on this thread before each operation returns
    holder.subscribe(|state| println!("[inline] {}", state));

    holder.toggle();
    holder.toggle();
    holder.start();
    holder.start();
    holder.stop();

    holder.destroy();
    if renderer.join().is_err() {
        eprintln!("[render] renderer thread panicked");
        std::process::exit(1);
    }

    Ok(())
}
