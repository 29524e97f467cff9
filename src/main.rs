//! rcarelog main entrypoint.

use rcarelog::run;

fn main() {
    if let Err(e) = run() {
        rcarelog::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
