//! timeclock main entrypoint.

use timeclock::run;
use timeclock::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        if e.is_user_facing() {
            error(&e);
        } else {
            error(format!("Error: {}", e));
        }
        std::process::exit(1);
    }
}
