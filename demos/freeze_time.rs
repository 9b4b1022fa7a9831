//! Freezing the clock and the timezone.
//!
//! This example builds a date type pinned to a known instant and zone, then
//! shows that everything read off it is stable across runs and machines.
//!
//! # Running
//!
//! ```bash
//! cargo run --example freeze_time
//! cargo run --example freeze_time -- '{"referenceTime": null, "timezoneOffset": null}'
//! ```
//!
//! The optional argument is an options object. `null` for either key passes
//! that knob through to the real machine.

use fakedate::{fake_date, DateArg, FakeDateError};
use serde_json::json;

fn main() {
    // 2000-01-01T02:00:00Z, two hours behind UTC
    let options = match std::env::args().nth(1) {
        Some(text) => match serde_json::from_str(&text) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Options are not JSON: {}", e);
                std::process::exit(1);
            }
        },
        None => json!({ "referenceTime": 946_692_000_000_i64, "timezoneOffset": 120 }),
    };

    let dates = match fake_date(&options) {
        Ok(dates) => dates,
        Err(e) => {
            match &e {
                FakeDateError::NotANumber { name, .. } | FakeDateError::NotAnInteger { name, .. } => {
                    eprintln!("Bad value for {}: {}", name, e);
                }
                _ => eprintln!("Configuration error: {}", e),
            }
            std::process::exit(1);
        }
    };

    let now = dates.now_date();
    println!("now()            {}", dates.now());
    println!("toString         {}", now);
    println!("toUTCString      {}", now.to_utc_string());
    println!("getTimezoneOffset {}", now.get_timezone_offset());

    // Local fields are read in the configured zone
    println!(
        "local            {}-{:02}-{:02} {:02}:{:02}",
        now.get_full_year(),
        now.get_month() + 1.0,
        now.get_date(),
        now.get_hours(),
        now.get_minutes()
    );

    // Zone-less strings are read in the configured zone too
    let new_year = dates.parse("Jan 1, 2000");
    println!("parse(Jan 1)     {}", new_year);

    // Rollover works the way the host's own type does
    let mut eve = dates.construct(&[DateArg::from(1999), 11.into(), 31.into()]);
    eve.set_date(32.0);
    println!("Dec 31 + 1 day   {}", eve.to_date_string());

    match eve.to_iso_string() {
        Ok(iso) => println!("toISOString      {}", iso),
        Err(e) => eprintln!("{}", e),
    }
}
