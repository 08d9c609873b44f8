//! Token inspection; needs no configuration.

use chrono::NaiveDate;
use mhdsync_core::token;

pub fn run(raw: &str, today: Option<NaiveDate>) {
    let Some(date) = token::decode(raw) else {
        println!("invalid token: {:?}", raw.trim());
        std::process::exit(1);
    };

    let today = super::clock(today).0;
    println!("token:       {}", token::format_to_token(date));
    println!("date:        {}", date.date());
    println!("title:       MHD {}", token::format_for_display(date));
    println!("description: {}", token::format_for_description(date));
    println!("stored:      {}", token::format_for_storage(date));
    println!("days left:   {}", token::days_until(date, today));
}
