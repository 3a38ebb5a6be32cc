#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

pub const HEADER: &str = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,\
stays_in_weekend_nights,stays_in_week_nights,adults,children,market_segment,\
distribution_channel,customer_type,country,is_repeated_guest,adr,\
total_of_special_requests,reservation_status";

/// One CSV line in `HEADER` order; `adults`, `children` and
/// `reservation_status` are filler the loader ignores.
#[allow(clippy::too_many_arguments)]
pub fn line(
    hotel: &str,
    canceled: u8,
    lead_time: u32,
    year: i32,
    month: &str,
    weekend: u32,
    week: u32,
    segment: &str,
    channel: &str,
    customer: &str,
    country: &str,
    repeated: u8,
    adr: &str,
    requests: u32,
) -> String {
    format!(
        "{hotel},{canceled},{lead_time},{year},{month},{weekend},{week},2,0.0,{segment},\
         {channel},{customer},{country},{repeated},{adr},{requests},Check-Out"
    )
}

pub fn write_csv(lines: &[String]) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create tmp csv");
    writeln!(tmp, "{HEADER}").unwrap();
    for l in lines {
        writeln!(tmp, "{l}").unwrap();
    }
    tmp.flush().unwrap();
    tmp
}

/// A small mixed dataset: two hotels, two years, several months.
#[rustfmt::skip]
pub fn sample_lines() -> Vec<String> {
    vec![
        line("City Hotel", 0, 12, 2016, "March", 1, 2, "Online TA", "TA/TO", "Transient", "PRT", 0, "100", 1),
        line("City Hotel", 1, 40, 2016, "July", 0, 3, "Groups", "TA/TO", "Group", "GBR", 0, "80.5", 0),
        line("Resort Hotel", 0, 0, 2016, "July", 2, 5, "Direct", "Direct", "Transient", "PRT", 1, "120", 2),
        line("Resort Hotel", 1, 200, 2015, "August", 2, 1, "Online TA", "TA/TO", "Transient-Party", "ESP", 0, "NaN", 0),
        line("City Hotel", 0, 7, 2015, "December", 0, 1, "Corporate", "Corporate", "Transient", "NA", 0, "65", 1),
        line("City Hotel", 0, 3, 2016, "July", 1, 1, "Direct", "Direct", "Contract", "FRA", 1, "0", 0),
    ]
}
