//! List the profile tags the API knows about.

use tabled::settings::Style;
use tabled::{Table, Tabled};
use uniways_business::Profile;

use crate::output::Output;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Tag")]
    tag: &'static str,
    #[tabled(rename = "Description")]
    label: &'static str,
}

pub fn print_profiles() {
    let out = Output::new();
    let rows: Vec<ProfileRow> = Profile::ALL
        .iter()
        .map(|p| ProfileRow {
            tag: p.as_str(),
            label: p.label(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.print(table.to_string());
    out.dim("Other values are accepted by some servers and sent as typed.");
}
