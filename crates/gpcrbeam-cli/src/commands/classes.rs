//! `gpcrbeam dataset list-classes` command implementation

use colored::Colorize;
use gpcrbeam_common::GpcrClass;

/// Print the accepted class codes and their GPCRdb names
pub fn run() {
    println!("{}", "GPCR classes:".cyan().bold());
    for class in GpcrClass::ALL {
        println!("  {:<3} {}", class.code().green(), class.display_name());
    }
    println!();
    println!("Codes and full names are accepted case-insensitively by --gpcr-classes.");
}
