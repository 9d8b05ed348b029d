//! Status command - show store status and summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "SecurePay Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Transactions", &status.total_transactions.to_string()]);
    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) =
        (&status.date_range.earliest, &status.date_range.latest)
    {
        println!("Transaction range: {} to {}", earliest, latest);
        println!();
    }

    println!("Database: {}", ctx.repository.db_path().display());

    Ok(())
}
